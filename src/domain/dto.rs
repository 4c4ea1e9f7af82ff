use heapless::String;
use serde::{Deserialize, Serialize};

use crate::{
    config::{NAME_DECODE_CAPACITY, NAME_MAX_LEN},
    domain::{
        entity::{InitialState, InputMode},
        types::LightKind,
    },
};

/// Represents a request to change the light state.
///
/// Source-neutral: built by the protocol layer for characteristic writes and
/// bulk "set state" requests alike. `None` fields are left untouched.
///
/// Numeric fields are wider than their valid range so out-of-range values are
/// rejected by the light rather than by the decoder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct StateRequest {
    /// Turn on (Some(true)), turn off (Some(false)), or no change (None)
    #[serde(rename = "state")]
    pub on: Option<bool>,
    /// Brightness percentage (0-100)
    pub brightness: Option<i32>,
    /// Hue in degrees (0-360)
    pub hue: Option<i32>,
    /// Saturation percentage (0-100)
    pub saturation: Option<i32>,
}

impl StateRequest {
    /// Create a new empty request (no changes)
    pub const fn new() -> Self {
        Self {
            on: None,
            brightness: None,
            hue: None,
            saturation: None,
        }
    }

    #[must_use]
    pub const fn with_power(mut self, on: bool) -> Self {
        self.on = Some(on);
        self
    }

    #[must_use]
    pub fn with_brightness(mut self, brightness: u8) -> Self {
        self.brightness = Some(i32::from(brightness));
        self
    }

    #[must_use]
    pub fn with_hue(mut self, hue: u16) -> Self {
        self.hue = Some(i32::from(hue));
        self
    }

    #[must_use]
    pub fn with_saturation(mut self, saturation: u8) -> Self {
        self.saturation = Some(i32::from(saturation));
        self
    }
}

/// Partial configuration update.
///
/// Enum fields carry their raw wire codes, widened like [`StateRequest`], so
/// that out-of-range values can be rejected by the light instead of failing to
/// decode. The name is held
/// decoded, with room past the name limit.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConfigUpdate {
    pub name: Option<String<NAME_DECODE_CAPACITY>>,
    pub initial_state: Option<i32>,
    pub in_mode: Option<i32>,
    pub in_inverted: Option<bool>,
    pub auto_off: Option<bool>,
    pub auto_off_delay: Option<f32>,
}

impl ConfigUpdate {
    pub const fn new() -> Self {
        Self {
            name: None,
            initial_state: None,
            in_mode: None,
            in_inverted: None,
            auto_off: None,
            auto_off_delay: None,
        }
    }

    /// Set the name, cut on a char boundary at the decode capacity
    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        let mut decoded = String::new();
        for c in name.chars() {
            if decoded.push(c).is_err() {
                break;
            }
        }
        self.name = Some(decoded);
        self
    }

    #[must_use]
    pub fn with_initial_state(mut self, initial_state: InitialState) -> Self {
        self.initial_state = Some(i32::from(initial_state.as_u8()));
        self
    }

    #[must_use]
    pub fn with_in_mode(mut self, in_mode: InputMode) -> Self {
        self.in_mode = Some(i32::from(in_mode.as_i8()));
        self
    }

    #[must_use]
    pub const fn with_in_inverted(mut self, inverted: bool) -> Self {
        self.in_inverted = Some(inverted);
        self
    }

    #[must_use]
    pub const fn with_auto_off(mut self, enabled: bool) -> Self {
        self.auto_off = Some(enabled);
        self
    }

    #[must_use]
    pub const fn with_auto_off_delay(mut self, delay_secs: f32) -> Self {
        self.auto_off_delay = Some(delay_secs);
        self
    }
}

/// Result of a successful configuration update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfigOutcome {
    /// The change only fully applies after a device restart
    pub restart_required: bool,
}

/// Snapshot of a light reported to the protocol layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LightInfo {
    pub id: u8,
    #[serde(rename = "type")]
    pub kind: LightKind,
    pub name: String<NAME_MAX_LEN>,
    #[serde(rename = "state")]
    pub on: bool,
    pub brightness: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hue: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saturation: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_inverted: Option<bool>,
    #[serde(rename = "initial")]
    pub initial_state: InitialState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_mode: Option<InputMode>,
    pub auto_off: bool,
    pub auto_off_delay: f32,
}
