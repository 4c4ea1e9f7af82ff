use heapless::String;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::config::{DEFAULT_AUTO_OFF_DELAY_SECS, NAME_MAX_LEN};

/// Power state applied when the accessory starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialState {
    Off,
    On,
    /// Restore the last persisted state
    Last,
    /// Follow the bound input (toggle switches only)
    Input,
}

impl InitialState {
    pub const fn as_u8(self) -> u8 {
        match self {
            InitialState::Off => 0,
            InitialState::On => 1,
            InitialState::Last => 2,
            InitialState::Input => 3,
        }
    }

    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(InitialState::Off),
            1 => Some(InitialState::On),
            2 => Some(InitialState::Last),
            3 => Some(InitialState::Input),
            _ => None,
        }
    }
}

impl Serialize for InitialState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> Deserialize<'de> for InitialState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = u8::deserialize(deserializer)?;
        Self::from_u8(raw).ok_or_else(|| {
            de::Error::invalid_value(de::Unexpected::Unsigned(raw.into()), &"initial state code")
        })
    }
}

/// How the bound physical input drives the power state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// No input is wired to this light
    Absent,
    /// Push button, rising edge toggles
    Momentary,
    /// Maintained switch, output mirrors the input level
    Toggle,
    /// Two-way switch, every transition toggles
    Edge,
    /// Input is reported but does not drive the output
    Detached,
    /// Presence sensor, rising edge turns on, auto-off turns off
    Activation,
}

impl InputMode {
    pub const fn as_i8(self) -> i8 {
        match self {
            InputMode::Absent => -1,
            InputMode::Momentary => 0,
            InputMode::Toggle => 1,
            InputMode::Edge => 2,
            InputMode::Detached => 3,
            InputMode::Activation => 4,
        }
    }

    pub const fn from_i8(value: i8) -> Option<Self> {
        match value {
            -1 => Some(InputMode::Absent),
            0 => Some(InputMode::Momentary),
            1 => Some(InputMode::Toggle),
            2 => Some(InputMode::Edge),
            3 => Some(InputMode::Detached),
            4 => Some(InputMode::Activation),
            _ => None,
        }
    }
}

impl Serialize for InputMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.as_i8())
    }
}

impl<'de> Deserialize<'de> for InputMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i8::deserialize(deserializer)?;
        Self::from_i8(raw).ok_or_else(|| {
            de::Error::invalid_value(de::Unexpected::Signed(raw.into()), &"input mode code")
        })
    }
}

/// Persisted light record.
///
/// This is the whole blob handed to the storage collaborator. Fields that are
/// not applicable to a variant (hue and saturation on a dimmer, input settings
/// without a bound input) are kept but ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightConfig {
    pub name: String<NAME_MAX_LEN>,
    pub enable: bool,
    pub state: bool,
    pub brightness: u8,
    pub hue: u16,
    pub saturation: u8,
    pub initial_state: InitialState,
    pub in_mode: InputMode,
    pub in_inverted: bool,
    pub auto_off: bool,
    pub auto_off_delay: f32,
}

impl LightConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self {
            name: String::new(),
            enable: true,
            state: false,
            brightness: 100,
            hue: 0,
            saturation: 0,
            initial_state: InitialState::Last,
            in_mode: InputMode::Absent,
            in_inverted: false,
            auto_off: false,
            auto_off_delay: DEFAULT_AUTO_OFF_DELAY_SECS,
        }
    }

    /// Set the accessory name, truncated to the name limit on a char boundary
    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        self.name.clear();
        for c in name.chars() {
            if self.name.push(c).is_err() {
                break;
            }
        }
        self
    }

    #[must_use]
    pub const fn with_enable(mut self, enable: bool) -> Self {
        self.enable = enable;
        self
    }

    #[must_use]
    pub const fn with_initial_state(mut self, initial_state: InitialState) -> Self {
        self.initial_state = initial_state;
        self
    }

    #[must_use]
    pub const fn with_in_mode(mut self, in_mode: InputMode) -> Self {
        self.in_mode = in_mode;
        self
    }

    #[must_use]
    pub const fn with_auto_off(mut self, enabled: bool, delay_secs: f32) -> Self {
        self.auto_off = enabled;
        self.auto_off_delay = delay_secs;
        self
    }
}

impl Default for LightConfig {
    fn default() -> Self {
        Self::new()
    }
}
