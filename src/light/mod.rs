//! Light state controllers
//!
//! - `base` - state, dirty tracking, auto-off and persistence shared by all lights
//! - `dimmer` - single-channel dimmable light
//! - `rgbw` - four-channel color light with an optional bound input
//!
//! Both variants implement [`LightAccessory`], the interface the protocol
//! layer and the runtime task talk to.

mod base;
mod dimmer;
mod rgbw;

use core::fmt;

use embassy_time::Instant;

pub use dimmer::DimmerLight;
pub use rgbw::RgbwLight;

use crate::{
    domain::{
        dto::{ConfigOutcome, ConfigUpdate, LightInfo, StateRequest},
        entity::LightConfig,
        ports::PersistenceError,
        types::{BootReason, InitOutcome, LightKind, LightPhase},
    },
    input::InputEvent,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightError {
    /// Out-of-range or oversized field, nothing was applied
    InvalidArgument(&'static str),
    /// Storage rejected the write, state stays dirty
    Persistence(PersistenceError),
}

impl fmt::Display for LightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LightError::InvalidArgument(field) => write!(f, "invalid {}", field),
            LightError::Persistence(e) => write!(f, "persistence error: {}", e),
        }
    }
}

impl core::error::Error for LightError {}

impl From<PersistenceError> for LightError {
    fn from(e: PersistenceError) -> Self {
        LightError::Persistence(e)
    }
}

/// Capability interface of a light accessory.
///
/// State requests on a disabled light are validated, then succeed without
/// doing anything. Configuration updates still apply.
pub trait LightAccessory {
    fn id(&self) -> u8;

    fn kind(&self) -> LightKind;

    fn name(&self) -> &str;

    fn phase(&self) -> LightPhase;

    /// Current in-memory record
    fn config(&self) -> &LightConfig;

    fn is_on(&self) -> bool {
        self.config().state
    }

    fn brightness(&self) -> u8 {
        self.config().brightness
    }

    /// In-memory state differs from the last persisted record
    fn is_dirty(&self) -> bool;

    /// Apply the initial state policy and register with the input
    fn init(&mut self, boot: BootReason, now: Instant) -> InitOutcome;

    /// Power characteristic write
    fn set_power_state(&mut self, on: bool, now: Instant) -> Result<(), LightError>;

    /// Brightness characteristic write
    fn set_brightness(&mut self, brightness: u8, now: Instant) -> Result<(), LightError>;

    /// Hue characteristic write
    fn set_hue(&mut self, hue: u16, now: Instant) -> Result<(), LightError>;

    /// Saturation characteristic write
    fn set_saturation(&mut self, saturation: u8, now: Instant) -> Result<(), LightError>;

    /// Bulk state change with a single output push
    fn set_state(&mut self, request: &StateRequest, now: Instant) -> Result<(), LightError>;

    /// Report the current state, flushing pending persistence first
    fn info(&mut self) -> LightInfo;

    /// Validate and apply a partial configuration update
    fn apply_config(&mut self, update: &ConfigUpdate) -> Result<ConfigOutcome, LightError>;

    /// Handle an event from the bound input
    fn handle_input_event(&mut self, event: InputEvent, level: bool, now: Instant);

    /// Deadline of the running auto-off countdown
    fn auto_off_deadline(&self) -> Option<Instant>;

    /// Turn the light off if the auto-off countdown expired
    fn poll_auto_off(&mut self, now: Instant);

    /// Persist the record if dirty
    fn save_state(&mut self) -> Result<(), LightError>;
}
