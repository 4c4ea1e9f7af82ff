use serde::{Serialize, Serializer};

/// Light accessory variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    /// Single-channel dimmable light
    Dimmer,
    /// Four-channel color light
    Rgbw,
}

impl LightKind {
    pub const fn as_u8(self) -> u8 {
        match self {
            LightKind::Dimmer => 0,
            LightKind::Rgbw => 1,
        }
    }
}

impl Serialize for LightKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

/// Why the device is starting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootReason {
    PowerOn,
    /// Warm restart; the last state is always restored
    SoftReset,
}

/// Outcome of light initialization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Active,
    /// The light is disabled in its config and will ignore all requests
    Disabled,
}

/// Lifecycle phase of a light controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightPhase {
    Uninitialized,
    Active,
    Disabled,
}

/// Physical output channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputChannel {
    /// The only channel of a dimmer
    Main,
    Red,
    Green,
    Blue,
    White,
}

/// Externally observable light characteristic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Characteristic {
    On,
    Brightness,
    Hue,
    Saturation,
}

/// Diagnostic tag describing what caused an output push
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeSource {
    Init,
    /// Accessory protocol characteristic write
    Hap,
    /// Bulk state request
    Rpc,
    /// Toggle switch input
    Switch,
    /// Momentary button input
    Momentary,
    /// Edge switch input
    Edge,
    /// Activation sensor input
    Activation,
    AutoOff,
    /// Device light mode switch
    DeviceMode,
}

impl ChangeSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            ChangeSource::Init => "init",
            ChangeSource::Hap => "HAP",
            ChangeSource::Rpc => "RPC",
            ChangeSource::Switch => "switch",
            ChangeSource::Momentary => "ext_mom",
            ChangeSource::Edge => "ext_edge",
            ChangeSource::Activation => "ext_act",
            ChangeSource::AutoOff => "auto_off",
            ChangeSource::DeviceMode => "mode",
        }
    }
}

impl core::fmt::Display for ChangeSource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
