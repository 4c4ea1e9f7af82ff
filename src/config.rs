/// Maximum accessory name length in bytes
pub const NAME_MAX_LEN: usize = 64;

/// Room for a decoded name in an incoming config update, so that oversized
/// names still reach validation
pub const NAME_DECODE_CAPACITY: usize = 2 * NAME_MAX_LEN;

/// Upper bound of the brightness percentage
pub const BRIGHTNESS_MAX: u8 = 100;

/// Upper bound of the hue in degrees
pub const HUE_MAX: u16 = 360;

/// Upper bound of the saturation percentage
pub const SATURATION_MAX: u8 = 100;

/// Auto-off delay used by freshly created configs
pub const DEFAULT_AUTO_OFF_DELAY_SECS: f32 = 60.0;

/// Capacity of the per-light command channel
pub const LIGHT_COMMAND_CHANNEL_SIZE: usize = 8;

/// Device mode code that enables the dedicated white channel
pub const DEVICE_MODE_RGBW: u8 = 4;
