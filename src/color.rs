//! HSV to RGBW conversion
//!
//! Colors are handled as `f32` fractions in `[0, 1]` so the result can be fed
//! straight into PWM duty cycles. Conversion is pure: the white channel policy
//! is passed in on every call because the device mode may change at runtime.

use crate::config::{BRIGHTNESS_MAX, DEVICE_MODE_RGBW, HUE_MAX, SATURATION_MAX};

/// White channel extraction policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WhiteChannelMode {
    /// Only the color channels are used, white stays dark
    #[default]
    Rgb,
    /// The common part of R, G and B is moved to the white channel
    Rgbw,
}

impl WhiteChannelMode {
    /// Resolve the policy from the device mode code
    pub const fn from_device_mode(mode: u8) -> Self {
        if mode == DEVICE_MODE_RGBW {
            WhiteChannelMode::Rgbw
        } else {
            WhiteChannelMode::Rgb
        }
    }
}

/// Color in HSV space, every component in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsv {
    pub h: f32,
    pub s: f32,
    pub v: f32,
}

impl Hsv {
    pub const fn new(h: f32, s: f32, v: f32) -> Self {
        Self { h, s, v }
    }

    /// Build from hue degrees, saturation and brightness percentages
    pub fn from_light(hue: u16, saturation: u8, brightness: u8) -> Self {
        Self {
            h: f32::from(hue) / f32::from(HUE_MAX),
            s: f32::from(saturation) / f32::from(SATURATION_MAX),
            v: f32::from(brightness) / f32::from(BRIGHTNESS_MAX),
        }
    }
}

/// Output levels of the four channels, each in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgbw {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub w: f32,
}

impl Rgbw {
    pub const OFF: Rgbw = Rgbw {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        w: 0.0,
    };
}

/// Convert HSV to RGB using the six-sector construction
///
/// Zero saturation is achromatic and ignores the hue.
pub fn hsv_to_rgb(hsv: Hsv) -> (f32, f32, f32) {
    let v = hsv.v;
    if hsv.s <= 0.0 {
        return (v, v, v);
    }

    // Hue is non-negative, so truncation is the floor
    let sector = (hsv.h * 6.0) as i32;
    let f = hsv.h * 6.0 - sector as f32;
    let p = v * (1.0 - hsv.s);
    let q = v * (1.0 - f * hsv.s);
    let t = v * (1.0 - (1.0 - f) * hsv.s);

    // A hue of exactly 1.0 lands in sector 6, which wraps to red
    match sector.rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

/// Convert HSV to RGBW applying the white channel policy
pub fn hsv_to_rgbw(hsv: Hsv, mode: WhiteChannelMode) -> Rgbw {
    let (r, g, b) = hsv_to_rgb(hsv);
    match mode {
        WhiteChannelMode::Rgbw => {
            let w = r.min(g).min(b);
            Rgbw {
                r: r - w,
                g: g - w,
                b: b - w,
                w,
            }
        }
        WhiteChannelMode::Rgb => Rgbw { r, g, b, w: 0.0 },
    }
}
