//! JSON request codec
//!
//! Decodes the remote "set state" and "set config" payloads and encodes the
//! "get info" snapshot. Transport and framing belong to the caller; this module
//! only maps bytes to [`LightAccessory`] calls.

use core::fmt::{self, Write};

use embassy_time::Instant;
use heapless::String;

use crate::{
    config::NAME_DECODE_CAPACITY,
    domain::dto::{ConfigOutcome, ConfigUpdate, StateRequest},
    light::{LightAccessory, LightError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcError {
    /// Payload is not valid JSON or has fields of the wrong type
    Parse,
    /// The light rejected the request
    Light(LightError),
    /// The response does not fit into the output buffer
    Serialization,
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcError::Parse => write!(f, "malformed request"),
            RpcError::Light(e) => write!(f, "{}", e),
            RpcError::Serialization => write!(f, "response buffer too small"),
        }
    }
}

impl core::error::Error for RpcError {}

impl From<LightError> for RpcError {
    fn from(e: LightError) -> Self {
        RpcError::Light(e)
    }
}

/// Decode a set-state payload and apply it as one bulk change
///
/// Accepts any subset of `state`, `brightness`, `hue` and `saturation`.
pub fn set_state_json<L>(light: &mut L, body: &[u8], now: Instant) -> Result<(), RpcError>
where
    L: LightAccessory + ?Sized,
{
    let (request, _) = serde_json_core::from_slice::<StateRequest>(body).map_err(|_e| {
        #[cfg(feature = "log")]
        log::warn!("rpc: set state parse error: {:?}", _e);
        RpcError::Parse
    })?;
    light.set_state(&request, now)?;
    Ok(())
}

/// Decode a set-config payload and apply it
///
/// String escapes in the name are decoded before validation.
pub fn set_config_json<L>(light: &mut L, body: &[u8]) -> Result<ConfigOutcome, RpcError>
where
    L: LightAccessory + ?Sized,
{
    let mut unescape_buf = [0u8; NAME_DECODE_CAPACITY];
    let (update, _) =
        serde_json_core::from_slice_escaped::<ConfigUpdate>(body, &mut unescape_buf).map_err(
            |_e| {
                #[cfg(feature = "log")]
                log::warn!("rpc: set config parse error: {:?}", _e);
                RpcError::Parse
            },
        )?;
    Ok(light.apply_config(&update)?)
}

/// Encode the light snapshot into `buf`, returning the number of bytes written
pub fn info_json<L>(light: &mut L, buf: &mut [u8]) -> Result<usize, RpcError>
where
    L: LightAccessory + ?Sized,
{
    let info = light.info();
    serde_json_core::to_slice(&info, buf).map_err(|_| RpcError::Serialization)
}

/// Short human readable state, e.g. `sta: on, b: 50, h: 120, sa: 100`
pub fn status_line<L, const N: usize>(light: &mut L) -> Result<String<N>, RpcError>
where
    L: LightAccessory + ?Sized,
{
    let info = light.info();
    let mut line = String::new();
    write!(
        line,
        "sta: {}, b: {}",
        if info.on { "on" } else { "off" },
        info.brightness
    )
    .map_err(|_| RpcError::Serialization)?;
    if let (Some(hue), Some(saturation)) = (info.hue, info.saturation) {
        write!(line, ", h: {}, sa: {}", hue, saturation).map_err(|_| RpcError::Serialization)?;
    }
    Ok(line)
}
