//! Async driver for one light
//!
//! Commands from the protocol layer and the input, and the auto-off deadline,
//! all funnel through [`run_light`] so the light is only touched from a single
//! task.

use embassy_futures::select::{Either, select};
use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    channel::{Channel, Receiver, Sender},
};
use embassy_time::{Instant, Timer};

use crate::{
    config::LIGHT_COMMAND_CHANNEL_SIZE, domain::dto::StateRequest, input::InputEvent,
    light::LightAccessory,
};

/// Request delivered to the light task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightCommand {
    SetPower(bool),
    SetBrightness(u8),
    SetHue(u16),
    SetSaturation(u8),
    SetState(StateRequest),
    Input { event: InputEvent, level: bool },
    /// Persist the record if it is dirty
    Flush,
}

pub type LightCommandChannel<const N: usize = LIGHT_COMMAND_CHANNEL_SIZE> =
    Channel<CriticalSectionRawMutex, LightCommand, N>;
pub type LightCommandSender<'a, const N: usize = LIGHT_COMMAND_CHANNEL_SIZE> =
    Sender<'a, CriticalSectionRawMutex, LightCommand, N>;
pub type LightCommandReceiver<'a, const N: usize = LIGHT_COMMAND_CHANNEL_SIZE> =
    Receiver<'a, CriticalSectionRawMutex, LightCommand, N>;

/// Apply a single command to the light
pub fn dispatch<L>(light: &mut L, command: LightCommand, now: Instant)
where
    L: LightAccessory + ?Sized,
{
    let result = match command {
        LightCommand::SetPower(on) => light.set_power_state(on, now),
        LightCommand::SetBrightness(brightness) => light.set_brightness(brightness, now),
        LightCommand::SetHue(hue) => light.set_hue(hue, now),
        LightCommand::SetSaturation(saturation) => light.set_saturation(saturation, now),
        LightCommand::SetState(request) => light.set_state(&request, now),
        LightCommand::Input { event, level } => {
            light.handle_input_event(event, level, now);
            Ok(())
        }
        LightCommand::Flush => light.save_state(),
    };
    if let Err(_e) = result {
        #[cfg(feature = "log")]
        log::warn!("light {}: command {:?} failed: {}", light.id(), command, _e);
    }
}

/// Serve commands and auto-off expiry for `light` forever
pub async fn run_light<L, const N: usize>(light: &mut L, receiver: LightCommandReceiver<'_, N>)
where
    L: LightAccessory + ?Sized,
{
    #[cfg(feature = "log")]
    log::info!("light {}: starting light task", light.id());

    loop {
        match light.auto_off_deadline() {
            None => {
                let command = receiver.receive().await;
                dispatch(light, command, Instant::now());
            }
            Some(deadline) => match select(receiver.receive(), Timer::at(deadline)).await {
                Either::First(command) => dispatch(light, command, Instant::now()),
                Either::Second(()) => light.poll_auto_off(Instant::now()),
            },
        }
    }
}
