use embassy_time::Instant;

use super::{
    LightAccessory, LightError,
    base::{LightBase, check_brightness},
};
use crate::{
    domain::{
        dto::{ConfigOutcome, ConfigUpdate, LightInfo, StateRequest},
        entity::LightConfig,
        ports::{ChangeNotifier, LightOutput, PersistentConfigWriter},
        types::{
            BootReason, ChangeSource, Characteristic, InitOutcome, LightKind, LightPhase,
            OutputChannel,
        },
    },
    input::InputEvent,
};

const CHARACTERISTICS: [Characteristic; 2] = [Characteristic::On, Characteristic::Brightness];

/// Single-channel dimmable light.
///
/// Hue, saturation and input settings in the record are kept untouched.
pub struct DimmerLight<O, P, N = ()>
where
    O: LightOutput,
    P: PersistentConfigWriter,
    N: ChangeNotifier,
{
    base: LightBase<P, N>,
    output: O,
}

impl<O, P, N> DimmerLight<O, P, N>
where
    O: LightOutput,
    P: PersistentConfigWriter,
    N: ChangeNotifier,
{
    pub fn new(id: u8, config: LightConfig, output: O, persistence: P, notifier: N) -> Self {
        Self {
            base: LightBase::new(id, config, persistence, notifier),
            output,
        }
    }

    fn push_output(&mut self, source: ChangeSource, now: Instant) {
        let config = &self.base.config;
        let level = if config.state {
            f32::from(config.brightness) / 100.0
        } else {
            0.0
        };
        self.output.set_level(OutputChannel::Main, level, source);
        self.base.log_state(source);
        self.base.update_auto_off(now);
        self.base.notify(&CHARACTERISTICS);
    }
}

impl<O, P, N> LightAccessory for DimmerLight<O, P, N>
where
    O: LightOutput,
    P: PersistentConfigWriter,
    N: ChangeNotifier,
{
    fn id(&self) -> u8 {
        self.base.id()
    }

    fn kind(&self) -> LightKind {
        LightKind::Dimmer
    }

    fn name(&self) -> &str {
        self.base.config.name.as_str()
    }

    fn phase(&self) -> LightPhase {
        self.base.phase()
    }

    fn config(&self) -> &LightConfig {
        &self.base.config
    }

    fn is_dirty(&self) -> bool {
        self.base.is_dirty()
    }

    fn init(&mut self, boot: BootReason, now: Instant) -> InitOutcome {
        if self.base.activate() == InitOutcome::Disabled {
            return InitOutcome::Disabled;
        }
        self.base.apply_initial_state(boot, None);
        self.push_output(ChangeSource::Init, now);
        InitOutcome::Active
    }

    fn set_power_state(&mut self, on: bool, now: Instant) -> Result<(), LightError> {
        if self.base.is_active() && self.base.set_power(on) {
            self.push_output(ChangeSource::Hap, now);
        }
        Ok(())
    }

    fn set_brightness(&mut self, brightness: u8, now: Instant) -> Result<(), LightError> {
        let brightness = check_brightness(i32::from(brightness))?;
        if self.base.is_active() && self.base.set_brightness(brightness) {
            self.push_output(ChangeSource::Hap, now);
        }
        Ok(())
    }

    fn set_hue(&mut self, _hue: u16, _now: Instant) -> Result<(), LightError> {
        Ok(())
    }

    fn set_saturation(&mut self, _saturation: u8, _now: Instant) -> Result<(), LightError> {
        Ok(())
    }

    fn set_state(&mut self, request: &StateRequest, now: Instant) -> Result<(), LightError> {
        let brightness = request.brightness.map(check_brightness).transpose()?;
        if !self.base.is_active() {
            return Ok(());
        }

        let mut changed = false;
        if let Some(on) = request.on {
            changed |= self.base.set_power(on);
        }
        if let Some(brightness) = brightness {
            changed |= self.base.set_brightness(brightness);
        }
        if changed {
            self.push_output(ChangeSource::Rpc, now);
        }
        Ok(())
    }

    fn info(&mut self) -> LightInfo {
        self.base.info(LightKind::Dimmer)
    }

    fn apply_config(&mut self, update: &ConfigUpdate) -> Result<ConfigOutcome, LightError> {
        let staged = self.base.validate_config(update, false).inspect_err(|_e| {
            #[cfg(feature = "log")]
            log::warn!("light {}: config rejected: {}", self.base.id(), _e);
        })?;
        Ok(self.base.apply_config(staged))
    }

    fn handle_input_event(&mut self, _event: InputEvent, _level: bool, _now: Instant) {}

    fn auto_off_deadline(&self) -> Option<Instant> {
        self.base.auto_off_deadline()
    }

    fn poll_auto_off(&mut self, now: Instant) {
        if !self.base.auto_off_expired(now) {
            return;
        }
        if self.base.set_power(false) {
            self.push_output(ChangeSource::AutoOff, now);
        }
    }

    fn save_state(&mut self) -> Result<(), LightError> {
        self.base.save_state()
    }
}

impl<O, P, N> Drop for DimmerLight<O, P, N>
where
    O: LightOutput,
    P: PersistentConfigWriter,
    N: ChangeNotifier,
{
    fn drop(&mut self) {
        self.base.flush();
    }
}
