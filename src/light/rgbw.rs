use embassy_time::Instant;

use super::{
    LightAccessory, LightError,
    base::{LightBase, check_brightness, check_hue, check_saturation},
};
use crate::{
    color::{Hsv, WhiteChannelMode, hsv_to_rgbw},
    domain::{
        dto::{ConfigOutcome, ConfigUpdate, LightInfo, StateRequest},
        entity::{InputMode, LightConfig},
        ports::{ChangeNotifier, HandlerId, InputSource, LightOutput, PersistentConfigWriter},
        types::{
            BootReason, ChangeSource, Characteristic, InitOutcome, LightKind, LightPhase,
            OutputChannel,
        },
    },
    input::{InputAction, InputContext, InputEvent, InputModeMachine},
};

const CHARACTERISTICS: [Characteristic; 4] = [
    Characteristic::On,
    Characteristic::Brightness,
    Characteristic::Hue,
    Characteristic::Saturation,
];

/// Four-channel color light with an optional bound input.
///
/// Color is kept as hue, saturation and brightness and converted to channel
/// levels on every push, using the configured [`WhiteChannelMode`].
pub struct RgbwLight<O, I, P, N = ()>
where
    O: LightOutput,
    I: InputSource,
    P: PersistentConfigWriter,
    N: ChangeNotifier,
{
    base: LightBase<P, N>,
    output: O,
    input: Option<I>,
    handler: Option<HandlerId>,
    white_mode: WhiteChannelMode,
}

impl<O, I, P, N> RgbwLight<O, I, P, N>
where
    O: LightOutput,
    I: InputSource,
    P: PersistentConfigWriter,
    N: ChangeNotifier,
{
    /// Create the light. Without an input the stored input mode is reset to
    /// [`InputMode::Absent`].
    pub fn new(
        id: u8,
        mut config: LightConfig,
        output: O,
        input: Option<I>,
        persistence: P,
        notifier: N,
    ) -> Self {
        if input.is_none() {
            config.in_mode = InputMode::Absent;
        }
        Self {
            base: LightBase::new(id, config, persistence, notifier),
            output,
            input,
            handler: None,
            white_mode: WhiteChannelMode::default(),
        }
    }

    #[must_use]
    pub fn with_white_channel_mode(mut self, mode: WhiteChannelMode) -> Self {
        self.white_mode = mode;
        self
    }

    pub const fn white_channel_mode(&self) -> WhiteChannelMode {
        self.white_mode
    }

    /// Switch the white channel policy, re-pushing the output if active
    pub fn set_white_channel_mode(&mut self, mode: WhiteChannelMode, now: Instant) {
        if self.white_mode == mode {
            return;
        }
        self.white_mode = mode;
        if self.base.is_active() {
            self.push_output(ChangeSource::DeviceMode, now);
        }
    }

    pub fn hue(&self) -> u16 {
        self.base.config.hue
    }

    pub fn saturation(&self) -> u8 {
        self.base.config.saturation
    }

    pub fn in_mode(&self) -> InputMode {
        self.base.config.in_mode
    }

    fn push_output(&mut self, source: ChangeSource, now: Instant) {
        let config = &self.base.config;
        let brightness = if config.state { config.brightness } else { 0 };
        let hsv = Hsv::from_light(config.hue, config.saturation, brightness);
        let color = hsv_to_rgbw(hsv, self.white_mode);

        self.output.set_level(OutputChannel::Red, color.r, source);
        self.output.set_level(OutputChannel::Green, color.g, source);
        self.output.set_level(OutputChannel::Blue, color.b, source);
        self.output.set_level(OutputChannel::White, color.w, source);

        self.base.log_state(source);
        self.base.update_auto_off(now);
        self.base.notify(&CHARACTERISTICS);
    }

    /// Input modes can only be selected with a bound input, and never set to
    /// [`InputMode::Absent`]
    fn validate_in_mode(&self, raw: Option<i32>) -> Result<Option<InputMode>, LightError> {
        let Some(raw) = raw else {
            return Ok(None);
        };
        i8::try_from(raw)
            .ok()
            .and_then(InputMode::from_i8)
            .filter(|mode| *mode != InputMode::Absent && self.input.is_some())
            .map(Some)
            .ok_or(LightError::InvalidArgument("in_mode"))
    }

    fn input_level(&self) -> bool {
        self.input.as_ref().is_some_and(|input| input.level())
    }
}

impl<O, I, P, N> LightAccessory for RgbwLight<O, I, P, N>
where
    O: LightOutput,
    I: InputSource,
    P: PersistentConfigWriter,
    N: ChangeNotifier,
{
    fn id(&self) -> u8 {
        self.base.id()
    }

    fn kind(&self) -> LightKind {
        LightKind::Rgbw
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

        if let Some(input) = self.input.as_mut() {
            self.handler = Some(input.add_handler());
            input.set_inverted(self.base.config.in_inverted);
        }

        let follow_input = self.base.config.in_mode == InputMode::Toggle;
        let input_level = match &self.input {
            Some(input) if follow_input => Some(input.level()),
            _ => None,
        };
        self.base.apply_initial_state(boot, input_level);
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

    fn set_hue(&mut self, hue: u16, now: Instant) -> Result<(), LightError> {
        let hue = check_hue(i32::from(hue))?;
        if self.base.is_active() && self.base.set_hue(hue) {
            self.push_output(ChangeSource::Hap, now);
        }
        Ok(())
    }

    fn set_saturation(&mut self, saturation: u8, now: Instant) -> Result<(), LightError> {
        let saturation = check_saturation(i32::from(saturation))?;
        if self.base.is_active() && self.base.set_saturation(saturation) {
            self.push_output(ChangeSource::Hap, now);
        }
        Ok(())
    }

    fn set_state(&mut self, request: &StateRequest, now: Instant) -> Result<(), LightError> {
        let brightness = request.brightness.map(check_brightness).transpose()?;
        let hue = request.hue.map(check_hue).transpose()?;
        let saturation = request.saturation.map(check_saturation).transpose()?;
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
        if let Some(hue) = hue {
            changed |= self.base.set_hue(hue);
        }
        if let Some(saturation) = saturation {
            changed |= self.base.set_saturation(saturation);
        }
        if changed {
            self.push_output(ChangeSource::Rpc, now);
        }
        Ok(())
    }

    fn info(&mut self) -> LightInfo {
        let mut info = self.base.info(LightKind::Rgbw);
        info.hue = Some(self.base.config.hue);
        info.saturation = Some(self.base.config.saturation);
        info.in_inverted = Some(self.base.config.in_inverted);
        info.in_mode = Some(self.base.config.in_mode);
        info
    }

    fn apply_config(&mut self, update: &ConfigUpdate) -> Result<ConfigOutcome, LightError> {
        let (in_mode, staged) = self
            .validate_in_mode(update.in_mode)
            .and_then(|in_mode| {
                let effective_mode = in_mode.unwrap_or(self.base.config.in_mode);
                let input_bound = self.input.is_some() && effective_mode != InputMode::Absent;
                let staged = self.base.validate_config(update, input_bound)?;
                Ok((in_mode, staged))
            })
            .inspect_err(|_e| {
                #[cfg(feature = "log")]
                log::warn!("light {}: config rejected: {}", self.base.id(), _e);
            })?;

        let mut outcome = self.base.apply_config(staged);
        if let Some(mode) = in_mode {
            outcome.restart_required |= self.base.set_in_mode(mode);
        }
        if let Some(inverted) = update.in_inverted {
            if self.base.set_in_inverted(inverted) {
                outcome.restart_required = true;
                if let Some(input) = self.input.as_mut() {
                    input.set_inverted(inverted);
                }
            }
        }
        Ok(outcome)
    }

    fn handle_input_event(&mut self, event: InputEvent, level: bool, now: Instant) {
        if !self.base.is_active() || self.input.is_none() {
            return;
        }

        let machine = InputModeMachine::new(self.base.config.in_mode);
        let ctx = InputContext {
            is_on: self.base.config.state,
            auto_off: self.base.config.auto_off,
        };
        let Some(action) = machine.handle_event(event, level, ctx) else {
            return;
        };

        let source = machine.change_source();
        match action {
            InputAction::SetOn => {
                self.base.set_power(true);
                self.push_output(source, now);
            }
            InputAction::SetOff => {
                self.base.set_power(false);
                self.push_output(source, now);
            }
            InputAction::Toggle => {
                let on = !self.base.config.state;
                self.base.set_power(on);
                self.push_output(source, now);
            }
            InputAction::RearmAutoOff => self.base.rearm_auto_off(now),
            InputAction::CancelAutoOff => {
                #[cfg(feature = "log")]
                log::info!("light {}: auto-off cancelled by long press", self.base.id());
                self.base.cancel_auto_off();
            }
        }
    }

    fn auto_off_deadline(&self) -> Option<Instant> {
        self.base.auto_off_deadline()
    }

    fn poll_auto_off(&mut self, now: Instant) {
        if !self.base.auto_off_expired(now) {
            return;
        }
        // A sensor that still sees presence keeps the light on
        if self.base.config.in_mode == InputMode::Activation
            && self.base.config.state
            && self.input_level()
        {
            self.base.rearm_auto_off(now);
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

impl<O, I, P, N> Drop for RgbwLight<O, I, P, N>
where
    O: LightOutput,
    I: InputSource,
    P: PersistentConfigWriter,
    N: ChangeNotifier,
{
    fn drop(&mut self) {
        if let (Some(input), Some(id)) = (self.input.as_mut(), self.handler.take()) {
            input.remove_handler(id);
        }
        self.base.flush();
    }
}
