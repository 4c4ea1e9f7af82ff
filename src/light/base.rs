use embassy_time::Instant;
use heapless::String;

use super::LightError;
use crate::{
    config::{BRIGHTNESS_MAX, HUE_MAX, NAME_MAX_LEN, SATURATION_MAX},
    domain::{
        dto::{ConfigOutcome, ConfigUpdate, LightInfo},
        entity::{InitialState, InputMode, LightConfig},
        ports::{ChangeNotifier, PersistentConfigWriter},
        types::{BootReason, ChangeSource, Characteristic, InitOutcome, LightKind, LightPhase},
    },
    timer::AutoOffTimer,
};

pub(super) fn check_brightness(value: i32) -> Result<u8, LightError> {
    u8::try_from(value)
        .ok()
        .filter(|v| *v <= BRIGHTNESS_MAX)
        .ok_or(LightError::InvalidArgument("brightness"))
}

pub(super) fn check_hue(value: i32) -> Result<u16, LightError> {
    u16::try_from(value)
        .ok()
        .filter(|v| *v <= HUE_MAX)
        .ok_or(LightError::InvalidArgument("hue"))
}

pub(super) fn check_saturation(value: i32) -> Result<u8, LightError> {
    u8::try_from(value)
        .ok()
        .filter(|v| *v <= SATURATION_MAX)
        .ok_or(LightError::InvalidArgument("saturation"))
}

/// Replace `field` with `value`, returning whether it changed
fn replace<T: PartialEq>(field: &mut T, value: T) -> bool {
    if *field == value {
        return false;
    }
    *field = value;
    true
}

/// Validated configuration fields shared by all lights
#[derive(Debug, Default)]
pub(super) struct StagedConfig {
    name: Option<String<NAME_MAX_LEN>>,
    initial_state: Option<InitialState>,
    auto_off: Option<bool>,
    auto_off_delay: Option<f32>,
}

/// State shared by all light variants.
///
/// Every mutator returns whether the persisted record changed and marks the
/// record dirty when it did.
pub(super) struct LightBase<P, N> {
    id: u8,
    pub(super) config: LightConfig,
    phase: LightPhase,
    dirty: bool,
    auto_off_timer: AutoOffTimer,
    persistence: P,
    notifier: N,
}

impl<P: PersistentConfigWriter, N: ChangeNotifier> LightBase<P, N> {
    pub(super) fn new(id: u8, config: LightConfig, persistence: P, notifier: N) -> Self {
        Self {
            id,
            config,
            phase: LightPhase::Uninitialized,
            dirty: false,
            auto_off_timer: AutoOffTimer::new(),
            persistence,
            notifier,
        }
    }

    pub(super) const fn id(&self) -> u8 {
        self.id
    }

    pub(super) const fn phase(&self) -> LightPhase {
        self.phase
    }

    pub(super) fn is_active(&self) -> bool {
        self.phase == LightPhase::Active
    }

    pub(super) const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Leave the uninitialized phase according to the enable flag
    pub(super) fn activate(&mut self) -> InitOutcome {
        if !self.config.enable {
            #[cfg(feature = "log")]
            log::info!("light {}: '{}' is disabled", self.id, self.config.name);
            self.phase = LightPhase::Disabled;
            return InitOutcome::Disabled;
        }
        self.phase = LightPhase::Active;
        InitOutcome::Active
    }

    /// Apply the start-up power policy
    ///
    /// `input_level` is the level to follow for [`InitialState::Input`]. Without
    /// one the persisted state is kept, as after a warm restart.
    pub(super) fn apply_initial_state(&mut self, boot: BootReason, input_level: Option<bool>) {
        if boot == BootReason::SoftReset {
            return;
        }
        match (self.config.initial_state, input_level) {
            (InitialState::Off, _) => {
                self.set_power(false);
            }
            (InitialState::On, _) => {
                self.set_power(true);
            }
            (InitialState::Input, Some(level)) => {
                self.set_power(level);
            }
            (InitialState::Last | InitialState::Input, _) => {}
        }
    }

    pub(super) fn set_power(&mut self, on: bool) -> bool {
        let changed = replace(&mut self.config.state, on);
        self.dirty |= changed;
        changed
    }

    pub(super) fn set_brightness(&mut self, brightness: u8) -> bool {
        let changed = replace(&mut self.config.brightness, brightness);
        self.dirty |= changed;
        changed
    }

    pub(super) fn set_hue(&mut self, hue: u16) -> bool {
        let changed = replace(&mut self.config.hue, hue);
        self.dirty |= changed;
        changed
    }

    pub(super) fn set_saturation(&mut self, saturation: u8) -> bool {
        let changed = replace(&mut self.config.saturation, saturation);
        self.dirty |= changed;
        changed
    }

    pub(super) fn set_in_mode(&mut self, mode: InputMode) -> bool {
        let changed = replace(&mut self.config.in_mode, mode);
        self.dirty |= changed;
        changed
    }

    pub(super) fn set_in_inverted(&mut self, inverted: bool) -> bool {
        let changed = replace(&mut self.config.in_inverted, inverted);
        self.dirty |= changed;
        changed
    }

    /// Arm the auto-off countdown if the light is on and auto-off is enabled,
    /// cancel it otherwise
    pub(super) fn update_auto_off(&mut self, now: Instant) {
        if self.config.state && self.config.auto_off {
            self.auto_off_timer.arm_secs(self.config.auto_off_delay, now);
        } else {
            self.auto_off_timer.cancel();
        }
    }

    pub(super) fn rearm_auto_off(&mut self, now: Instant) {
        self.auto_off_timer.arm_secs(self.config.auto_off_delay, now);
    }

    pub(super) fn cancel_auto_off(&mut self) {
        self.auto_off_timer.cancel();
    }

    pub(super) fn auto_off_deadline(&self) -> Option<Instant> {
        self.auto_off_timer.deadline()
    }

    /// Consume an expired countdown
    ///
    /// Auto-off may have been disabled after the countdown was armed, in which
    /// case the expiry is dropped.
    pub(super) fn auto_off_expired(&mut self, now: Instant) -> bool {
        if !self.auto_off_timer.poll(now) {
            return false;
        }
        if !self.config.auto_off {
            #[cfg(feature = "log")]
            log::debug!("light {}: auto-off disabled while armed", self.id);
            return false;
        }
        true
    }

    pub(super) fn notify(&mut self, characteristics: &[Characteristic]) {
        for characteristic in characteristics {
            self.notifier.raise(*characteristic);
        }
    }

    pub(super) fn log_state(&self, source: ChangeSource) {
        #[cfg(feature = "log")]
        log::info!(
            "light {} [{}]: state: {}, brightness: {}, hue: {}, saturation: {}",
            self.id,
            source,
            if self.config.state { "on" } else { "off" },
            self.config.brightness,
            self.config.hue,
            self.config.saturation
        );
        #[cfg(not(feature = "log"))]
        let _ = source;
    }

    pub(super) fn save_state(&mut self) -> Result<(), LightError> {
        if !self.dirty {
            return Ok(());
        }
        self.persistence.save(&self.config)?;
        self.dirty = false;
        Ok(())
    }

    /// Save if dirty, keeping the dirty flag on failure
    pub(super) fn flush(&mut self) {
        if let Err(_e) = self.save_state() {
            #[cfg(feature = "log")]
            log::warn!("light {}: error persisting state: {}", self.id, _e);
        }
    }

    /// Snapshot of the fields every variant reports
    pub(super) fn info(&mut self, kind: LightKind) -> LightInfo {
        self.flush();
        LightInfo {
            id: self.id,
            kind,
            name: self.config.name.clone(),
            on: self.config.state,
            brightness: self.config.brightness,
            hue: None,
            saturation: None,
            in_inverted: None,
            initial_state: self.config.initial_state,
            in_mode: None,
            auto_off: self.config.auto_off,
            auto_off_delay: self.config.auto_off_delay,
        }
    }

    /// Validate the shared part of a configuration update without applying it
    ///
    /// [`InitialState::Input`] is only accepted when `input_bound` is set.
    pub(super) fn validate_config(
        &self,
        update: &ConfigUpdate,
        input_bound: bool,
    ) -> Result<StagedConfig, LightError> {
        let mut staged = StagedConfig::default();

        if let Some(name) = &update.name {
            let name = String::try_from(name.as_str())
                .map_err(|()| LightError::InvalidArgument("name (too long, max 64)"))?;
            staged.name = Some(name);
        }

        if let Some(raw) = update.initial_state {
            let initial_state = u8::try_from(raw)
                .ok()
                .and_then(InitialState::from_u8)
                .filter(|state| input_bound || *state != InitialState::Input)
                .ok_or(LightError::InvalidArgument("initial_state"))?;
            staged.initial_state = Some(initial_state);
        }

        if let Some(delay) = update.auto_off_delay {
            if !delay.is_finite() || delay <= 0.0 {
                return Err(LightError::InvalidArgument("auto_off_delay"));
            }
            staged.auto_off_delay = Some(delay);
        }

        let auto_off = update.auto_off.unwrap_or(self.config.auto_off);
        let delay = staged.auto_off_delay.unwrap_or(self.config.auto_off_delay);
        if auto_off && (delay.is_nan() || delay <= 0.0) {
            return Err(LightError::InvalidArgument("auto_off_delay"));
        }
        staged.auto_off = update.auto_off;

        Ok(staged)
    }

    /// Apply a validated update
    pub(super) fn apply_config(&mut self, staged: StagedConfig) -> ConfigOutcome {
        let mut outcome = ConfigOutcome::default();

        if let Some(name) = staged.name {
            if replace(&mut self.config.name, name) {
                self.dirty = true;
                outcome.restart_required = true;
            }
        }
        if let Some(initial_state) = staged.initial_state {
            self.dirty |= replace(&mut self.config.initial_state, initial_state);
        }
        if let Some(auto_off) = staged.auto_off {
            self.dirty |= replace(&mut self.config.auto_off, auto_off);
        }
        if let Some(delay) = staged.auto_off_delay {
            self.dirty |= replace(&mut self.config.auto_off_delay, delay);
        }

        outcome
    }
}
