//! Input mode state machine
//!
//! Translates events reported by the physical input into power decisions
//! according to the configured [`InputMode`]. The machine is pure: the light
//! passes in its current power and auto-off state and applies the returned
//! action itself.

use crate::domain::{entity::InputMode, types::ChangeSource};

/// Event reported by the input's edge and gesture detector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// The logical level changed
    LevelChange,
    ShortPress,
    LongPress,
    DoublePress,
    Reset,
}

/// Decision produced for an input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    SetOn,
    SetOff,
    Toggle,
    /// Restart the running auto-off countdown
    RearmAutoOff,
    /// Stop the auto-off countdown so the light stays on
    CancelAutoOff,
}

/// Light state the machine needs to decide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputContext {
    pub is_on: bool,
    pub auto_off: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputModeMachine {
    mode: InputMode,
}

impl InputModeMachine {
    pub const fn new(mode: InputMode) -> Self {
        Self { mode }
    }

    pub const fn mode(&self) -> InputMode {
        self.mode
    }

    /// Source tag for output pushes caused by this mode
    pub const fn change_source(&self) -> ChangeSource {
        match self.mode {
            InputMode::Toggle => ChangeSource::Switch,
            InputMode::Edge => ChangeSource::Edge,
            InputMode::Activation => ChangeSource::Activation,
            _ => ChangeSource::Momentary,
        }
    }

    /// Decide what an event means for the light
    ///
    /// `level` is the new logical input level for [`InputEvent::LevelChange`].
    /// Returns `None` when the event must be ignored.
    pub fn handle_event(
        &self,
        event: InputEvent,
        level: bool,
        ctx: InputContext,
    ) -> Option<InputAction> {
        match event {
            InputEvent::LevelChange => self.handle_level_change(level, ctx),
            InputEvent::LongPress if self.mode == InputMode::Momentary => {
                Some(InputAction::CancelAutoOff)
            }
            InputEvent::LongPress
            | InputEvent::ShortPress
            | InputEvent::DoublePress
            | InputEvent::Reset => None,
        }
    }

    fn handle_level_change(&self, level: bool, ctx: InputContext) -> Option<InputAction> {
        match self.mode {
            InputMode::Absent | InputMode::Detached => None,
            InputMode::Toggle => Some(if level {
                InputAction::SetOn
            } else {
                InputAction::SetOff
            }),
            // Only 0 -> 1 transitions
            InputMode::Momentary => level.then_some(InputAction::Toggle),
            InputMode::Edge => Some(InputAction::Toggle),
            InputMode::Activation => {
                if level {
                    Some(InputAction::SetOn)
                } else if ctx.is_on && ctx.auto_off {
                    Some(InputAction::RearmAutoOff)
                } else {
                    None
                }
            }
        }
    }
}
