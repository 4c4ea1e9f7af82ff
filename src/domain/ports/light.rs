use crate::domain::types::{ChangeSource, Characteristic, OutputChannel};

/// Hardware output driving one or more light channels
pub trait LightOutput {
    /// Set the duty cycle of a channel
    ///
    /// `level` is in `[0, 1]`. Successive calls for one light must be applied
    /// in order; the last write wins.
    fn set_level(&mut self, channel: OutputChannel, level: f32, source: ChangeSource);
}

/// Identifier of a registered input handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerId(pub u8);

/// Physical input (switch, button or sensor) bound to a light.
///
/// The input owns edge and gesture detection. Events for a registered handler
/// are delivered to the light through `LightAccessory::handle_input_event`.
pub trait InputSource {
    /// Register the light as an event listener
    fn add_handler(&mut self) -> HandlerId;

    /// Drop a previously registered listener
    fn remove_handler(&mut self, id: HandlerId);

    /// Current logical level, with inversion applied
    fn level(&self) -> bool;

    /// Flip the physical polarity of the input
    fn set_inverted(&mut self, inverted: bool);
}

/// Placeholder input for lights without a bound input
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn add_handler(&mut self) -> HandlerId {
        HandlerId(0)
    }

    fn remove_handler(&mut self, _id: HandlerId) {}

    fn level(&self) -> bool {
        false
    }

    fn set_inverted(&mut self, _inverted: bool) {}
}

/// Sink for characteristic change notifications
pub trait ChangeNotifier {
    /// Tell subscribers that a characteristic value may have changed
    fn raise(&mut self, characteristic: Characteristic);
}

impl ChangeNotifier for () {
    fn raise(&mut self, _characteristic: Characteristic) {}
}
