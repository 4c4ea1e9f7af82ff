//! Shared fakes for the light integration tests.
#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use embassy_time::{Duration, Instant};
use myrtio_light_accessory::domain::{
    entity::LightConfig,
    ports::{
        ChangeNotifier, HandlerId, InputSource, LightOutput, PersistenceError,
        PersistentConfigWriter,
    },
    types::{ChangeSource, Characteristic, OutputChannel},
};

pub const T0: Instant = Instant::from_secs(1_000);

pub fn at_ms(ms: u64) -> Instant {
    T0 + Duration::from_millis(ms)
}

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelWrite {
    pub channel: OutputChannel,
    pub level: f32,
    pub source: ChangeSource,
}

#[derive(Clone, Default)]
pub struct RecordingOutput {
    pub writes: Rc<RefCell<Vec<LevelWrite>>>,
}

impl RecordingOutput {
    /// Number of pushes, counting the first channel written by each push
    pub fn pushes(&self) -> usize {
        self.writes
            .borrow()
            .iter()
            .filter(|w| matches!(w.channel, OutputChannel::Main | OutputChannel::Red))
            .count()
    }

    pub fn last_level(&self, channel: OutputChannel) -> Option<f32> {
        self.writes
            .borrow()
            .iter()
            .rev()
            .find(|w| w.channel == channel)
            .map(|w| w.level)
    }

    pub fn last_source(&self) -> Option<ChangeSource> {
        self.writes.borrow().last().map(|w| w.source)
    }

    pub fn clear(&self) {
        self.writes.borrow_mut().clear();
    }
}

impl LightOutput for RecordingOutput {
    fn set_level(&mut self, channel: OutputChannel, level: f32, source: ChangeSource) {
        self.writes.borrow_mut().push(LevelWrite {
            channel,
            level,
            source,
        });
    }
}

#[derive(Clone, Default)]
pub struct FakeInput {
    pub level: Rc<Cell<bool>>,
    pub inverted: Rc<Cell<bool>>,
    pub handlers: Rc<RefCell<Vec<HandlerId>>>,
    next_id: Rc<Cell<u8>>,
}

impl FakeInput {
    pub fn set_level(&self, level: bool) {
        self.level.set(level);
    }
}

impl InputSource for FakeInput {
    fn add_handler(&mut self) -> HandlerId {
        let id = HandlerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.handlers.borrow_mut().push(id);
        id
    }

    fn remove_handler(&mut self, id: HandlerId) {
        self.handlers.borrow_mut().retain(|h| *h != id);
    }

    fn level(&self) -> bool {
        self.level.get()
    }

    fn set_inverted(&mut self, inverted: bool) {
        self.inverted.set(inverted);
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    pub saved: Rc<RefCell<Vec<LightConfig>>>,
    pub fail: Rc<Cell<bool>>,
}

impl MemoryStore {
    pub fn save_count(&self) -> usize {
        self.saved.borrow().len()
    }

    pub fn last(&self) -> Option<LightConfig> {
        self.saved.borrow().last().cloned()
    }
}

impl PersistentConfigWriter for MemoryStore {
    fn save(&mut self, config: &LightConfig) -> Result<(), PersistenceError> {
        if self.fail.get() {
            return Err(PersistenceError::DriverError);
        }
        self.saved.borrow_mut().push(config.clone());
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub raised: Rc<RefCell<Vec<Characteristic>>>,
}

impl RecordingNotifier {
    pub fn count(&self) -> usize {
        self.raised.borrow().len()
    }
}

impl ChangeNotifier for RecordingNotifier {
    fn raise(&mut self, characteristic: Characteristic) {
        self.raised.borrow_mut().push(characteristic);
    }
}
