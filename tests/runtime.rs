//! Light task tests, run on the std time driver.

mod common;

use common::{FakeInput, MemoryStore, RecordingOutput, T0};
use embassy_futures::{block_on, select::select};
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Instant, Timer};
use myrtio_light_accessory::{
    domain::{
        dto::StateRequest,
        entity::LightConfig,
        types::{BootReason, ChangeSource},
    },
    input::InputEvent,
    light::{DimmerLight, LightAccessory, RgbwLight},
    runtime::{LightCommand, LightCommandChannel, dispatch, run_light},
};

fn dimmer(
    config: LightConfig,
    output: RecordingOutput,
    store: MemoryStore,
) -> DimmerLight<RecordingOutput, MemoryStore> {
    DimmerLight::new(1, config, output, store, ())
}

#[test]
fn dispatch_routes_commands() {
    let output = RecordingOutput::default();
    let store = MemoryStore::default();
    let mut light = dimmer(LightConfig::new(), output.clone(), store.clone());
    light.init(BootReason::PowerOn, T0);

    dispatch(&mut light, LightCommand::SetPower(true), T0);
    assert!(light.is_on());

    let request = StateRequest::new().with_brightness(25);
    dispatch(&mut light, LightCommand::SetState(request), T0);
    assert_eq!(light.brightness(), 25);

    // Rejected requests are logged and dropped
    dispatch(&mut light, LightCommand::SetBrightness(200), T0);
    assert_eq!(light.brightness(), 25);

    dispatch(
        &mut light,
        LightCommand::Input {
            event: InputEvent::LevelChange,
            level: true,
        },
        T0,
    );
    assert!(light.is_on());

    dispatch(&mut light, LightCommand::Flush, T0);
    assert!(!light.is_dirty());
    assert_eq!(store.save_count(), 1);
}

#[test]
fn dispatch_routes_color_commands() {
    let output = RecordingOutput::default();
    let mut light: RgbwLight<RecordingOutput, FakeInput, MemoryStore> = RgbwLight::new(
        2,
        LightConfig::new(),
        output.clone(),
        Some(FakeInput::default()),
        MemoryStore::default(),
        (),
    );
    light.init(BootReason::PowerOn, T0);
    output.clear();

    dispatch(&mut light, LightCommand::SetHue(200), T0);
    dispatch(&mut light, LightCommand::SetSaturation(40), T0);
    assert_eq!(light.hue(), 200);
    assert_eq!(light.saturation(), 40);
    assert_eq!(output.pushes(), 2);
    assert_eq!(output.last_source(), Some(ChangeSource::Hap));

    dispatch(&mut light, LightCommand::SetHue(400), T0);
    assert_eq!(light.hue(), 200);
    assert_eq!(output.pushes(), 2);
}

#[test]
fn dimmer_ignores_color_commands() {
    let output = RecordingOutput::default();
    let mut light = dimmer(LightConfig::new(), output.clone(), MemoryStore::default());
    light.init(BootReason::PowerOn, T0);
    output.clear();

    dispatch(&mut light, LightCommand::SetHue(200), T0);
    dispatch(&mut light, LightCommand::SetSaturation(40), T0);
    assert_eq!(output.pushes(), 0);
    assert!(!light.is_dirty());
    assert_eq!(light.config().hue, LightConfig::new().hue);
}

#[test]
fn task_serves_commands_and_auto_off() {
    static COMMANDS: LightCommandChannel<4> = Channel::new();

    let output = RecordingOutput::default();
    let store = MemoryStore::default();
    let config = LightConfig::new().with_auto_off(true, 0.2);
    let mut light = dimmer(config, output.clone(), store.clone());
    light.init(BootReason::PowerOn, Instant::now());

    COMMANDS.try_send(LightCommand::SetPower(true)).unwrap();
    block_on(select(
        run_light(&mut light, COMMANDS.receiver()),
        Timer::after(Duration::from_millis(600)),
    ));

    assert!(!light.is_on());
    assert_eq!(output.last_source(), Some(ChangeSource::AutoOff));
    assert_eq!(light.auto_off_deadline(), None);
}
