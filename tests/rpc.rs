//! JSON request codec tests.

mod common;

use common::{FakeInput, MemoryStore, RecordingOutput, T0};
use myrtio_light_accessory::{
    domain::{
        entity::{InputMode, LightConfig},
        types::{BootReason, ChangeSource},
    },
    light::{DimmerLight, LightAccessory, LightError, RgbwLight},
    rpc::{RpcError, info_json, set_config_json, set_state_json, status_line},
};

fn rgbw(output: RecordingOutput) -> RgbwLight<RecordingOutput, FakeInput, MemoryStore> {
    let config = LightConfig::new()
        .with_name("Desk")
        .with_in_mode(InputMode::Toggle);
    let mut light = RgbwLight::new(
        1,
        config,
        output,
        Some(FakeInput::default()),
        MemoryStore::default(),
        (),
    );
    light.init(BootReason::PowerOn, T0);
    light
}

#[test]
fn set_state_applies_as_one_push() {
    let output = RecordingOutput::default();
    let mut light = rgbw(output.clone());
    output.clear();

    let body = br#"{"state":true,"brightness":50,"hue":120,"saturation":100}"#;
    set_state_json(&mut light, body, T0).unwrap();

    assert_eq!(output.pushes(), 1);
    assert_eq!(output.last_source(), Some(ChangeSource::Rpc));
    assert!(light.is_on());
    assert_eq!(light.hue(), 120);
}

#[test]
fn set_state_accepts_subsets() {
    let mut light = rgbw(RecordingOutput::default());
    set_state_json(&mut light, br#"{"brightness":30}"#, T0).unwrap();
    assert_eq!(light.brightness(), 30);
    assert!(!light.is_on());
}

#[test]
fn malformed_payload_rejected() {
    let mut light = rgbw(RecordingOutput::default());
    assert_eq!(
        set_state_json(&mut light, br#"{"state":"yes"}"#, T0),
        Err(RpcError::Parse)
    );
    assert_eq!(
        set_config_json(&mut light, b"not json"),
        Err(RpcError::Parse)
    );
}

#[test]
fn out_of_range_value_reported() {
    let mut light = rgbw(RecordingOutput::default());
    assert_eq!(
        set_state_json(&mut light, br#"{"saturation":101}"#, T0),
        Err(RpcError::Light(LightError::InvalidArgument("saturation")))
    );
}

#[test]
fn set_config_reports_restart() {
    let mut light = rgbw(RecordingOutput::default());

    let outcome =
        set_config_json(&mut light, br#"{"name":"Shelf","auto_off":true,"auto_off_delay":5.5}"#)
            .unwrap();
    assert!(outcome.restart_required);
    assert_eq!(light.name(), "Shelf");
    assert!(light.config().auto_off);

    let outcome = set_config_json(&mut light, br#"{"auto_off_delay":10.0}"#).unwrap();
    assert!(!outcome.restart_required);

    let outcome = set_config_json(&mut light, br#"{"in_mode":2}"#).unwrap();
    assert!(outcome.restart_required);
    assert_eq!(light.in_mode(), InputMode::Edge);
}

#[test]
fn info_json_lists_rgbw_fields() {
    let mut light = rgbw(RecordingOutput::default());
    set_state_json(
        &mut light,
        br#"{"state":true,"brightness":50,"hue":120,"saturation":100}"#,
        T0,
    )
    .unwrap();

    let mut buf = [0u8; 256];
    let n = info_json(&mut light, &mut buf).unwrap();
    let json = core::str::from_utf8(&buf[..n]).unwrap();

    assert!(json.starts_with(
        r#"{"id":1,"type":1,"name":"Desk","state":true,"brightness":50,"hue":120,"saturation":100,"in_inverted":false,"initial":2,"in_mode":1,"auto_off":false,"auto_off_delay":"#
    ));
}

#[test]
fn info_json_skips_color_for_dimmer() {
    let mut light: DimmerLight<RecordingOutput, MemoryStore> = DimmerLight::new(
        4,
        LightConfig::new(),
        RecordingOutput::default(),
        MemoryStore::default(),
        (),
    );
    light.init(BootReason::PowerOn, T0);

    let mut buf = [0u8; 256];
    let n = info_json(&mut light, &mut buf).unwrap();
    let json = core::str::from_utf8(&buf[..n]).unwrap();

    assert!(json.starts_with(r#"{"id":4,"type":0,"name":"","state":false,"brightness":100,"initial":2,"#));
    assert!(!json.contains("hue"));
}

#[test]
fn info_json_needs_room() {
    let mut light = rgbw(RecordingOutput::default());
    let mut buf = [0u8; 16];
    assert_eq!(info_json(&mut light, &mut buf), Err(RpcError::Serialization));
}

#[test]
fn status_line_format() {
    let mut light = rgbw(RecordingOutput::default());
    set_state_json(
        &mut light,
        br#"{"state":true,"brightness":50,"hue":120,"saturation":100}"#,
        T0,
    )
    .unwrap();
    let line: heapless::String<64> = status_line(&mut light).unwrap();
    assert_eq!(line.as_str(), "sta: on, b: 50, h: 120, sa: 100");

    let mut dimmer: DimmerLight<RecordingOutput, MemoryStore> = DimmerLight::new(
        5,
        LightConfig::new(),
        RecordingOutput::default(),
        MemoryStore::default(),
        (),
    );
    dimmer.init(BootReason::PowerOn, T0);
    let line: heapless::String<64> = status_line(&mut dimmer).unwrap();
    assert_eq!(line.as_str(), "sta: off, b: 100");
}

#[test]
fn out_of_range_integers_reach_validation() {
    let mut light = rgbw(RecordingOutput::default());
    assert_eq!(
        set_state_json(&mut light, br#"{"brightness":300}"#, T0),
        Err(RpcError::Light(LightError::InvalidArgument("brightness")))
    );
    assert_eq!(
        set_state_json(&mut light, br#"{"hue":-1}"#, T0),
        Err(RpcError::Light(LightError::InvalidArgument("hue")))
    );
    assert_eq!(
        set_config_json(&mut light, br#"{"initial_state":300}"#),
        Err(RpcError::Light(LightError::InvalidArgument("initial_state")))
    );
    assert_eq!(light.brightness(), 100);
}

#[test]
fn config_name_escapes_are_decoded() {
    let mut light = rgbw(RecordingOutput::default());

    set_config_json(&mut light, br#"{"name":"Desk \"A\""}"#).unwrap();
    assert_eq!(light.name(), "Desk \"A\"");

    let mut buf = [0u8; 256];
    let n = info_json(&mut light, &mut buf).unwrap();
    let json = core::str::from_utf8(&buf[..n]).unwrap();
    assert!(json.contains(r#""name":"Desk \"A\"""#));

    set_config_json(&mut light, br#"{"name":"Caf\u00e9"}"#).unwrap();
    assert_eq!(light.name(), "Café");
}

#[test]
fn escaped_name_limit_counts_decoded_bytes() {
    let mut light = rgbw(RecordingOutput::default());

    // 55 plain bytes and 5 escaped quotes decode to 60 bytes
    let mut body = String::from(r#"{"name":""#);
    body.push_str(&"a".repeat(55));
    body.push_str(&r#"\""#.repeat(5));
    body.push_str(r#""}"#);
    set_config_json(&mut light, body.as_bytes()).unwrap();
    assert_eq!(light.name().len(), 60);

    let mut body = String::from(r#"{"name":""#);
    body.push_str(&"b".repeat(60));
    body.push_str(&r#"\""#.repeat(5));
    body.push_str(r#""}"#);
    assert!(matches!(
        set_config_json(&mut light, body.as_bytes()),
        Err(RpcError::Light(LightError::InvalidArgument(_)))
    ));
    assert_eq!(light.name().len(), 60);
}
