//! Integration test: AC/DC energise and hold.

use solenoid_common::prelude::*;
use solenoid_drive::SolenoidController;

use super::{Bus, approx, level, ms, state};

const A: u16 = 0;
const B: u16 = 1;
const EN: u16 = 2;

fn dc_brake_high() -> SolenoidConfig {
    SolenoidConfig::new(SolenoidType::Dc, 200)
        .with_brake_is_high(true)
        .with_power(0.8, 0.3)
}

fn bank(config: SolenoidConfig, wiring: DriveOutputs) -> (SolenoidController<Bus>, ActuatorId) {
    let mut c = SolenoidController::new(Bus::new());
    let id = c
        .add_solenoid("valve", config, wiring, RestoreMode::AlwaysOff)
        .unwrap();
    (c, id)
}

fn two_pin() -> DriveOutputs {
    DriveOutputs::two_pin(AnalogChannel(A), DigitalChannel(B))
}

#[test]
fn dc_energise_then_hold() {
    let (mut c, id) = bank(dc_brake_high(), two_pin());

    c.turn_on(id).unwrap();
    assert!(approx(level(&c, A), 0.2));
    assert!(state(&c, B));
    assert_eq!(c.state(id), Some(true));

    c.advance(ms(199));
    assert!(approx(level(&c, A), 0.2));

    assert_eq!(c.advance(ms(1)), 1);
    assert!(approx(level(&c, A), 0.7));

    c.turn_off(id).unwrap();
    assert_eq!(level(&c, A), 0.0);
    assert!(!state(&c, B));
    assert_eq!(c.state(id), Some(false));
}

#[test]
fn off_before_hold_never_writes_hold_level() {
    let (mut c, id) = bank(dc_brake_high(), two_pin());

    c.turn_on(id).unwrap();
    c.advance(ms(100));
    c.turn_off(id).unwrap();
    assert!(c.timers().is_empty());

    c.advance(ms(1000));
    let wrote_hold = c.outputs().journal.iter().any(|w| match *w {
        OutputWrite::Level { level, .. } => approx(level, 0.7),
        OutputWrite::State { .. } => false,
    });
    assert!(!wrote_hold);
}

#[test]
fn repeated_on_restarts_energise_phase() {
    let (mut c, id) = bank(dc_brake_high(), two_pin());

    c.turn_on(id).unwrap();
    c.advance(ms(150));
    c.turn_on(id).unwrap();
    c.advance(ms(100));
    assert!(approx(level(&c, A), 0.2));
    c.advance(ms(100));
    assert!(approx(level(&c, A), 0.7));
}

#[test]
fn ac_with_enable_disables_before_reshaping() {
    let config = SolenoidConfig::new(SolenoidType::Ac, 50)
        .with_brake_is_high(false)
        .with_power(1.0, 0.4);
    let wiring = DriveOutputs::three_pin(AnalogChannel(A), DigitalChannel(B), DigitalChannel(EN));
    let (mut c, id) = bank(config, wiring);

    c.turn_on(id).unwrap();
    assert!(state(&c, EN));
    assert!(!state(&c, B));
    assert!(approx(level(&c, A), 1.0));
    c.advance(ms(50));
    assert!(approx(level(&c, A), 0.4));

    c.outputs_mut().journal.clear();
    c.turn_off(id).unwrap();
    assert_eq!(
        c.outputs().journal,
        vec![
            OutputWrite::State {
                channel: DigitalChannel(EN),
                state: false
            },
            OutputWrite::State {
                channel: DigitalChannel(B),
                state: true
            },
            OutputWrite::Level {
                channel: AnalogChannel(A),
                level: 1.0
            },
        ]
    );
}

#[test]
fn inverted_logical_on_is_physical_off() {
    let (mut c, id) = bank(dc_brake_high().with_inverted(true), two_pin());

    c.turn_on(id).unwrap();
    assert_eq!(c.state(id), Some(true));
    assert_eq!(level(&c, A), 0.0);
    assert!(c.timers().is_empty());

    c.turn_off(id).unwrap();
    assert_eq!(c.state(id), Some(false));
    assert!(approx(level(&c, A), 0.2));
    c.advance(ms(200));
    assert!(approx(level(&c, A), 0.7));
}
