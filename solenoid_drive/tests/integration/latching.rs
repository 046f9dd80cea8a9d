//! Integration test: DC-latching pulse trains.

use solenoid_common::prelude::*;
use solenoid_drive::SolenoidController;

use super::{Bus, level, ms, pulses, run_until_idle, state};

const A: u16 = 0;
const B: u16 = 1;
const EN: u16 = 2;

fn latching(redo: u8, interval_ms: u16, pulse_ms: u16) -> SolenoidConfig {
    SolenoidConfig::new(SolenoidType::DcLatching, pulse_ms).with_redo(redo, interval_ms)
}

fn bank(config: SolenoidConfig, wiring: DriveOutputs) -> (SolenoidController<Bus>, ActuatorId) {
    let mut c = SolenoidController::new(Bus::new());
    let id = c
        .add_solenoid("latch", config, wiring, RestoreMode::AlwaysOff)
        .unwrap();
    (c, id)
}

fn three_pin() -> DriveOutputs {
    DriveOutputs::three_pin(AnalogChannel(A), DigitalChannel(B), DigitalChannel(EN))
}

fn two_pin() -> DriveOutputs {
    DriveOutputs::two_pin(AnalogChannel(A), DigitalChannel(B))
}

#[test]
fn pulse_train_timing_and_settle() {
    let (mut c, id) = bank(latching(2, 50, 30), three_pin());

    c.turn_on(id).unwrap();
    let mut pulse_times = vec![c.now()];
    let mut seen = pulses(&c, id);
    let mut settled_at = None;

    while let Some(deadline) = c.next_deadline() {
        c.advance(deadline - c.now());
        if pulses(&c, id) != seen {
            seen = pulses(&c, id);
            pulse_times.push(c.now());
        }
        if settled_at.is_none() && c.timers().is_empty() {
            settled_at = Some(c.now());
        }
    }

    assert_eq!(pulse_times, vec![ms(0), ms(80), ms(160)]);
    assert_eq!(settled_at, Some(ms(190 + 1000)));
    assert_eq!(c.redo_counter(id), Some(0));

    // Settled: bridge disabled, both legs at coast (brake is high).
    assert!(!state(&c, EN));
    assert_eq!(level(&c, A), 0.0);
    assert!(!state(&c, B));
}

#[test]
fn one_plus_redo_pulses_for_any_count() {
    for redo in 0..=5u8 {
        let (mut c, id) = bank(latching(redo, 50, 30), three_pin());
        c.turn_on(id).unwrap();
        run_until_idle(&mut c);
        assert_eq!(pulses(&c, id), 1 + u32::from(redo), "redo={redo}");
        assert_eq!(c.redo_counter(id), Some(0), "redo={redo}");
    }
}

#[test]
fn release_holds_brake_pair_between_pulses() {
    let (mut c, id) = bank(latching(1, 50, 30), two_pin());

    c.turn_on(id).unwrap();
    assert_eq!(level(&c, A), 0.0);
    assert!(state(&c, B));

    c.advance(ms(30));
    assert_eq!(level(&c, A), 1.0);
    assert!(state(&c, B));
    assert_eq!(c.redo_counter(id), Some(1));
}

#[test]
fn two_pin_driver_stays_at_brake_pair() {
    let (mut c, id) = bank(latching(2, 50, 30), two_pin());
    c.turn_on(id).unwrap();
    run_until_idle(&mut c);

    assert_eq!(pulses(&c, id), 3);
    assert_eq!(level(&c, A), 1.0);
    assert!(state(&c, B));
    assert!(c.timers().is_empty());
}

#[test]
fn interrupting_command_restarts_sequence() {
    let (mut c, id) = bank(latching(2, 50, 30).with_brake_is_high(false), two_pin());

    c.turn_on(id).unwrap();
    c.advance(ms(40));
    assert_eq!(c.redo_counter(id), Some(1));

    c.turn_off(id).unwrap();
    assert_eq!(c.redo_counter(id), Some(0));
    // Brake low: OFF pulse is A low, B high.
    assert_eq!(level(&c, A), 0.0);
    assert!(state(&c, B));

    run_until_idle(&mut c);
    assert_eq!(pulses(&c, id), 1 + 3);
    assert_eq!(c.redo_counter(id), Some(0));
    assert_eq!(c.state(id), Some(false));
}

#[test]
fn inverted_latch_pulses_off_direction() {
    let (mut c, id) = bank(latching(0, 50, 30).with_inverted(true), two_pin());
    c.turn_on(id).unwrap();
    // Physical OFF with brake high: A high, B low.
    assert_eq!(level(&c, A), 1.0);
    assert!(!state(&c, B));
}
