//! Integration test: interlocked solenoids sharing a supply.

use solenoid_common::prelude::*;
use solenoid_drive::{SolenoidController, StateEvent};

use super::{Bus, ms, pulses, run_until_idle, state};

/// Brake-high DC valve: pin B is high exactly while energised.
fn dc() -> SolenoidConfig {
    SolenoidConfig::new(SolenoidType::Dc, 100).with_brake_is_high(true)
}

/// Two DC valves interlocked both ways on channels 0 and 1.
fn pair(wait_ms: u32) -> (SolenoidController<Bus>, ActuatorId, ActuatorId) {
    let mut c = SolenoidController::new(Bus::new());
    let a = c
        .add_solenoid(
            "a",
            dc(),
            DriveOutputs::two_pin(AnalogChannel(0), DigitalChannel(0)),
            RestoreMode::AlwaysOff,
        )
        .unwrap();
    let b = c
        .add_solenoid(
            "b",
            dc(),
            DriveOutputs::two_pin(AnalogChannel(1), DigitalChannel(1)),
            RestoreMode::AlwaysOff,
        )
        .unwrap();
    c.set_interlock(a, &[a, b], wait_ms).unwrap();
    c.set_interlock(b, &[a, b], wait_ms).unwrap();
    (c, a, b)
}

fn on_events(events: &[StateEvent], id: ActuatorId) -> usize {
    events.iter().filter(|e| e.actuator == id && e.state).count()
}

#[test]
fn zero_wait_swaps_in_one_step() {
    let (mut c, a, b) = pair(0);
    c.turn_on(b).unwrap();
    c.take_events();

    c.turn_on(a).unwrap();
    assert_eq!(c.state(a), Some(true));
    assert_eq!(c.state(b), Some(false));
    assert!(state(&c, 0));
    assert!(!state(&c, 1));

    let events = c.take_events();
    assert_eq!(
        events,
        vec![
            StateEvent {
                actuator: b,
                state: false,
                at: ms(0)
            },
            StateEvent {
                actuator: a,
                state: true,
                at: ms(0)
            },
        ]
    );
}

#[test]
fn wait_time_defers_activation() {
    let (mut c, a, b) = pair(100);
    c.turn_on(b).unwrap();

    c.turn_on(a).unwrap();
    assert_eq!(c.state(b), Some(false));
    assert_eq!(c.state(a), Some(false));
    assert!(!state(&c, 0));
    assert!(!state(&c, 1));

    c.advance(ms(99));
    assert_eq!(c.state(a), Some(false));

    c.advance(ms(1));
    assert_eq!(c.state(a), Some(true));
    assert!(state(&c, 0));
}

#[test]
fn off_during_wait_cancels_activation() {
    let (mut c, a, b) = pair(100);
    c.turn_on(b).unwrap();
    c.turn_on(a).unwrap();
    c.advance(ms(50));
    c.turn_off(a).unwrap();
    c.advance(ms(500));

    assert_eq!(c.state(a), Some(false));
    assert_eq!(on_events(&c.take_events(), a), 0);
    assert!(!state(&c, 0));
}

#[test]
fn no_conflict_activates_immediately() {
    let (mut c, a, _) = pair(100);
    c.turn_on(a).unwrap();
    assert_eq!(c.state(a), Some(true));
}

#[test]
fn self_membership_never_turns_itself_off() {
    let (mut c, a, _) = pair(0);
    c.turn_on(a).unwrap();
    c.turn_on(a).unwrap();
    assert_eq!(c.state(a), Some(true));
    let events = c.take_events();
    assert!(events.iter().all(|e| e.state));
}

#[test]
fn recheck_reissues_full_command() {
    let (mut c, a, b) = pair(100);
    c.turn_on(b).unwrap();
    c.turn_on(a).unwrap();

    // b comes back while a waits; a is off, so b proceeds.
    c.advance(ms(40));
    c.turn_on(b).unwrap();
    assert_eq!(c.state(b), Some(true));

    // The re-check runs the interlock again and defers once more.
    c.advance(ms(60));
    assert_eq!(c.state(b), Some(false));
    assert_eq!(c.state(a), Some(false));

    c.advance(ms(100));
    assert_eq!(c.state(a), Some(true));
    assert_eq!(c.state(b), Some(false));
}

#[test]
fn one_way_interlock_only_guards_owner() {
    let mut c = SolenoidController::new(Bus::new());
    let wiring = |n| DriveOutputs::two_pin(AnalogChannel(n), DigitalChannel(n));
    let pump = c
        .add_solenoid("pump", dc(), wiring(0), RestoreMode::AlwaysOff)
        .unwrap();
    let drain = c
        .add_solenoid("drain", dc(), wiring(1), RestoreMode::AlwaysOff)
        .unwrap();
    c.set_interlock(pump, &[drain], 0).unwrap();

    c.turn_on(pump).unwrap();
    c.turn_on(drain).unwrap();
    assert_eq!(c.state(pump), Some(true));
    assert_eq!(c.state(drain), Some(true));

    c.turn_on(pump).unwrap();
    assert_eq!(c.state(drain), Some(false));
}

#[test]
fn latching_peer_is_pulsed_off_before_deferred_activation() {
    let mut c = SolenoidController::new(Bus::new());
    let valve = c
        .add_solenoid(
            "valve",
            dc(),
            DriveOutputs::two_pin(AnalogChannel(0), DigitalChannel(0)),
            RestoreMode::AlwaysOff,
        )
        .unwrap();
    let latch = c
        .add_solenoid(
            "latch",
            SolenoidConfig::new(SolenoidType::DcLatching, 30).with_redo(1, 50),
            DriveOutputs::two_pin(AnalogChannel(1), DigitalChannel(1)),
            RestoreMode::AlwaysOff,
        )
        .unwrap();
    c.set_interlock(valve, &[latch], 200).unwrap();

    c.turn_on(latch).unwrap();
    run_until_idle(&mut c);
    let before = pulses(&c, latch);

    c.turn_on(valve).unwrap();
    assert_eq!(c.state(latch), Some(false));
    assert_eq!(c.state(valve), Some(false));
    assert_eq!(pulses(&c, latch), before + 1);

    c.advance(ms(200));
    assert_eq!(c.state(valve), Some(true));
    assert!(state(&c, 0));

    run_until_idle(&mut c);
    assert_eq!(pulses(&c, latch), before + 2);
    assert_eq!(c.redo_counter(latch), Some(0));
    assert_eq!(c.redo_counter(valve), Some(0));
}
