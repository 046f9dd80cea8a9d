//! Integration test: garden bank driven by a script.

use solenoid_common::prelude::*;
use solenoid_drive::NoRecovery;
use solenoid_hal::{LoadedBank, Runner, parse_script};
use std::time::Duration;

use super::{GARDEN, bank_file};

fn runner(script: &[&str]) -> Runner {
    let file = bank_file(GARDEN);
    let mut bank = LoadedBank::load(file.path()).unwrap();
    assert_eq!(bank.config.shared.log_level, LogLevel::Debug);
    bank.controller.setup(&NoRecovery).unwrap();
    Runner::new(bank.controller, parse_script(script).unwrap())
}

#[test]
fn zone_swap_waits_for_interlock() {
    let mut runner = runner(&["lawn=on@0", "beds=on@1000"]);
    runner.run_virtual(Duration::from_millis(3000)).unwrap();

    let report = runner.report();
    let timeline: Vec<(u64, &str, bool)> = report
        .events
        .iter()
        .filter(|e| e.name != "master")
        .map(|e| (e.at_ms, e.name.as_str(), e.state))
        .collect();
    assert_eq!(
        timeline,
        vec![
            (0, "lawn", false),
            (0, "beds", false),
            (0, "lawn", true),
            (1000, "lawn", false),
            (1500, "beds", true),
        ]
    );

    // beds holding, lawn coasting.
    let outputs = runner.controller().outputs();
    assert!((outputs.level(AnalogChannel(1)).unwrap() - 0.7).abs() < 1e-9);
    assert_eq!(outputs.state(DigitalChannel(1)), Some(true));
    assert_eq!(outputs.level(AnalogChannel(0)), Some(0.0));
    assert_eq!(outputs.state(DigitalChannel(0)), Some(false));
    assert_eq!(outputs.rejected_writes(), 0);
}

#[test]
fn master_valve_pulses_then_settles() {
    let mut runner = runner(&["master=on@100"]);
    runner.run_virtual(Duration::from_millis(5000)).unwrap();

    let outputs = runner.controller().outputs();
    let pulses = outputs
        .journal()
        .iter()
        .filter(|w| {
            matches!(w, OutputWrite::State { channel: DigitalChannel(3), state: true })
        })
        .count();
    // One OFF pulse from setup, interrupted at 100ms, then three ON pulses.
    assert_eq!(pulses, 4);

    // Settled: enable off, both legs at coast.
    assert_eq!(outputs.state(DigitalChannel(3)), Some(false));
    assert_eq!(outputs.level(AnalogChannel(2)), Some(0.0));
    assert_eq!(outputs.state(DigitalChannel(2)), Some(false));
    assert!(runner.report().states["master"]);
}

#[test]
fn report_serializes_to_json() {
    let mut runner = runner(&["lawn=toggle@10"]);
    runner.run_virtual(Duration::from_millis(500)).unwrap();
    let json = serde_json::to_value(runner.report()).unwrap();

    assert_eq!(json["elapsed_ms"], 500);
    assert_eq!(json["commands"], 1);
    assert_eq!(json["states"]["lawn"], true);
    assert_eq!(json["outputs"]["digital"][0], true);
}
