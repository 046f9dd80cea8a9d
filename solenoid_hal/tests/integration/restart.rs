//! Integration test: states persisted across a simulated restart.

use solenoid_hal::{LoadedBank, PersistedState, Runner, StatePersistence, parse_script};
use std::time::Duration;
use tempfile::tempdir;

use super::{GARDEN, bank_file};

#[test]
fn restore_modes_use_saved_states() {
    let file = bank_file(GARDEN);
    let dir = tempdir().unwrap();
    let persistence = StatePersistence::new(dir.path().join("state.bin"));

    // First run: nothing stored yet.
    let mut bank = LoadedBank::load(file.path()).unwrap();
    let recovered = persistence.load().unwrap().unwrap_or_else(PersistedState::new);
    bank.controller.setup(&recovered).unwrap();
    let mut runner = Runner::new(
        bank.controller,
        parse_script(&["beds=on@0", "master=on@0"]).unwrap(),
    );
    runner.run_virtual(Duration::from_millis(100)).unwrap();
    persistence
        .save(&PersistedState::capture(runner.controller()))
        .unwrap();

    // Second run: beds restores ON, master is always_off.
    let mut bank = LoadedBank::load(file.path()).unwrap();
    let recovered = persistence.load().unwrap().unwrap();
    bank.controller.setup(&recovered).unwrap();

    let id = |name| bank.controller.id_of(name).unwrap();
    assert_eq!(bank.controller.state(id("beds")), Some(true));
    assert_eq!(bank.controller.state(id("lawn")), Some(false));
    assert_eq!(bank.controller.state(id("master")), Some(false));
}
