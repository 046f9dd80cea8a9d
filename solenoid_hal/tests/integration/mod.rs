//! Shared fixtures for the HAL integration tests.

mod garden;
mod restart;

use std::io::Write;
use tempfile::NamedTempFile;

/// Two zone valves sharing a pump supply, plus a latching master valve.
pub const GARDEN: &str = r#"
[shared]
service_name = "garden"
log_level = "debug"

[outputs]
analog = 3
digital = 4

[[solenoid]]
name = "lawn"
solenoid_type = "DC"
pin_a = 0
pin_b = 0
brake_is_high = true
energise_duration_ms = 200
energise_power_percent = 0.8
hold_power_percent = 0.3
restore_mode = "restore_default_off"
interlock = ["beds"]
interlock_wait_time_ms = 500

[[solenoid]]
name = "beds"
solenoid_type = "DC"
pin_a = 1
pin_b = 1
brake_is_high = true
energise_duration_ms = 200
energise_power_percent = 0.8
hold_power_percent = 0.3
restore_mode = "restore_default_off"
interlock = ["lawn"]
interlock_wait_time_ms = 500

[[solenoid]]
name = "master"
solenoid_type = "DC_LATCHING"
pin_a = 2
pin_b = 2
h_bridge_enable_pin = 3
brake_is_high = true
energise_duration_ms = 30
dc_latch_redo_count = 2
dc_latch_redo_interval_ms = 500
restore_mode = "always_off"
"#;

pub fn bank_file(content: &str) -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(content.as_bytes()).unwrap();
    f
}
