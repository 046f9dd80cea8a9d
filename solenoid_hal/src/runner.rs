//! Command script runner.
//!
//! Replays a [`ScriptCommand`] list against a controller, either on the
//! virtual clock (as fast as possible) or paced by the wall clock.

use serde::Serialize;
use solenoid_common::hal::types::OutputSnapshot;
use solenoid_drive::SolenoidController;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::drivers::SimulatedOutputs;
use crate::error::HalError;
use crate::script::ScriptCommand;

/// Longest sleep of the real-time loop, bounds shutdown latency.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// A published state change, by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    /// Milliseconds since setup.
    pub at_ms: u64,
    /// Solenoid name.
    pub name: String,
    /// Published logical state.
    pub state: bool,
}

/// Outcome of a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Controller clock at the end of the run.
    pub elapsed_ms: u64,
    /// Script commands issued.
    pub commands: usize,
    /// Timers fired.
    pub timers_fired: usize,
    /// Every state publication, in order.
    pub events: Vec<EventRecord>,
    /// Final logical states.
    pub states: BTreeMap<String, bool>,
    /// Final output levels.
    pub outputs: OutputSnapshot,
}

/// Replays a script against a simulated bank.
pub struct Runner {
    controller: SolenoidController<SimulatedOutputs>,
    script: Vec<ScriptCommand>,
    next: usize,
    timers_fired: usize,
    events: Vec<EventRecord>,
}

impl Runner {
    /// Runner for a set-up `controller`. `script` must be sorted by time.
    pub fn new(controller: SolenoidController<SimulatedOutputs>, script: Vec<ScriptCommand>) -> Self {
        let mut runner = Self {
            controller,
            script,
            next: 0,
            timers_fired: 0,
            events: Vec::new(),
        };
        runner.collect_events();
        runner
    }

    /// The controller being driven.
    pub fn controller(&self) -> &SolenoidController<SimulatedOutputs> {
        &self.controller
    }

    /// Consume the runner, returning the controller.
    pub fn into_controller(self) -> SolenoidController<SimulatedOutputs> {
        self.controller
    }

    fn collect_events(&mut self) {
        for event in self.controller.take_events() {
            let name = self
                .controller
                .solenoid(event.actuator)
                .map(|s| s.name().to_string())
                .unwrap_or_default();
            self.events.push(EventRecord {
                at_ms: event.at.as_millis() as u64,
                name,
                state: event.state,
            });
        }
    }

    fn advance_to(&mut self, t: Duration) {
        let now = self.controller.now();
        if t > now {
            self.timers_fired += self.controller.advance(t - now);
        }
        self.collect_events();
    }

    fn next_command_at(&self) -> Option<Duration> {
        self.script.get(self.next).map(|c| c.at)
    }

    /// Issue every command due at or before `upto`, each at its own time.
    fn apply_due(&mut self, upto: Duration) -> Result<(), HalError> {
        while let Some(at) = self.next_command_at().filter(|at| *at <= upto) {
            self.advance_to(at);
            let command = &self.script[self.next];
            debug!("t={}ms {command}", at.as_millis());
            command.apply(&mut self.controller)?;
            self.next += 1;
            self.collect_events();
        }
        Ok(())
    }

    /// Run `duration` of virtual time.
    pub fn run_virtual(&mut self, duration: Duration) -> Result<(), HalError> {
        info!("Running {}ms on the virtual clock", duration.as_millis());
        let end = self.controller.now() + duration;
        self.apply_due(end)?;
        self.advance_to(end);
        Ok(())
    }

    /// Run `duration` paced by the wall clock, or until `running` clears.
    pub fn run_realtime(&mut self, duration: Duration, running: &AtomicBool) -> Result<(), HalError> {
        info!("Running {}ms in real time", duration.as_millis());
        let origin = self.controller.now();
        let end = origin + duration;
        let start = Instant::now();

        while running.load(Ordering::SeqCst) {
            let now = (origin + start.elapsed()).min(end);
            self.apply_due(now)?;
            self.advance_to(now);
            if now >= end {
                break;
            }

            let wake = [self.next_command_at(), self.controller.next_deadline(), Some(end)]
                .into_iter()
                .flatten()
                .min()
                .unwrap_or(end);
            std::thread::sleep(wake.saturating_sub(now).min(POLL_INTERVAL));
        }

        if !running.load(Ordering::SeqCst) {
            info!("Run interrupted at {}ms", self.controller.now().as_millis());
        }
        Ok(())
    }

    /// Summary of the run so far.
    pub fn report(&self) -> RunReport {
        RunReport {
            elapsed_ms: self.controller.now().as_millis() as u64,
            commands: self.next,
            timers_fired: self.timers_fired,
            events: self.events.clone(),
            states: self
                .controller
                .solenoids()
                .iter()
                .map(|s| (s.name().to_string(), s.state()))
                .collect(),
            outputs: self.controller.outputs().snapshot().clone(),
        }
    }
}
