//! Bank controller: solenoid arena, command dispatch, timer dispatch.
//!
//! # Command path
//!
//! 1. Inversion maps the logical state to a physical one.
//! 2. Physical ON asks the interlock coordinator, which may force peers
//!    OFF and defer. Physical OFF cancels any deferred activation.
//! 3. The drive strategy runs.
//! 4. The logical state is published as a [`StateEvent`].
//!
//! Deferred interlock re-checks re-enter at step 1 with the originally
//! requested state. Deferred drive steps see the solenoid's live state.

use std::time::Duration;

use solenoid_common::consts::MAX_SOLENOIDS;
use solenoid_common::hal::output::{DriveOutputs, OutputBus};
use solenoid_common::solenoid::bank::BankConfig;
use solenoid_common::solenoid::config::{ActuatorId, SolenoidConfig, SolenoidType};
use solenoid_common::solenoid::restore::RestoreMode;
use tracing::{debug, info, warn};

use crate::drive::{DriveContext, DriveStrategy};
use crate::error::SolenoidError;
use crate::interlock::{Activation, InterlockCoordinator, InterlockGroup, InterlockPeers};
use crate::restore::StateRecovery;
use crate::timer::{Continuation, FiredTimer, Scheduler, TimerQueue};

// ─── Solenoid ───────────────────────────────────────────────────────

/// One registered solenoid.
#[derive(Debug, Clone)]
pub struct Solenoid {
    id: ActuatorId,
    name: String,
    config: SolenoidConfig,
    wiring: DriveOutputs,
    restore_mode: RestoreMode,
    drive: DriveStrategy,
    state: bool,
}

impl Solenoid {
    /// Arena id.
    #[inline]
    pub fn id(&self) -> ActuatorId {
        self.id
    }

    /// Name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Drive parameters.
    #[inline]
    pub fn config(&self) -> &SolenoidConfig {
        &self.config
    }

    /// Output wiring.
    #[inline]
    pub fn wiring(&self) -> &DriveOutputs {
        &self.wiring
    }

    /// Power-on policy.
    #[inline]
    pub fn restore_mode(&self) -> RestoreMode {
        self.restore_mode
    }

    /// Drive sequence.
    #[inline]
    pub fn drive(&self) -> &DriveStrategy {
        &self.drive
    }

    /// Last published logical state.
    #[inline]
    pub fn state(&self) -> bool {
        self.state
    }
}

/// A published logical state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateEvent {
    /// Solenoid that changed.
    pub actuator: ActuatorId,
    /// Published logical state.
    pub state: bool,
    /// Controller clock at publication.
    pub at: Duration,
}

// ─── Runtime ────────────────────────────────────────────────────────

/// Everything a command mutates. Interlock groups live outside so the
/// recursive peer OFF commands can borrow them while this is mutated.
#[derive(Debug)]
struct Runtime<O: OutputBus> {
    solenoids: Vec<Solenoid>,
    outputs: O,
    timers: TimerQueue,
    events: Vec<StateEvent>,
}

impl<O: OutputBus> Runtime<O> {
    fn command(&mut self, interlocks: &[InterlockCoordinator], id: ActuatorId, desired: bool) {
        let idx = id.index();
        let (Some(solenoid), Some(interlock)) = (self.solenoids.get(idx), interlocks.get(idx)) else {
            warn!("command for unknown actuator {id}");
            return;
        };
        let physical = solenoid.config.physical_state(desired);

        if physical {
            let mut peers = Peers {
                runtime: &mut *self,
                interlocks,
            };
            if interlock.request_activation(desired, &mut peers) == Activation::Deferred {
                debug!("{id} activation deferred by interlock");
                return;
            }
        } else {
            interlock.release(&mut self.timers);
        }

        let Runtime {
            solenoids,
            outputs,
            timers,
            events,
        } = self;
        let Some(solenoid) = solenoids.get_mut(idx) else {
            return;
        };
        let at = timers.now();
        solenoid.drive.drive(physical, &mut DriveContext { outputs, timers });
        solenoid.state = desired;
        info!("'{}' -> {}", solenoid.name, if desired { "ON" } else { "OFF" });
        events.push(StateEvent {
            actuator: id,
            state: desired,
            at,
        });
    }

    fn dispatch(&mut self, interlocks: &[InterlockCoordinator], timer: FiredTimer) {
        let id = timer.key.actuator;
        match timer.continuation {
            Continuation::Interlock { desired } => {
                debug!("{id} interlock re-check");
                self.command(interlocks, id, desired);
            }
            Continuation::Drive(step) => {
                let Runtime {
                    solenoids,
                    outputs,
                    timers,
                    ..
                } = self;
                let Some(solenoid) = solenoids.get_mut(id.index()) else {
                    warn!("timer for unknown actuator {id}");
                    return;
                };
                let live = solenoid.config.physical_state(solenoid.state);
                solenoid
                    .drive
                    .on_timer(step, live, &mut DriveContext { outputs, timers });
            }
        }
    }
}

/// Interlock view of the bank during one command.
struct Peers<'a, O: OutputBus> {
    runtime: &'a mut Runtime<O>,
    interlocks: &'a [InterlockCoordinator],
}

impl<O: OutputBus> InterlockPeers for Peers<'_, O> {
    fn is_on(&self, peer: ActuatorId) -> bool {
        self.runtime
            .solenoids
            .get(peer.index())
            .is_some_and(|s| s.state)
    }

    fn command_off(&mut self, peer: ActuatorId) {
        self.runtime.command(self.interlocks, peer, false);
    }

    fn timers(&mut self) -> &mut dyn Scheduler {
        &mut self.runtime.timers
    }
}

// ─── SolenoidController ─────────────────────────────────────────────

/// A bank of solenoids sharing one output bus and one timer queue.
///
/// Solenoids and interlocks are registered first; after [`setup`] or the
/// first command the configuration is fixed.
///
/// [`setup`]: SolenoidController::setup
#[derive(Debug)]
pub struct SolenoidController<O: OutputBus> {
    interlocks: Vec<InterlockCoordinator>,
    runtime: Runtime<O>,
    running: bool,
}

impl<O: OutputBus> SolenoidController<O> {
    /// Empty bank writing to `outputs`.
    pub fn new(outputs: O) -> Self {
        Self {
            interlocks: Vec::new(),
            runtime: Runtime {
                solenoids: Vec::new(),
                outputs,
                timers: TimerQueue::new(),
                events: Vec::new(),
            },
            running: false,
        }
    }

    /// Build a bank from a validated configuration file.
    pub fn from_bank(bank: &BankConfig, outputs: O) -> Result<Self, SolenoidError> {
        let mut controller = Self::new(outputs);
        for entry in &bank.solenoids {
            controller.add_solenoid(
                entry.name.clone(),
                entry.solenoid_config(),
                entry.drive_outputs(),
                entry.restore_mode,
            )?;
        }
        for entry in &bank.solenoids {
            if entry.interlock.is_empty() {
                continue;
            }
            let owner = controller.require_name(&entry.name)?;
            let members = entry
                .interlock
                .iter()
                .map(|name| controller.require_name(name))
                .collect::<Result<Vec<_>, _>>()?;
            controller.set_interlock(owner, &members, entry.interlock_wait_time_ms)?;
        }
        Ok(controller)
    }

    fn ensure_configurable(&self) -> Result<(), SolenoidError> {
        if self.running {
            Err(SolenoidError::AlreadyRunning)
        } else {
            Ok(())
        }
    }

    fn require(&self, id: ActuatorId) -> Result<&Solenoid, SolenoidError> {
        self.runtime
            .solenoids
            .get(id.index())
            .ok_or(SolenoidError::UnknownActuator(id))
    }

    fn require_name(&self, name: &str) -> Result<ActuatorId, SolenoidError> {
        self.id_of(name)
            .ok_or_else(|| SolenoidError::UnknownName(name.to_string()))
    }

    /// Register a solenoid. It starts OFF with nothing written until
    /// [`setup`](Self::setup) or a command.
    pub fn add_solenoid(
        &mut self,
        name: impl Into<String>,
        config: SolenoidConfig,
        wiring: DriveOutputs,
        restore_mode: RestoreMode,
    ) -> Result<ActuatorId, SolenoidError> {
        self.ensure_configurable()?;
        let name = name.into();
        config.validate()?;
        if self.id_of(&name).is_some() {
            return Err(SolenoidError::DuplicateName(name));
        }
        let count = self.runtime.solenoids.len();
        if count >= MAX_SOLENOIDS {
            return Err(SolenoidError::TooManySolenoids { max: MAX_SOLENOIDS });
        }

        let id = ActuatorId(count as u16);
        let drive = DriveStrategy::new(id, &config, wiring);
        debug!("registered '{name}' as {id} ({})", config.solenoid_type);
        self.runtime.solenoids.push(Solenoid {
            id,
            name,
            config,
            wiring,
            restore_mode,
            drive,
            state: false,
        });
        self.interlocks
            .push(InterlockCoordinator::new(id, InterlockGroup::new(0)));
        Ok(id)
    }

    /// Replace the interlock group of `id`.
    pub fn set_interlock(
        &mut self,
        id: ActuatorId,
        members: &[ActuatorId],
        wait_time_ms: u32,
    ) -> Result<(), SolenoidError> {
        self.ensure_configurable()?;
        self.require(id)?;
        let mut group = InterlockGroup::new(wait_time_ms);
        for member in members {
            self.require(*member)?;
            group.push(id, *member)?;
        }
        self.interlocks[id.index()] = InterlockCoordinator::new(id, group);
        Ok(())
    }

    /// Drive every solenoid to its power-on state, in registration order.
    pub fn setup(&mut self, recovery: &dyn StateRecovery) -> Result<(), SolenoidError> {
        self.ensure_configurable()?;
        self.running = true;
        for idx in 0..self.runtime.solenoids.len() {
            let solenoid = &self.runtime.solenoids[idx];
            let mode = solenoid.restore_mode;
            let recovered = if mode.uses_recovery() {
                recovery.recover(&solenoid.name)
            } else {
                None
            };
            let initial = mode.initial_state(recovered).unwrap_or(false);
            info!("setting up '{}' ({mode:?}) -> {}", solenoid.name, initial);
            let id = solenoid.id;
            self.runtime.command(&self.interlocks, id, initial);
        }
        Ok(())
    }

    /// Command the logical state of `id`.
    pub fn command_state(&mut self, id: ActuatorId, desired: bool) -> Result<(), SolenoidError> {
        self.require(id)?;
        self.running = true;
        self.runtime.command(&self.interlocks, id, desired);
        Ok(())
    }

    /// Command `id` ON.
    pub fn turn_on(&mut self, id: ActuatorId) -> Result<(), SolenoidError> {
        self.command_state(id, true)
    }

    /// Command `id` OFF.
    pub fn turn_off(&mut self, id: ActuatorId) -> Result<(), SolenoidError> {
        self.command_state(id, false)
    }

    /// Command the opposite of the published state of `id`.
    pub fn toggle(&mut self, id: ActuatorId) -> Result<(), SolenoidError> {
        let state = self.require(id)?.state;
        self.command_state(id, !state)
    }

    /// Published logical state of `id`.
    pub fn state(&self, id: ActuatorId) -> Option<bool> {
        self.solenoid(id).map(Solenoid::state)
    }

    /// Latch redo counter of `id`.
    pub fn redo_counter(&self, id: ActuatorId) -> Option<u8> {
        self.solenoid(id).map(|s| s.drive.redo_counter())
    }

    /// Id of the solenoid named `name`.
    pub fn id_of(&self, name: &str) -> Option<ActuatorId> {
        self.runtime
            .solenoids
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.id)
    }

    /// Solenoid `id`.
    pub fn solenoid(&self, id: ActuatorId) -> Option<&Solenoid> {
        self.runtime.solenoids.get(id.index())
    }

    /// All solenoids in registration order.
    pub fn solenoids(&self) -> &[Solenoid] {
        &self.runtime.solenoids
    }

    /// Interlock coordinator of `id`.
    pub fn interlock(&self, id: ActuatorId) -> Option<&InterlockCoordinator> {
        self.interlocks.get(id.index())
    }

    /// Drain published state events.
    pub fn take_events(&mut self) -> Vec<StateEvent> {
        std::mem::take(&mut self.runtime.events)
    }

    /// Output bus.
    pub fn outputs(&self) -> &O {
        &self.runtime.outputs
    }

    /// Output bus, mutably.
    pub fn outputs_mut(&mut self) -> &mut O {
        &mut self.runtime.outputs
    }

    /// Consume the controller, returning the output bus.
    pub fn into_outputs(self) -> O {
        self.runtime.outputs
    }

    /// Timer queue.
    pub fn timers(&self) -> &TimerQueue {
        &self.runtime.timers
    }

    /// Controller clock.
    pub fn now(&self) -> Duration {
        self.runtime.timers.now()
    }

    /// Earliest pending timer deadline.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.runtime.timers.next_deadline()
    }

    /// Move the clock forward by `dt`, firing every timer due on the way
    /// in deadline order. Returns the number of timers fired.
    pub fn advance(&mut self, dt: Duration) -> usize {
        let until = self.runtime.timers.now() + dt;
        let mut fired = 0;
        while let Some(timer) = self.runtime.timers.pop_due(until) {
            fired += 1;
            self.runtime.dispatch(&self.interlocks, timer);
        }
        self.runtime.timers.advance_clock(until);
        fired
    }

    /// Log the configuration of every solenoid.
    pub fn dump_config(&self) {
        for (solenoid, interlock) in self.runtime.solenoids.iter().zip(&self.interlocks) {
            let config = &solenoid.config;
            info!("Solenoid '{}' ({})", solenoid.name, solenoid.id);
            info!("  Solenoid type: {}", config.solenoid_type);
            info!(
                "  Enable pin {}defined",
                if solenoid.wiring.has_enable() { "" } else { "not " }
            );
            info!("  Brake is {}", if config.brake_is_high { "high" } else { "low" });
            info!("  Energise duration: {}ms", config.energise_duration_ms);
            if config.solenoid_type == SolenoidType::DcLatching {
                info!(
                    "  Redo: {} x {}ms",
                    config.dc_latch_redo_count, config.dc_latch_redo_interval_ms
                );
            } else {
                info!("  Energise power: {:.3}", config.energise_power_percent);
                info!("  Hold power: {:.3}", config.hold_power_percent);
            }
            if config.inverted {
                info!("  Inverted");
            }
            info!("  Restore mode: {:?}", solenoid.restore_mode);
            info!(
                "  State: {} ({})",
                if solenoid.state { "ON" } else { "OFF" },
                solenoid.drive.phase_name()
            );

            let group = interlock.group();
            if group.peers_of(solenoid.id).next().is_some() {
                info!("  Interlocks (wait {}ms):", group.wait_time_ms());
                for peer in group.peers_of(solenoid.id) {
                    if let Some(peer) = self.solenoid(peer) {
                        info!("    {}", peer.name);
                    }
                }
            }
        }
    }
}
