//! # Solenoid HAL Binary
//!
//! Loads a bank file, brings every solenoid to its power-on state, replays
//! a command script and reports the resulting states and output levels.
//!
//! # Usage
//!
//! ```bash
//! # Run a script on the virtual clock
//! solenoid_hal --config bank.toml -C lawn=on@0 -C beds=on@1500 --run-ms 5000
//!
//! # Pace the run by the wall clock, stop with Ctrl-C
//! solenoid_hal --config bank.toml -C lawn=toggle --realtime --run-ms 60000
//!
//! # Persist states across runs, JSON logs and report
//! solenoid_hal --config bank.toml --state-file /var/lib/solenoid/state.bin --json
//! ```

#![deny(warnings)]

use clap::Parser;
use solenoid_common::config::{ConfigLoader, LogLevel};
use solenoid_common::consts::DEFAULT_BANK_CONFIG_PATH;
use solenoid_common::solenoid::bank::BankConfig;
use solenoid_hal::{LoadedBank, PersistedState, RunReport, Runner, StatePersistence, parse_script};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Solenoid HAL - simulated solenoid bank and command runner
#[derive(Parser, Debug)]
#[command(name = "solenoid_hal")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Simulated solenoid bank and command runner")]
#[command(long_about = None)]
struct Args {
    /// Path to the bank configuration file.
    #[arg(short, long, default_value = DEFAULT_BANK_CONFIG_PATH)]
    config: PathBuf,

    /// Command as name=on|off|toggle[@ms] (can be specified multiple times)
    #[arg(short = 'C', long = "command", action = clap::ArgAction::Append)]
    commands: Vec<String>,

    /// Run length in milliseconds after setup
    #[arg(long, default_value_t = 5000)]
    run_ms: u64,

    /// Pace the run by the wall clock instead of the virtual clock
    #[arg(long)]
    realtime: bool,

    /// File recovered states are read from and saved to
    #[arg(long, value_name = "FILE")]
    state_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs and the final report in JSON format
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = run() {
        error!("Solenoid HAL failed: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Log level comes from the bank file unless --verbose, so parse it first.
    let config = BankConfig::load_validated(&args.config);
    setup_tracing(&args, config.as_ref().map(|c| c.shared.log_level).ok());
    let config = config?;

    info!("Solenoid HAL v{} starting...", env!("CARGO_PKG_VERSION"));

    let script = parse_script(&args.commands)?;
    let mut bank = LoadedBank::build(config)?;
    bank.controller.dump_config();

    let persistence = args.state_file.as_ref().map(StatePersistence::new);
    let recovered = match &persistence {
        Some(p) => p.load().unwrap_or_else(|e| {
            warn!("{e}, starting fresh");
            None
        }),
        None => None,
    }
    .unwrap_or_else(PersistedState::new);
    bank.controller.setup(&recovered)?;

    let mut runner = Runner::new(bank.controller, script);
    let duration = Duration::from_millis(args.run_ms);
    if args.realtime {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        ctrlc::set_handler(move || {
            info!("Received shutdown signal");
            flag.store(false, Ordering::SeqCst);
        })?;
        runner.run_realtime(duration, &running)?;
    } else {
        runner.run_virtual(duration)?;
    }

    let report = runner.report();
    if let Some(p) = &persistence {
        p.save(&PersistedState::capture(runner.controller()))?;
    }
    print_report(&report, args.json)?;

    info!("Solenoid HAL shutdown complete");
    Ok(())
}

/// Print the final report on stdout.
fn print_report(report: &RunReport, json: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!(
        "t={}ms commands={} timers={}",
        report.elapsed_ms, report.commands, report.timers_fired
    );
    for event in &report.events {
        println!(
            "  {:>8}ms  {:<16} {}",
            event.at_ms,
            event.name,
            if event.state { "ON" } else { "OFF" }
        );
    }
    for (name, state) in &report.states {
        println!("{name}: {}", if *state { "ON" } else { "OFF" });
    }
    let analog: Vec<String> = report.outputs.analog.iter().map(|v| format!("{v:.3}")).collect();
    let digital: Vec<&str> = report
        .outputs
        .digital
        .iter()
        .map(|s| if *s { "1" } else { "0" })
        .collect();
    println!("AO [{}]", analog.join(" "));
    println!("DO [{}]", digital.join(" "));
    Ok(())
}

/// Setup tracing subscriber based on CLI arguments and the bank's log level.
fn setup_tracing(args: &Args, configured: Option<LogLevel>) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        configured.unwrap_or_default().into()
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    // stdout carries the report
    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
