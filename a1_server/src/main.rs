//! # A1 Server Binary
//!
//! Operator CLI over the axis device server.
//!
//! # Usage
//!
//! ```bash
//! # List devices with their attributes and commands
//! a1_server --config config/server.toml list
//!
//! # Read and write attributes
//! a1_server --config config/server.toml read a1/axis/x position
//! a1_server --config config/server.toml write a1/axis/x position 12.5
//!
//! # Run commands
//! a1_server --config config/server.toml exec a1/axis/x enable
//! a1_server --config config/server.toml exec a1/axis/x freeRun -2.0
//!
//! # Watch state transitions until Ctrl-C
//! a1_server --config config/server.toml monitor --interval-ms 100
//! ```

use a1_common::config::{ConfigLoader, LogLevel, ServerConfig};
use a1_common::consts::DEFAULT_CONFIG_PATH;
use a1_server::device::{AttrValue, DeviceSummary};
use a1_server::{DeviceServer, DriverRegistry, StateMonitor};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// A1 axis server - motion-controller axes behind a device interface
#[derive(Parser, Debug)]
#[command(name = "a1_server")]
#[command(version)]
#[command(about = "Axis device server for a multi-axis motion controller")]
#[command(long_about = None)]
struct Args {
    /// Path to the server configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json: bool,

    /// Result rendering
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List devices with kind, attributes and commands
    List,
    /// Print the current state of a device
    State { device: String },
    /// Print the status text of a device
    Status { device: String },
    /// Read one attribute
    Read { device: String, attribute: String },
    /// Write one attribute
    Write {
        device: String,
        attribute: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Execute a command
    Exec {
        device: String,
        command: String,
        #[arg(allow_negative_numbers = true)]
        argument: Option<f64>,
    },
    /// Poll every device's state and log transitions until Ctrl-C
    Monitor {
        #[arg(long, default_value_t = 200)]
        interval_ms: u64,
    },
}

fn main() {
    if let Err(e) = run() {
        error!("a1_server failed: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = ServerConfig::load(&args.config);
    let level = config
        .as_ref()
        .map(|c| c.shared.log_level)
        .unwrap_or_default();
    setup_tracing(&args, level);

    let config = config.map_err(|e| format!("{}: {e}", args.config.display()))?;
    info!(
        "{} v{} starting with {} driver",
        config.shared.service_name,
        env!("CARGO_PKG_VERSION"),
        config.controller.driver
    );

    let registry = DriverRegistry::with_builtin();
    let server = DeviceServer::start(&config, &registry)?;

    match args.command {
        Command::List => {
            let summaries: Vec<_> = server.devices().map(DeviceSummary::of).collect();
            match args.output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summaries)?),
                OutputFormat::Text => {
                    for s in &summaries {
                        let attributes: Vec<_> = s
                            .attributes
                            .iter()
                            .map(|a| {
                                if a.writable {
                                    format!("{} (rw)", a.name)
                                } else {
                                    a.name.to_string()
                                }
                            })
                            .collect();
                        let commands: Vec<_> = s.commands.iter().map(|c| c.name).collect();
                        println!("{} [{}]", s.name, s.kind);
                        println!("  attributes: {}", attributes.join(", "));
                        if !commands.is_empty() {
                            println!("  commands:   {}", commands.join(", "));
                        }
                    }
                    for (device, e) in server.skipped() {
                        println!("{device} [not initialized: {e}]");
                    }
                }
            }
        }
        Command::State { device } => {
            let state = server.device(&device)?.state()?;
            emit(args.output, json!({ "device": device, "state": &state }), state)?;
        }
        Command::Status { device } => {
            let status = server.device(&device)?.status()?;
            emit(args.output, json!({ "device": device, "status": &status }), status)?;
        }
        Command::Read { device, attribute } => {
            let value = server.device(&device)?.read_attribute(&attribute)?;
            emit(
                args.output,
                json!({ "device": device, "attribute": attribute, "value": &value }),
                value,
            )?;
        }
        Command::Write {
            device,
            attribute,
            value,
        } => {
            let target = server.device(&device)?;
            let value = AttrValue::parse(&attribute, target.attribute_type(&attribute)?, &value)?;
            target.write_attribute(&attribute, value)?;
            info!("{device}/{attribute} written");
        }
        Command::Exec {
            device,
            command,
            argument,
        } => {
            server.device(&device)?.execute(&command, argument)?;
            info!("{device}: {command} executed");
        }
        Command::Monitor { interval_ms } => monitor(&server, Duration::from_millis(interval_ms))?,
    }

    Ok(())
}

fn emit(
    output: OutputFormat,
    document: serde_json::Value,
    text: impl std::fmt::Display,
) -> Result<(), serde_json::Error> {
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string(&document)?),
        OutputFormat::Text => println!("{text}"),
    }
    Ok(())
}

fn monitor(server: &DeviceServer, interval: Duration) -> Result<(), Box<dyn std::error::Error>> {
    let running = Arc::new(AtomicBool::new(true));
    let flag = running.clone();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        flag.store(false, Ordering::SeqCst);
    })?;

    let mut monitor = StateMonitor::new();
    while running.load(Ordering::SeqCst) {
        for change in monitor.poll(server) {
            match change.from {
                Some(from) => info!(device = %change.device, %from, to = %change.to, "state changed"),
                None => info!(device = %change.device, state = %change.to, "initial state"),
            }
        }
        std::thread::sleep(interval);
    }
    info!("Monitor stopped");
    Ok(())
}

/// Setup tracing subscriber from the configured level and CLI arguments.
fn setup_tracing(args: &Args, level: LogLevel) {
    let level = if args.verbose {
        LogLevel::Debug
    } else {
        level
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_directive()));

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
