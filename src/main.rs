use anyhow::{bail, Result};
use clap::Parser;
use cncsnap::config::AppConfig;
use cncsnap::sink::{ChangelistSink, JsonLinesSink, LogSink};
use cncsnap::PollLoop;
use cncsnap_core::{BoxedDeviceReader, Collector, PollCoordinator};
use cncsnap_sources::{builtin_registry, SimulatedDevice};
use log::{info, warn};
use std::path::PathBuf;
use std::time::Duration;

/// cncsnap - Change-driven state poller for CNC controllers
#[derive(Parser, Debug, Clone)]
#[command(name = "cncsnap")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file to load instead of the platform default
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the poll interval in milliseconds
    #[arg(short = 'i', long = "interval-ms", value_name = "MS")]
    interval_ms: Option<u64>,

    /// Stop after this many completed cycles
    #[arg(short = 'n', long = "cycles", value_name = "N")]
    cycles: Option<u64>,

    /// Log changelists instead of writing JSON lines to stdout
    #[arg(long = "log-updates")]
    log_updates: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long = "print-config")]
    print_config: bool,

    /// List available collectors and the fields they report
    #[arg(short = 'l', long = "list-collectors")]
    list_collectors: bool,

    /// Debug verbosity level (0=quiet, 1=info, 2=debug, 3=trace)
    #[arg(short = 'd', long = "debug", value_name = "LEVEL", default_value = "0")]
    debug: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Level 0 (default): warn only
    // Level 1: info
    // Level 2: debug
    // Level 3+: trace
    let log_level = match cli.debug {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Allow RUST_LOG to override CLI setting
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    warn!("Starting cncsnap v{}", env!("CARGO_PKG_VERSION"));

    let registry = builtin_registry();

    if cli.list_collectors {
        list_collectors();
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    if let Some(interval_ms) = cli.interval_ms {
        config.poll.interval_ms = interval_ms;
    }
    config.validate(registry)?;

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let reader = open_device(&config)?;
    let collectors = registry.build(&config.collectors)?;
    let coordinator = PollCoordinator::new(collectors, &config.poll);

    let sink: Box<dyn ChangelistSink> = if cli.log_updates {
        Box::new(LogSink)
    } else {
        Box::new(JsonLinesSink::stdout())
    };

    let mut poll = PollLoop::new(
        coordinator,
        reader,
        sink,
        Duration::from_millis(config.poll.interval_ms),
    );
    if let Some(cycles) = cli.cycles {
        poll = poll.with_max_cycles(cycles);
    }
    let listener = poll.spawn_shutdown_listener();

    let result = poll.run().await;
    listener.abort();

    let completed = result?;
    info!("Completed {} cycles", completed);
    Ok(())
}

/// Open the device session named by the config
fn open_device(config: &AppConfig) -> Result<BoxedDeviceReader> {
    if config.device.simulated {
        info!("Using simulated controller");
        return Ok(Box::new(SimulatedDevice::new()));
    }
    bail!(
        "No controller driver available for {}:{}; set device.simulated to use the simulator",
        config.device.host,
        config.device.port
    )
}

/// Print registered collectors to stdout
fn list_collectors() {
    let registry = builtin_registry();
    for info in registry.list_collectors() {
        let requires = if info.requires.is_empty() {
            String::new()
        } else {
            format!(" (after {})", info.requires.join(", "))
        };
        println!("{:<14} {}{}", info.id, info.name, requires);

        match registry.create_collector(&cncsnap_types::CollectorConfig::new(info.id.as_str())) {
            Ok(collector) => {
                for field in collector.fields() {
                    println!(
                        "    {:<20} {:<17} {:<13} {}",
                        field.key,
                        field.field_type.as_str(),
                        collector.policy().as_str(),
                        field.description
                    );
                }
            }
            Err(e) => warn!("Failed to create collector '{}': {}", info.id, e),
        }
    }
}
