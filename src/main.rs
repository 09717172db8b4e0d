use clap::{value_parser, Arg, ArgAction, Command};
use log::{error, info};
use simplelog::{
    format_description, ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, TermLogger,
    TerminalMode, WriteLogger,
};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use m1m3_simulator::application;
use m1m3_simulator::config::SimulatorConfig;
use m1m3_simulator::error::Result;
use m1m3_simulator::registry::device_registry::DeviceRegistry;

fn main() -> ExitCode {
    // Parse the command line arguments
    let matches = Command::new("hardware bus simulator")
        .about("M1M3 hardware bus simulator.")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Configuration file of the simulator")
                .default_value("config/parameters_app.yaml")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("dry_run")
                .short('d')
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("Log the frames instead of sending them to the network"),
        )
        .arg(
            Arg::new("list_devices")
                .long("list-devices")
                .action(ArgAction::SetTrue)
                .help("Print the device registry as JSON and exit"),
        )
        .arg(
            Arg::new("level")
                .short('l')
                .long("log-level")
                .help("Log level: 0 (Off), 1 (Error), 2 (Warn), 3 (Info), 4 (Debug), 5 (Trace)")
                .default_value("3")
                .value_parser(value_parser!(u32)),
        )
        .get_matches();

    let config_file = matches
        .get_one::<PathBuf>("config")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("config/parameters_app.yaml"));

    if matches.get_flag("list_devices") {
        return match list_devices(&config_file) {
            Ok(text) => {
                println!("{text}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("Failed to list the devices: {err}.");
                ExitCode::FAILURE
            }
        };
    }

    // Check the log filter
    let log_filter = get_log_filter(matches.get_one::<u32>("level"));

    // Initiate the logger
    initiate_logger(log_filter, "simulator.log");
    info!("Log level: {log_filter}.");

    // Run the application
    match application::run(&config_file, matches.get_flag("dry_run")) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Simulator failed: {err}.");
            ExitCode::FAILURE
        }
    }
}

/// List the registered devices.
///
/// # Arguments
/// * `config_file` - Configuration file.
///
/// # Returns
/// Device records in the pretty JSON format.
fn list_devices(config_file: &Path) -> Result<String> {
    let config = SimulatorConfig::from_file(config_file)?;
    let registry = DeviceRegistry::from_files(
        &config.force_actuator_table,
        &config.hardpoint_actuator_table,
        &config.hardpoint_monitor_table,
    )?;

    Ok(serde_json::to_string_pretty(registry.records())?)
}

/// Get the log filter.
///
/// # Arguments
/// * `log_level` - Log level.
///
/// # Returns
/// Log filter.
fn get_log_filter(log_level: Option<&u32>) -> LevelFilter {
    match log_level {
        Some(level) => match level {
            0 => LevelFilter::Off,
            1 => LevelFilter::Error,
            2 => LevelFilter::Warn,
            3 => LevelFilter::Info,
            4 => LevelFilter::Debug,
            5 => LevelFilter::Trace,
            _ => LevelFilter::Info,
        },
        None => LevelFilter::Info,
    }
}

/// Initiate the logger.
///
/// # Arguments
/// * `level` - Log level.
/// * `filepath` - Log file path.
fn initiate_logger(level: LevelFilter, filepath: &str) {
    let config = ConfigBuilder::new()
        .set_time_format_custom(format_description!(
            "[year]/[month]/[day] [hour]:[minute]:[second].[subsecond]"
        ))
        .build();

    // Log to the terminal
    let logger_terminal = TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );

    // Log to the file
    match File::create(filepath) {
        Ok(file) => {
            let logger_file = WriteLogger::new(level, config, file);
            let _ = CombinedLogger::init(vec![logger_terminal, logger_file]);
        }
        Err(err) => {
            eprintln!("Failed to create the log file: {err}.");
            let _ = CombinedLogger::init(vec![logger_terminal]);
        }
    }
}
