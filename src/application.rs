// This file is part of ts_m1m3_simulator.
//
// Developed for the Vera Rubin Observatory Systems.
// This product includes software developed by the LSST Project
// (https://www.lsst.org).
// See the COPYRIGHT file at the top-level directory of this distribution
// for details of code ownership.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use log::{error, info};
use signal_hook::{
    consts::{SIGINT, SIGTERM},
    flag::register,
};
use std::path::Path;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread::sleep;

use crate::config::SimulatorConfig;
use crate::constants::{NUM_DISPLACEMENT_SENSOR, NUM_GYRO_AXIS};
use crate::error::{Result, SimulatorError};
use crate::interface::{transport::ChannelTransport, udp_transport::UdpTransport};
use crate::mock::mock_transport::MockTransport;
use crate::registry::device_registry::DeviceRegistry;
use crate::router::Router;
use crate::simulator::Simulator;

/// Run the application.
///
/// # Arguments
/// * `config_file` - Configuration file.
/// * `is_dry_run` - Log the frames instead of sending them to the network.
///
/// # Returns
/// Ok if the application stops normally.
pub fn run(config_file: &Path, is_dry_run: bool) -> Result<()> {
    let mode = if is_dry_run { "dry-run mode" } else { "network mode" };
    info!("Run the M1M3 hardware bus simulator in {mode}.");

    let config = SimulatorConfig::from_file(config_file)?;
    let mut simulator = create_simulator(&config, is_dry_run)?;

    // Register the signals that stop the application
    let stop = Arc::new(AtomicBool::new(false));
    for signal in [SIGTERM, SIGINT].iter() {
        let _ = register(*signal, stop.clone());
    }

    run_loop(&mut simulator, &config, &stop);

    info!("M1M3 hardware bus simulator is stopped.");

    Ok(())
}

/// Create the simulator.
///
/// # Arguments
/// * `config` - Configuration.
/// * `is_dry_run` - Use the mock transport or not.
///
/// # Returns
/// New simulator.
pub fn create_simulator(config: &SimulatorConfig, is_dry_run: bool) -> Result<Simulator> {
    let registry = DeviceRegistry::from_files(
        &config.force_actuator_table,
        &config.hardpoint_actuator_table,
        &config.hardpoint_monitor_table,
    )?;
    info!("Registered {} devices.", registry.len());

    let transport: Box<dyn ChannelTransport + Send> = if is_dry_run {
        Box::new(MockTransport::new(true, false))
    } else {
        Box::new(UdpTransport::new(config)?)
    };

    Ok(Simulator::new(Router::new(registry, transport)))
}

/// Report the identities once and publish the telemetry periodically until
/// the stop flag is set.
///
/// # Arguments
/// * `simulator` - Simulator.
/// * `config` - Configuration.
/// * `stop` - Stop flag.
///
/// # Returns
/// Number of the published telemetry cycles.
pub fn run_loop(simulator: &mut Simulator, config: &SimulatorConfig, stop: &AtomicBool) -> usize {
    if let Err(err) = simulator.report_all_identities() {
        error!("Failed to report the identities: {err}.");
    }

    let period = config.telemetry_period();
    let mut cycles = 0;
    while !stop.load(Ordering::Relaxed) {
        match publish_telemetry(simulator, config) {
            Ok(_) => cycles += 1,
            Err(err) => error!("Failed to publish the telemetry: {err}."),
        }

        sleep(period);
    }

    cycles
}

/// Publish one cycle of the sensor telemetry with the configured values.
///
/// # Arguments
/// * `simulator` - Simulator.
/// * `config` - Configuration.
///
/// # Returns
/// Number of the sent frames.
pub fn publish_telemetry(simulator: &mut Simulator, config: &SimulatorConfig) -> Result<usize> {
    simulator.set_inclinometer(config.inclinometer_angle)?;

    for (idx, voltages) in config.accelerometer_voltages.iter().enumerate() {
        simulator.set_accelerometer((idx + 1) as u8, voltages[0], voltages[1])?;
    }

    let displacement: [f64; NUM_DISPLACEMENT_SENSOR] = config
        .displacement
        .as_slice()
        .try_into()
        .map_err(|_| {
            SimulatorError::validation(
                "displacement",
                config.displacement.len(),
                &NUM_DISPLACEMENT_SENSOR.to_string(),
            )
        })?;
    simulator.set_displacement(&displacement)?;

    let gyro_rate: [f32; NUM_GYRO_AXIS] =
        config.gyro_rate.as_slice().try_into().map_err(|_| {
            SimulatorError::validation(
                "gyro_rate",
                config.gyro_rate.len(),
                &NUM_GYRO_AXIS.to_string(),
            )
        })?;
    simulator.set_gyro(
        &gyro_rate,
        config.gyro_status != 0,
        config.gyro_temperature,
    )?;

    Ok(config.accelerometer_voltages.len() + 3)
}
