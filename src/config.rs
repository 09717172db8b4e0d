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

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use strum::IntoEnumIterator;

use crate::constants::{NUM_ACCELEROMETER, NUM_DISPLACEMENT_SENSOR, NUM_GYRO_AXIS};
use crate::enums::Channel;
use crate::error::{Result, SimulatorError};

#[derive(Deserialize, Clone, PartialEq, Debug)]
pub struct SimulatorConfig {
    // Host of the control software.
    pub host: String,
    // Destination port of each outbound channel.
    pub port_subnet_a: u16,
    pub port_subnet_b: u16,
    pub port_subnet_c: u16,
    pub port_subnet_d: u16,
    pub port_subnet_e: u16,
    pub port_inclinometer: u16,
    pub port_displacement: u16,
    pub port_accelerometer: u16,
    pub port_gyro: u16,
    pub port_digital_input: u16,
    pub port_digital_output: u16,
    // Local port to receive the acknowledgement. Put 0 to let the OS choose
    // the port number.
    pub port_acknowledgement: u16,
    // Timeout of the acknowledgement in milliseconds.
    pub acknowledgement_timeout: u64,
    // Period to publish the sensor telemetry in milliseconds.
    pub telemetry_period: u64,
    // Device tables.
    pub force_actuator_table: PathBuf,
    pub hardpoint_actuator_table: PathBuf,
    pub hardpoint_monitor_table: PathBuf,
    // Inclinometer angle in degree.
    pub inclinometer_angle: f64,
    // Elevation and azimuth voltages of each accelerometer in volt.
    pub accelerometer_voltages: Vec<[f32; 2]>,
    // Displacement of each sensor in millimeter.
    pub displacement: Vec<f64>,
    // Angular rates of the gyro in degree/sec.
    pub gyro_rate: Vec<f32>,
    pub gyro_status: u8,
    // Gyro temperature in degree Celsius.
    pub gyro_temperature: i32,
}

impl SimulatorConfig {
    /// Read the configuration file.
    ///
    /// # Arguments
    /// * `filepath` - Path of the configuration file.
    ///
    /// # Returns
    /// Configuration.
    pub fn from_file(filepath: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(filepath))
            .build()?;
        let config: SimulatorConfig = settings.try_deserialize()?;

        config.validate()?;

        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Returns
    /// Ok if the configuration is valid.
    pub fn validate(&self) -> Result<()> {
        // Each outbound channel owns one destination.
        let mut ports = HashSet::new();
        for channel in Channel::iter().filter(|channel| channel.is_outbound()) {
            let port = self.port(channel);
            if (port == 0) || !ports.insert(port) {
                return Err(SimulatorError::validation(
                    &format!("port of the {:?} channel", channel),
                    port,
                    "non-zero port that is unique among the channels",
                ));
            }
        }

        if self.acknowledgement_timeout == 0 {
            return Err(SimulatorError::validation(
                "acknowledgement timeout",
                self.acknowledgement_timeout,
                "> 0 ms",
            ));
        }

        if self.telemetry_period == 0 {
            return Err(SimulatorError::validation(
                "telemetry period",
                self.telemetry_period,
                "> 0 ms",
            ));
        }

        if self.accelerometer_voltages.len() != NUM_ACCELEROMETER as usize {
            return Err(SimulatorError::validation(
                "number of accelerometer voltages",
                self.accelerometer_voltages.len(),
                &NUM_ACCELEROMETER.to_string(),
            ));
        }

        if self.displacement.len() != NUM_DISPLACEMENT_SENSOR {
            return Err(SimulatorError::validation(
                "number of displacements",
                self.displacement.len(),
                &NUM_DISPLACEMENT_SENSOR.to_string(),
            ));
        }

        if self.gyro_rate.len() != NUM_GYRO_AXIS {
            return Err(SimulatorError::validation(
                "number of gyro rates",
                self.gyro_rate.len(),
                &NUM_GYRO_AXIS.to_string(),
            ));
        }

        Ok(())
    }

    /// Get the port bound to the channel.
    ///
    /// # Arguments
    /// * `channel` - Channel.
    ///
    /// # Returns
    /// Destination port of the outbound channel, or the local port of the
    /// acknowledgement channel.
    pub fn port(&self, channel: Channel) -> u16 {
        match channel {
            Channel::SubnetA => self.port_subnet_a,
            Channel::SubnetB => self.port_subnet_b,
            Channel::SubnetC => self.port_subnet_c,
            Channel::SubnetD => self.port_subnet_d,
            Channel::SubnetE => self.port_subnet_e,
            Channel::Inclinometer => self.port_inclinometer,
            Channel::Displacement => self.port_displacement,
            Channel::Accelerometer => self.port_accelerometer,
            Channel::Gyro => self.port_gyro,
            Channel::DigitalInput => self.port_digital_input,
            Channel::DigitalOutput => self.port_digital_output,
            Channel::Acknowledgement => self.port_acknowledgement,
        }
    }

    /// Timeout of the acknowledgement.
    pub fn acknowledgement_timeout(&self) -> Duration {
        Duration::from_millis(self.acknowledgement_timeout)
    }

    /// Period of the sensor telemetry.
    pub fn telemetry_period(&self) -> Duration {
        Duration::from_millis(self.telemetry_period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;
    use tempfile::TempDir;

    fn create_config() -> SimulatorConfig {
        SimulatorConfig::from_file(Path::new("config/parameters_app.yaml")).unwrap()
    }

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let filepath = dir.path().join("parameters_app.yaml");
        fs::write(&filepath, content).unwrap();

        filepath
    }

    #[test]
    fn test_from_file() {
        let config = create_config();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port(Channel::SubnetA), 4001);
        assert_eq!(config.port(Channel::DigitalOutput), 4015);
        assert_eq!(config.port(Channel::Acknowledgement), 4020);

        assert_eq!(config.acknowledgement_timeout(), Duration::from_millis(500));
        assert_eq!(config.telemetry_period(), Duration::from_millis(200));

        assert_eq!(
            config.force_actuator_table,
            PathBuf::from("config/force_actuator_table.csv")
        );
        assert_eq!(config.accelerometer_voltages[3], [0.7, 0.8]);
        assert_eq!(config.displacement[0], -19.7297);
    }

    #[test]
    fn test_from_file_missing() {
        let dir = TempDir::new().unwrap();

        assert!(matches!(
            SimulatorConfig::from_file(&dir.path().join("no_such_file.yaml")),
            Err(SimulatorError::Config(_))
        ));
    }

    #[test]
    fn test_from_file_duplicated_port() {
        let content = fs::read_to_string("config/parameters_app.yaml")
            .unwrap()
            .replace("port_subnet_b: 4002", "port_subnet_b: 4001");

        let dir = TempDir::new().unwrap();
        let filepath = write_config(&dir, &content);

        assert!(SimulatorConfig::from_file(&filepath)
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_validate() {
        let mut config = create_config();
        config.acknowledgement_timeout = 0;

        assert!(config.validate().unwrap_err().is_validation());

        let mut config = create_config();
        config.displacement.pop();

        assert!(config.validate().unwrap_err().is_validation());

        let mut config = create_config();
        config.gyro_rate.push(0.0);

        assert!(config.validate().unwrap_err().is_validation());
    }
}
