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

use csv::ReaderBuilder;
use log::info;
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use crate::constants::{NUM_FORCE_ACTUATOR, NUM_HARDPOINT_ACTUATOR, NUM_HARDPOINT_MONITOR};
use crate::enums::{Channel, DeviceClass, DeviceId};
use crate::error::{Result, SimulatorError};
use crate::registry::device_record::{DeviceRecord, DeviceTableRow};

/// Static tables of the devices. The registry is immutable after the
/// construction.
#[derive(Debug)]
pub struct DeviceRegistry {
    _records: Vec<DeviceRecord>,
    // Index of the record in the records.
    _index: HashMap<DeviceId, usize>,
}

impl DeviceRegistry {
    /// Create a new registry from the records.
    ///
    /// # Arguments
    /// * `records` - Device records.
    ///
    /// # Returns
    /// New registry.
    ///
    /// # Errors
    /// If the identifier is duplicated, or two devices of any class have the
    /// same channel and bus address.
    pub fn new(records: Vec<DeviceRecord>) -> Result<Self> {
        let mut index = HashMap::with_capacity(records.len());
        let mut locations = HashSet::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            if index.insert(record.id, idx).is_some() {
                return Err(SimulatorError::validation(
                    "device identifier",
                    record.id,
                    "unique identifier in the device table",
                ));
            }

            if !locations.insert((record.channel, record.bus_address)) {
                return Err(SimulatorError::validation(
                    &format!("bus address of {}", record.id),
                    format!("{:?}/{}", record.channel, record.bus_address),
                    "unique channel and bus address in the device table",
                ));
            }
        }

        Ok(Self {
            _records: records,
            _index: index,
        })
    }

    /// Create a new registry from the device table files.
    ///
    /// # Arguments
    /// * `filepath_force_actuator` - Table of the force actuators.
    /// * `filepath_hardpoint_actuator` - Table of the hardpoint actuators.
    /// * `filepath_hardpoint_monitor` - Table of the hardpoint monitors.
    ///
    /// # Returns
    /// New registry.
    pub fn from_files(
        filepath_force_actuator: &Path,
        filepath_hardpoint_actuator: &Path,
        filepath_hardpoint_monitor: &Path,
    ) -> Result<Self> {
        let mut records = Vec::new();
        for (filepath, class, number) in [
            (
                filepath_force_actuator,
                DeviceClass::ForceActuator,
                NUM_FORCE_ACTUATOR,
            ),
            (
                filepath_hardpoint_actuator,
                DeviceClass::HardpointActuator,
                NUM_HARDPOINT_ACTUATOR,
            ),
            (
                filepath_hardpoint_monitor,
                DeviceClass::HardpointMonitor,
                NUM_HARDPOINT_MONITOR,
            ),
        ] {
            let file = std::fs::File::open(filepath)?;
            let table = read_table(file, class)?;
            if table.len() != number {
                return Err(SimulatorError::validation(
                    &format!("number of rows in {:?}", filepath),
                    table.len(),
                    &number.to_string(),
                ));
            }

            info!("Read {} devices from {:?}.", table.len(), filepath);
            records.extend(table);
        }

        Self::new(records)
    }

    /// Look up the channel and bus address of the device.
    ///
    /// # Arguments
    /// * `id` - Device identifier.
    ///
    /// # Returns
    /// Channel and bus address.
    pub fn lookup(&self, id: DeviceId) -> Result<(Channel, u8)> {
        let record = self.record(id)?;

        Ok((record.channel, record.bus_address))
    }

    /// Get the device record.
    ///
    /// # Arguments
    /// * `id` - Device identifier.
    ///
    /// # Returns
    /// Device record.
    pub fn record(&self, id: DeviceId) -> Result<&DeviceRecord> {
        self._index
            .get(&id)
            .map(|idx| &self._records[*idx])
            .ok_or(SimulatorError::NotFound(id))
    }

    /// Get all the records in the table order.
    pub fn records(&self) -> &[DeviceRecord] {
        &self._records
    }

    /// Get the records of the device class in the table order.
    pub fn records_of_class(&self, class: DeviceClass) -> impl Iterator<Item = &DeviceRecord> {
        self._records
            .iter()
            .filter(move |record| record.class() == class)
    }

    /// Number of the devices.
    pub fn len(&self) -> usize {
        self._records.len()
    }

    /// The registry is empty or not.
    pub fn is_empty(&self) -> bool {
        self._records.is_empty()
    }
}

/// Read the device table.
///
/// # Arguments
/// * `reader` - Reader of the CSV table with the header.
/// * `class` - Device class of the table.
///
/// # Returns
/// Device records.
pub fn read_table<R: Read>(reader: R, class: DeviceClass) -> Result<Vec<DeviceRecord>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for result in csv_reader.deserialize() {
        let row: DeviceTableRow = result?;
        records.push(DeviceRecord::from_row(class, &row)?);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;
    use strum::IntoEnumIterator;
    use tempfile::NamedTempFile;

    const HEADER: &str = "id,subnet,address,x_position,y_position,z_position,orientation\n";

    fn create_registry() -> DeviceRegistry {
        DeviceRegistry::from_files(
            Path::new("config/force_actuator_table.csv"),
            Path::new("config/hardpoint_actuator_table.csv"),
            Path::new("config/hardpoint_monitor_table.csv"),
        )
        .unwrap()
    }

    fn create_table_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();

        file
    }

    #[test]
    fn test_from_files() {
        let registry = create_registry();

        assert_eq!(
            registry.len(),
            NUM_FORCE_ACTUATOR + NUM_HARDPOINT_ACTUATOR + NUM_HARDPOINT_MONITOR
        );
        assert_eq!(
            registry
                .records_of_class(DeviceClass::ForceActuator)
                .count(),
            NUM_FORCE_ACTUATOR
        );
        assert_eq!(
            registry
                .records_of_class(DeviceClass::HardpointMonitor)
                .count(),
            NUM_HARDPOINT_MONITOR
        );
    }

    #[test]
    fn test_from_files_wrong_count() {
        let table = create_table_file(&format!("{HEADER}1,5,1,0.0,0.0,0.0,NA\n"));

        let result = DeviceRegistry::from_files(
            table.path(),
            Path::new("config/hardpoint_actuator_table.csv"),
            Path::new("config/hardpoint_monitor_table.csv"),
        );

        assert!(result.unwrap_err().is_validation());
    }

    #[test]
    fn test_from_files_missing_file() {
        let result = DeviceRegistry::from_files(
            Path::new("config/no_such_table.csv"),
            Path::new("config/hardpoint_actuator_table.csv"),
            Path::new("config/hardpoint_monitor_table.csv"),
        );

        assert!(matches!(result, Err(SimulatorError::Io(_))));
    }

    #[test]
    fn test_lookup() {
        let registry = create_registry();

        assert_eq!(
            registry.lookup(DeviceId::ForceActuator(101)).unwrap(),
            (Channel::SubnetA, 1)
        );
        assert_eq!(
            registry.lookup(DeviceId::ForceActuator(443)).unwrap().0,
            Channel::SubnetD
        );
        assert_eq!(
            registry.lookup(DeviceId::HardpointActuator(1)).unwrap(),
            (Channel::SubnetE, 1)
        );
        assert_eq!(
            registry.lookup(DeviceId::HardpointMonitor(1)).unwrap(),
            (Channel::SubnetE, 84)
        );
    }

    #[test]
    fn test_lookup_not_found() {
        let registry = create_registry();

        for id in [
            DeviceId::ForceActuator(100),
            DeviceId::ForceActuator(201),
            DeviceId::ForceActuator(444),
            DeviceId::HardpointActuator(7),
            DeviceId::HardpointMonitor(0),
        ] {
            assert!(matches!(
                registry.lookup(id),
                Err(SimulatorError::NotFound(not_found)) if not_found == id
            ));
        }
    }

    #[test]
    fn test_force_actuator_identifier_space() {
        let registry = create_registry();

        for record in registry.records_of_class(DeviceClass::ForceActuator) {
            let id = record.id.number();
            let quadrant = id / 100;
            let offset = id % 100;

            let expected_range = if quadrant % 2 == 1 { 1..=43 } else { 7..=43 };
            assert!((1..=4).contains(&quadrant), "{id}");
            assert!(expected_range.contains(&offset), "{id}");
        }
    }

    #[test]
    fn test_registry_completeness() {
        let registry = create_registry();

        let mut locations = HashSet::new();
        for class in DeviceClass::iter() {
            for record in registry.records_of_class(class) {
                let location = registry.lookup(record.id).unwrap();

                assert_eq!(location, (record.channel, record.bus_address));
                assert!(locations.insert(location), "{}", record.id);
            }
        }
    }

    #[test]
    fn test_channel_partition() {
        let registry = create_registry();

        for record in registry.records() {
            match record.class() {
                DeviceClass::ForceActuator => {
                    let quadrant = (record.id.number() / 100) as u8;
                    assert_eq!(record.channel.subnet(), Some(quadrant));
                }
                _ => {
                    assert_eq!(record.channel, Channel::SubnetE);
                }
            }
        }
    }

    #[test]
    fn test_new_duplicate_identifier() {
        let table = format!("{HEADER}101,1,1,0.0,0.0,0.0,NA\n101,1,2,0.0,0.0,0.0,NA\n");
        let records = read_table(table.as_bytes(), DeviceClass::ForceActuator).unwrap();

        assert!(DeviceRegistry::new(records).unwrap_err().is_validation());
    }

    #[test]
    fn test_new_duplicate_location() {
        let table = format!("{HEADER}101,1,1,0.0,0.0,0.0,NA\n102,1,1,0.0,0.0,0.0,+Y\n");
        let records = read_table(table.as_bytes(), DeviceClass::ForceActuator).unwrap();

        assert!(DeviceRegistry::new(records).unwrap_err().is_validation());
    }

    #[test]
    fn test_new_duplicate_location_in_different_classes() {
        let table = format!("{HEADER}1,5,1,0.0,0.0,0.0,NA\n");
        let mut records = read_table(table.as_bytes(), DeviceClass::HardpointActuator).unwrap();
        records.extend(read_table(table.as_bytes(), DeviceClass::HardpointMonitor).unwrap());

        assert!(DeviceRegistry::new(records).unwrap_err().is_validation());
    }

    #[test]
    fn test_new_same_identifier_in_different_classes() {
        let table_actuator = format!("{HEADER}1,5,1,0.0,0.0,0.0,NA\n");
        let table_monitor = format!("{HEADER}1,5,84,0.0,0.0,0.0,NA\n");
        let mut records =
            read_table(table_actuator.as_bytes(), DeviceClass::HardpointActuator).unwrap();
        records.extend(read_table(table_monitor.as_bytes(), DeviceClass::HardpointMonitor).unwrap());

        let registry = DeviceRegistry::new(records).unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.record(DeviceId::HardpointActuator(1)).is_ok());
        assert!(registry.record(DeviceId::HardpointMonitor(1)).is_ok());
    }

    #[test]
    fn test_read_table_bad_orientation() {
        let table = format!("{HEADER}101,1,1,0.0,0.0,0.0,+Z\n");

        assert!(matches!(
            read_table(table.as_bytes(), DeviceClass::ForceActuator),
            Err(SimulatorError::Table(_))
        ));
    }
}
