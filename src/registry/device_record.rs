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

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::enums::{Channel, DeviceClass, DeviceId, Orientation};
use crate::error::{Result, SimulatorError};

/// Row of the device table file.
#[derive(Deserialize, Debug, PartialEq, Clone)]
pub struct DeviceTableRow {
    pub id: i32,
    // 1-based subnet number.
    pub subnet: u8,
    pub address: u8,
    // Position in meter.
    pub x_position: f64,
    pub y_position: f64,
    pub z_position: f64,
    pub orientation: Orientation,
}

/// Device attached to an inner-loop controller (ILC).
#[derive(Serialize, Debug, PartialEq, Clone)]
pub struct DeviceRecord {
    pub id: DeviceId,
    pub channel: Channel,
    pub bus_address: u8,
    // Position (x, y, z) in meter.
    pub position: Vector3<f64>,
    // Orientation of the secondary cylinder. None for the single-axis
    // actuator and the hardpoints.
    pub orientation: Orientation,
}

impl DeviceRecord {
    /// Create the device record from the row of the device table.
    ///
    /// # Arguments
    /// * `class` - Device class of the table.
    /// * `row` - Row of the table.
    ///
    /// # Returns
    /// Device record.
    pub fn from_row(class: DeviceClass, row: &DeviceTableRow) -> Result<Self> {
        let id = match class {
            DeviceClass::ForceActuator => DeviceId::ForceActuator(row.id),
            DeviceClass::HardpointActuator => DeviceId::HardpointActuator(row.id),
            DeviceClass::HardpointMonitor => DeviceId::HardpointMonitor(row.id),
        };

        let channel = Channel::from_subnet(row.subnet).ok_or_else(|| {
            SimulatorError::validation(&format!("subnet of {id}"), row.subnet, "1-5")
        })?;

        if (class != DeviceClass::ForceActuator) && (row.orientation != Orientation::None) {
            return Err(SimulatorError::validation(
                &format!("orientation of {id}"),
                format!("{:?}", row.orientation),
                "NA",
            ));
        }

        Ok(Self {
            id: id,
            channel: channel,
            bus_address: row.address,
            position: Vector3::new(row.x_position, row.y_position, row.z_position),
            orientation: row.orientation,
        })
    }

    /// Get the device class.
    pub fn class(&self) -> DeviceClass {
        self.id.class()
    }

    /// The device is a dual-axis actuator or not.
    pub fn is_dual_axis(&self) -> bool {
        self.orientation != Orientation::None
    }
}
