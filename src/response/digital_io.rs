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

use crate::codec::frame_builder::{build_sensor_frame, Frame};
use crate::enums::{DigitalInputLine, DigitalOutputLine};
use crate::error::{Result, SimulatorError};

/// Check the binary command.
///
/// # Arguments
/// * `field` - Name of the field.
/// * `command` - Command value.
///
/// # Returns
/// Command byte (0 or 1).
fn to_binary_command(field: &str, command: i32) -> Result<u8> {
    match command {
        0 => Ok(0),
        1 => Ok(1),
        _ => Err(SimulatorError::validation(field, command, "0 or 1")),
    }
}

/// Set the digital input line.
///
/// # Arguments
/// * `line` - Digital input line.
/// * `command` - 0 (low) or 1 (high).
///
/// # Returns
/// Frame of the command.
pub fn set_digital_input(line: DigitalInputLine, command: i32) -> Result<Frame> {
    let command = to_binary_command("digital input command", command)?;

    build_sensor_frame(&[line as u8, command])
}

/// Set the digital output line.
///
/// # Arguments
/// * `line` - Digital output line.
/// * `command` - 0 (low) or 1 (high).
///
/// # Returns
/// Frame of the command.
pub fn set_digital_output(line: DigitalOutputLine, command: i32) -> Result<Frame> {
    let command = to_binary_command("digital output command", command)?;

    build_sensor_frame(&[line as u8, command])
}

/// Query the state of the digital output line.
pub fn query_digital_output(line: DigitalOutputLine) -> Result<Frame> {
    build_sensor_frame(&[line as u8])
}

/// Parse the reply of the digital output query: [line][state].
///
/// # Arguments
/// * `line` - Queried digital output line.
/// * `reply` - Reply bytes.
///
/// # Returns
/// State of the line.
pub fn parse_digital_output_reply(line: DigitalOutputLine, reply: &[u8]) -> Result<bool> {
    if reply.len() != 2 {
        return Err(SimulatorError::validation(
            "digital output reply length",
            reply.len(),
            "2 bytes",
        ));
    }

    if reply[0] != line as u8 {
        return Err(SimulatorError::validation(
            "digital output reply line",
            reply[0],
            &(line as u8).to_string(),
        ));
    }

    Ok(to_binary_command("digital output state", reply[1] as i32)? == 1)
}
