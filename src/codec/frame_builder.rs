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

use crate::codec::crc16::append_crc16;
use crate::constants::{INCLINOMETER_BYTE_ORDER, INCLINOMETER_RESPONSE_LENGTH};
use crate::error::{Result, SimulatorError};

// Address, function code and payload length of the ILC frame.
const ILC_HEADER_SIZE: usize = 3;
// Size of the CRC-16 trailer.
const CRC16_SIZE: usize = 2;

/// One complete, self-delimited binary protocol message. The frame is
/// immutable once built.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Frame {
    _bytes: Vec<u8>,
}

impl Frame {
    /// Get the bytes of the frame.
    pub fn as_bytes(&self) -> &[u8] {
        &self._bytes
    }

    /// Consume the frame and get the bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self._bytes
    }

    /// Length of the frame in bytes.
    pub fn len(&self) -> usize {
        self._bytes.len()
    }

    /// The frame is empty or not.
    pub fn is_empty(&self) -> bool {
        self._bytes.is_empty()
    }
}

/// Convert the value to a byte.
///
/// # Arguments
/// * `field` - Name of the field used in the error message.
/// * `value` - Value to convert.
///
/// # Returns
/// Byte value.
pub fn to_byte(field: &str, value: i64) -> Result<u8> {
    u8::try_from(value).map_err(|_| SimulatorError::OutOfRange {
        field: String::from(field),
        value: value,
    })
}

/// Build the frame of the inner-loop controller (ILC) convention:
/// [outer length][address][function code][payload length][payload].
///
/// The real bus carries a CRC-16 trailer instead of the payload length. The
/// control software expects the simulator to send the payload length and no
/// trailer.
///
/// # Arguments
/// * `address` - Bus address (0-255).
/// * `function_code` - Function code (0-255).
/// * `payload` - Payload bytes.
///
/// # Returns
/// ILC frame.
pub fn build_ilc_frame(address: i32, function_code: i32, payload: &[u8]) -> Result<Frame> {
    let address = to_byte("address", address as i64)?;
    let function_code = to_byte("function code", function_code as i64)?;
    let payload_length = to_byte("payload length", payload.len() as i64)?;
    let outer_length = to_byte(
        "frame length",
        (ILC_HEADER_SIZE + payload.len()) as i64,
    )?;

    let mut bytes = Vec::with_capacity(1 + ILC_HEADER_SIZE + payload.len());
    bytes.extend_from_slice(&[outer_length, address, function_code, payload_length]);
    bytes.extend_from_slice(payload);

    Ok(Frame { _bytes: bytes })
}

/// Build the frame of the inclinometer convention:
/// [outer length][server address][function code][4][reordered payload][CRC-16].
///
/// # Arguments
/// * `server_address` - Modbus server address (0-255).
/// * `function_code` - Function code (0-255).
/// * `payload` - Natural big-endian encoding of the 4-byte value.
///
/// # Returns
/// Inclinometer frame.
pub fn build_inclinometer_frame(
    server_address: i32,
    function_code: i32,
    payload: &[u8],
) -> Result<Frame> {
    let server_address = to_byte("server address", server_address as i64)?;
    let function_code = to_byte("function code", function_code as i64)?;

    let response_length = INCLINOMETER_RESPONSE_LENGTH as usize;
    if payload.len() != response_length {
        return Err(SimulatorError::SizeMismatch {
            field: String::from("inclinometer payload"),
            detail: format!("payload of {} byte(s)", payload.len()),
            width: response_length,
        });
    }

    // The first byte is reserved for the outer length.
    let mut bytes = Vec::with_capacity(1 + 3 + response_length + CRC16_SIZE);
    bytes.extend_from_slice(&[
        0,
        server_address,
        function_code,
        INCLINOMETER_RESPONSE_LENGTH,
    ]);
    bytes.extend(INCLINOMETER_BYTE_ORDER.iter().map(|idx| payload[*idx]));

    let mut body = bytes.split_off(1);
    append_crc16(&mut body);
    bytes[0] = to_byte("frame length", body.len() as i64)?;
    bytes.append(&mut body);

    Ok(Frame { _bytes: bytes })
}

/// Build the frame of the sensor envelope: [outer length][payload].
///
/// # Arguments
/// * `payload` - Payload bytes.
///
/// # Returns
/// Sensor frame.
pub fn build_sensor_frame(payload: &[u8]) -> Result<Frame> {
    let outer_length = to_byte("frame length", payload.len() as i64)?;

    let mut bytes = Vec::with_capacity(1 + payload.len());
    bytes.push(outer_length);
    bytes.extend_from_slice(payload);

    Ok(Frame { _bytes: bytes })
}
