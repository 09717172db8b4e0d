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

use crate::constants::{CRC16_POLYNOMIAL, CRC16_SEED};

/// Calculate the bit-serial reflected CRC-16 (Modbus variant).
///
/// # Arguments
/// * `bytes` - Input bytes.
///
/// # Returns
/// CRC-16 value.
pub fn crc16(bytes: &[u8]) -> u16 {
    let mut crc = CRC16_SEED;
    for byte in bytes {
        crc ^= *byte as u16;
        for _ in 0..8 {
            if crc & 0x0001 != 0 {
                crc = (crc >> 1) ^ CRC16_POLYNOMIAL;
            } else {
                crc >>= 1;
            }
        }
    }

    crc
}

/// Append the CRC-16 of the buffer to the buffer in little-endian order.
///
/// # Arguments
/// * `buffer` - Buffer to calculate and append the CRC-16.
///
/// # Returns
/// CRC-16 value.
pub fn append_crc16(buffer: &mut Vec<u8>) -> u16 {
    let crc = crc16(buffer);
    buffer.extend_from_slice(&crc.to_le_bytes());

    crc
}
