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

pub const NUM_FORCE_ACTUATOR: usize = 156;
pub const NUM_HARDPOINT_ACTUATOR: usize = 6;
pub const NUM_HARDPOINT_MONITOR: usize = 6;

pub const NUM_ACCELEROMETER: u8 = 4;
pub const NUM_DISPLACEMENT_SENSOR: usize = 8;
pub const NUM_GYRO_AXIS: usize = 3;

pub const NUM_CALIBRATION_VALUE: usize = 24;
pub const NUM_DCA_PRESSURE: usize = 4;
pub const NUM_DAC_VALUE: usize = 4;

// Inclinometer (Modbus server) framing.
pub const INCLINOMETER_SERVER_ADDRESS: u8 = 127;
pub const INCLINOMETER_FUNCTION_CODE: u8 = 3;
pub const INCLINOMETER_RESPONSE_LENGTH: u8 = 4;
// Byte lanes of the big-endian angle as sent by the sensor.
pub const INCLINOMETER_BYTE_ORDER: [usize; 4] = [2, 3, 0, 1];
pub const INCLINOMETER_ANGLE_MAX: f64 = 360.0;

// Displacement sensor text format.
pub const DISPLACEMENT_LIMIT: f64 = 999.9999;
pub const DISPLACEMENT_PREFIX: &str = "M0,";

pub const CRC16_SEED: u16 = 0xFFFF;
pub const CRC16_POLYNOMIAL: u16 = 0xA001;

pub const LOCAL_HOST: &str = "127.0.0.1";
pub const ALL_HOST: &str = "0.0.0.0";
pub const TERMINATOR: &[u8; 2] = b"\r\n";

pub const MAX_DATAGRAM_SIZE: usize = 1024;
