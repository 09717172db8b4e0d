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

use crate::codec::{
    frame_builder::{build_inclinometer_frame, build_sensor_frame, Frame},
    value_codec::PayloadWriter,
};
use crate::constants::{
    DISPLACEMENT_LIMIT, DISPLACEMENT_PREFIX, INCLINOMETER_ANGLE_MAX, INCLINOMETER_FUNCTION_CODE,
    INCLINOMETER_SERVER_ADDRESS, NUM_ACCELEROMETER, NUM_DISPLACEMENT_SENSOR, NUM_GYRO_AXIS,
    TERMINATOR,
};
use crate::error::{Result, SimulatorError};

const MILLIDEGREE_PER_TURN: i64 = 360_000;

/// Report the inclinometer angle.
///
/// # Arguments
/// * `angle` - Angle in degree. The range is [0.0, 360.0).
///
/// # Returns
/// Frame of the response.
pub fn report_inclinometer(angle: f64) -> Result<Frame> {
    if !(angle.is_finite() && (0.0..INCLINOMETER_ANGLE_MAX).contains(&angle)) {
        return Err(SimulatorError::validation(
            "inclinometer angle",
            angle,
            "[0.0, 360.0) degree",
        ));
    }

    // The sensor reports the angle in millidegree within [0, 360000).
    let millidegree = ((angle * 1000.0).round() as i64).rem_euclid(MILLIDEGREE_PER_TURN);

    let mut writer = PayloadWriter::with_capacity(4);
    writer.put_signed("inclinometer angle", millidegree, 4)?;

    build_inclinometer_frame(
        INCLINOMETER_SERVER_ADDRESS as i32,
        INCLINOMETER_FUNCTION_CODE as i32,
        writer.as_bytes(),
    )
}

/// Report the accelerometer voltages.
///
/// # Arguments
/// * `number` - Accelerometer number (1-4).
/// * `elevation_voltage` - Voltage of the elevation axis in volt.
/// * `azimuth_voltage` - Voltage of the azimuth axis in volt.
///
/// # Returns
/// Frame of the response.
pub fn report_accelerometer(
    number: u8,
    elevation_voltage: f32,
    azimuth_voltage: f32,
) -> Result<Frame> {
    if !(1..=NUM_ACCELEROMETER).contains(&number) {
        return Err(SimulatorError::validation(
            "accelerometer number",
            number,
            "1-4",
        ));
    }

    let mut writer = PayloadWriter::with_capacity(9);
    writer
        .put_unsigned("accelerometer number", number, 1)?
        .put_float("elevation voltage", elevation_voltage)?
        .put_float("azimuth voltage", azimuth_voltage)?;

    build_sensor_frame(writer.as_bytes())
}

/// Format the displacement in the sensor text format: sign, three integer
/// digits and four decimals.
///
/// # Arguments
/// * `index` - 0-based index of the sensor.
/// * `value` - Displacement in millimeter.
///
/// # Returns
/// Formatted displacement.
fn format_displacement(index: usize, value: f64) -> Result<String> {
    if !(value.is_finite() && (-DISPLACEMENT_LIMIT..=DISPLACEMENT_LIMIT).contains(&value)) {
        return Err(SimulatorError::validation(
            &format!("displacement {}", index + 1),
            value,
            "[-999.9999, 999.9999] mm",
        ));
    }

    Ok(format!("{value:+09.4}"))
}

/// Report the displacement sensors.
///
/// # Arguments
/// * `values` - Displacement of the eight sensors in millimeter.
///
/// # Returns
/// Frame of the response.
pub fn report_displacement(values: &[f64; NUM_DISPLACEMENT_SENSOR]) -> Result<Frame> {
    let fields = values
        .iter()
        .enumerate()
        .map(|(idx, value)| format_displacement(idx, *value))
        .collect::<Result<Vec<String>>>()?;

    let mut text = String::from(DISPLACEMENT_PREFIX);
    text.push_str(&fields.join(","));

    let mut payload = text.into_bytes();
    payload.extend_from_slice(TERMINATOR);

    build_sensor_frame(&payload)
}

/// Report the gyro.
///
/// # Arguments
/// * `rates` - Angular rates of the x, y, and z axes in degree/sec.
/// * `is_valid` - Data is valid or not.
/// * `temperature` - Temperature in degree Celsius.
///
/// # Returns
/// Frame of the response.
pub fn report_gyro(rates: &[f32; NUM_GYRO_AXIS], is_valid: bool, temperature: i32) -> Result<Frame> {
    let mut writer = PayloadWriter::with_capacity(4 * NUM_GYRO_AXIS + 3);
    writer
        .put_floats("angular rate", rates)?
        .put_unsigned("validity", is_valid as u8, 1)?
        .put_signed("gyro temperature", temperature, 2)?;

    build_sensor_frame(writer.as_bytes())
}
