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
    frame_builder::{build_ilc_frame, Frame},
    value_codec::PayloadWriter,
};
use crate::constants::{NUM_CALIBRATION_VALUE, NUM_DAC_VALUE, NUM_DCA_PRESSURE};
use crate::enums::FunctionCode;
use crate::error::{Result, SimulatorError};

/// Calibration data of the load cells (function code 110).
#[derive(Debug, PartialEq, Clone, Default)]
pub struct CalibrationData {
    pub main_adc_k: [f32; 4],
    pub main_offset: [f32; 4],
    pub main_sensitivity: [f32; 4],
    pub backup_adc_k: [f32; 4],
    pub backup_offset: [f32; 4],
    pub backup_sensitivity: [f32; 4],
}

impl CalibrationData {
    /// Get the values in the order on the wire.
    ///
    /// # Returns
    /// Calibration values.
    pub fn values(&self) -> Vec<f32> {
        let mut values = Vec::with_capacity(NUM_CALIBRATION_VALUE);
        for group in [
            &self.main_adc_k,
            &self.main_offset,
            &self.main_sensitivity,
            &self.backup_adc_k,
            &self.backup_offset,
            &self.backup_sensitivity,
        ] {
            values.extend_from_slice(group);
        }

        values
    }
}

/// Identity of the differential capacitance amplifier (DCA).
#[derive(Debug, PartialEq, Clone)]
pub struct DcaIdentity {
    pub unique_id: u64,
    pub firmware_type: u8,
    pub major_revision: u8,
    pub minor_revision: u8,
}

/// Check the force is a finite number.
///
/// # Arguments
/// * `field` - Name of the field.
/// * `force` - Force in Newton.
///
/// # Returns
/// Ok if the force is finite.
fn check_force(field: &str, force: f32) -> Result<()> {
    if !force.is_finite() {
        return Err(SimulatorError::validation(field, force, "finite force"));
    }

    Ok(())
}

/// Payload shared by the pneumatic force responses: the status byte, the
/// primary cylinder force and the secondary cylinder force of the dual-axis
/// actuator.
fn pneumatic_payload(status: u8, primary: f32, secondary: Option<f32>) -> Result<Vec<u8>> {
    check_force("primary cylinder force", primary)?;

    let mut writer = PayloadWriter::with_capacity(9);
    writer
        .put_unsigned("status", status, 1)?
        .put_float("primary cylinder force", primary)?;

    if let Some(force) = secondary {
        check_force("secondary cylinder force", force)?;
        writer.put_float("secondary cylinder force", force)?;
    }

    Ok(writer.into_bytes())
}

/// Acknowledge the boost valve gains (function code 73).
pub fn report_boost_valve_gains_set(address: u8) -> Result<Frame> {
    build_ilc_frame(address as i32, FunctionCode::SetBoostValveGains as i32, &[])
}

/// Report the boost valve gains (function code 74).
///
/// # Arguments
/// * `address` - Bus address.
/// * `primary_gain` - Gain of the primary cylinder.
/// * `secondary_gain` - Gain of the secondary cylinder.
///
/// # Returns
/// Frame of the response.
pub fn report_boost_valve_gains(address: u8, primary_gain: f32, secondary_gain: f32) -> Result<Frame> {
    let mut writer = PayloadWriter::with_capacity(8);
    writer
        .put_float("primary gain", primary_gain)?
        .put_float("secondary gain", secondary_gain)?;

    build_ilc_frame(
        address as i32,
        FunctionCode::ReadBoostValveGains as i32,
        writer.as_bytes(),
    )
}

/// Report the pneumatic axial force (function code 75).
///
/// # Arguments
/// * `address` - Bus address.
/// * `status` - Status byte.
/// * `primary` - Primary cylinder force in Newton.
/// * `secondary` - Secondary cylinder force in Newton. Put None for the
/// single-axis actuator.
///
/// # Returns
/// Frame of the response.
pub fn report_pneumatic_force(
    address: u8,
    status: u8,
    primary: f32,
    secondary: Option<f32>,
) -> Result<Frame> {
    build_ilc_frame(
        address as i32,
        FunctionCode::PneumaticForce as i32,
        &pneumatic_payload(status, primary, secondary)?,
    )
}

/// Report the pneumatic force and status (function code 76).
///
/// # Arguments
/// * `address` - Bus address.
/// * `status` - Status byte.
/// * `primary` - Primary cylinder force in Newton.
/// * `secondary` - Secondary cylinder force in Newton. Put None for the
/// single-axis actuator.
///
/// # Returns
/// Frame of the response.
pub fn report_pneumatic_force_and_status(
    address: u8,
    status: u8,
    primary: f32,
    secondary: Option<f32>,
) -> Result<Frame> {
    build_ilc_frame(
        address as i32,
        FunctionCode::PneumaticForceAndStatus as i32,
        &pneumatic_payload(status, primary, secondary)?,
    )
}

/// Report the ADC sample rate (function code 80).
pub fn report_adc_sample_rate(address: u8, scan_rate: u8) -> Result<Frame> {
    let mut writer = PayloadWriter::with_capacity(1);
    writer.put_unsigned("scan rate", scan_rate, 1)?;

    build_ilc_frame(
        address as i32,
        FunctionCode::SetAdcSampleRate as i32,
        writer.as_bytes(),
    )
}

/// Acknowledge the ADC offset and sensitivity (function code 81).
pub fn report_adc_offset_sensitivity(address: u8) -> Result<Frame> {
    build_ilc_frame(
        address as i32,
        FunctionCode::SetAdcOffsetSensitivity as i32,
        &[],
    )
}

/// Report the DAC values (function code 82).
pub fn report_dac_values(address: u8, values: &[u16; NUM_DAC_VALUE]) -> Result<Frame> {
    let mut writer = PayloadWriter::with_capacity(2 * NUM_DAC_VALUE);
    for value in values {
        writer.put_unsigned("DAC value", *value, 2)?;
    }

    build_ilc_frame(
        address as i32,
        FunctionCode::ReadDacValues as i32,
        writer.as_bytes(),
    )
}

/// Report the calibration data (function code 110).
///
/// # Arguments
/// * `address` - Bus address.
/// * `calibration` - Calibration data.
///
/// # Returns
/// Frame of the response.
pub fn report_calibration_data(address: u8, calibration: &CalibrationData) -> Result<Frame> {
    let mut writer = PayloadWriter::with_capacity(4 * NUM_CALIBRATION_VALUE);
    writer.put_floats("calibration", &calibration.values())?;

    build_ilc_frame(
        address as i32,
        FunctionCode::ReadCalibration as i32,
        writer.as_bytes(),
    )
}

/// Report the pressure of the differential capacitance amplifier (DCA)
/// (function code 119).
///
/// # Arguments
/// * `address` - Bus address.
/// * `pressures` - Pressures in the order of primary push, primary pull,
/// secondary pull and secondary push.
///
/// # Returns
/// Frame of the response.
pub fn report_dca_pressure(address: u8, pressures: &[f32; NUM_DCA_PRESSURE]) -> Result<Frame> {
    let mut writer = PayloadWriter::with_capacity(4 * NUM_DCA_PRESSURE);
    writer.put_floats("pressure", pressures)?;

    build_ilc_frame(
        address as i32,
        FunctionCode::ReadDcaPressure as i32,
        writer.as_bytes(),
    )
}

/// Report the DCA identity (function code 120).
pub fn report_dca_id(address: u8, identity: &DcaIdentity) -> Result<Frame> {
    let mut writer = PayloadWriter::with_capacity(9);
    writer
        .put_unsigned("DCA unique id", identity.unique_id, 6)?
        .put_unsigned("DCA firmware type", identity.firmware_type, 1)?
        .put_unsigned("DCA major revision", identity.major_revision, 1)?
        .put_unsigned("DCA minor revision", identity.minor_revision, 1)?;

    build_ilc_frame(
        address as i32,
        FunctionCode::ReportDcaId as i32,
        writer.as_bytes(),
    )
}

/// Report the DCA status (function code 121).
pub fn report_dca_status(address: u8, status: u16) -> Result<Frame> {
    let mut writer = PayloadWriter::with_capacity(2);
    writer.put_unsigned("DCA status", status, 2)?;

    build_ilc_frame(
        address as i32,
        FunctionCode::ReportDcaStatus as i32,
        writer.as_bytes(),
    )
}

/// Report the pair of the linear variable differential transformer (LVDT)
/// readings (function code 122).
pub fn report_lvdt(address: u8, breakaway: f32, displacement: f32) -> Result<Frame> {
    let mut writer = PayloadWriter::with_capacity(8);
    writer
        .put_float("breakaway LVDT", breakaway)?
        .put_float("displacement LVDT", displacement)?;

    build_ilc_frame(
        address as i32,
        FunctionCode::ReadLvdt as i32,
        writer.as_bytes(),
    )
}
