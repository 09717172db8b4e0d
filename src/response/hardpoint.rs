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
use crate::enums::FunctionCode;
use crate::error::{Result, SimulatorError};

// Encoder counter of the hardpoint in bytes. The counter wraps around on the
// hardware.
const ENCODER_WIDTH: usize = 4;

/// Payload of the status byte, the encoder steps and the load cell force.
fn force_status_payload(status: u8, encoder: i64, force: f32) -> Result<Vec<u8>> {
    if !force.is_finite() {
        return Err(SimulatorError::validation(
            "load cell force",
            force,
            "finite force",
        ));
    }

    let mut writer = PayloadWriter::with_capacity(1 + ENCODER_WIDTH + 4);
    writer
        .put_unsigned("status", status, 1)?
        .put_truncated("encoder", encoder, ENCODER_WIDTH)?
        .put_float("load cell force", force)?;

    Ok(writer.into_bytes())
}

/// Report the step motor command (function code 66).
///
/// # Arguments
/// * `address` - Bus address.
/// * `status` - Status byte.
/// * `encoder` - Encoder steps.
/// * `force` - Load cell force in Newton.
///
/// # Returns
/// Frame of the response.
pub fn report_step_motor(address: u8, status: u8, encoder: i64, force: f32) -> Result<Frame> {
    build_ilc_frame(
        address as i32,
        FunctionCode::StepMotor as i32,
        &force_status_payload(status, encoder, force)?,
    )
}

/// Report the force and status (function code 67).
///
/// # Arguments
/// * `address` - Bus address.
/// * `status` - Status byte.
/// * `encoder` - Encoder steps.
/// * `force` - Load cell force in Newton.
///
/// # Returns
/// Frame of the response.
pub fn report_force_and_status(address: u8, status: u8, encoder: i64, force: f32) -> Result<Frame> {
    build_ilc_frame(
        address as i32,
        FunctionCode::ForceAndStatus as i32,
        &force_status_payload(status, encoder, force)?,
    )
}
