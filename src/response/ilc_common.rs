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
use crate::enums::{FunctionCode, InnerLoopControlMode};
use crate::error::Result;

/// Identity of the inner-loop controller (ILC) reported by the function code
/// 17.
#[derive(Debug, PartialEq, Clone)]
pub struct ServerIdentity {
    // Unique 48-bit identifier.
    pub unique_id: u64,
    pub ilc_app_type: u8,
    pub network_node_type: u8,
    pub ilc_selected_options: u8,
    pub network_node_options: u8,
    pub major_revision: u8,
    pub minor_revision: u8,
    // Firmware name in ASCII.
    pub firmware_name: String,
}

/// Report the server identity (function code 17).
///
/// # Arguments
/// * `address` - Bus address.
/// * `identity` - Identity of the ILC.
///
/// # Returns
/// Frame of the response.
pub fn report_server_id(address: u8, identity: &ServerIdentity) -> Result<Frame> {
    let mut writer = PayloadWriter::with_capacity(12 + identity.firmware_name.len());
    writer
        .put_unsigned("unique id", identity.unique_id, 6)?
        .put_unsigned("ILC application type", identity.ilc_app_type, 1)?
        .put_unsigned("network node type", identity.network_node_type, 1)?
        .put_unsigned("ILC selected options", identity.ilc_selected_options, 1)?
        .put_unsigned("network node options", identity.network_node_options, 1)?
        .put_unsigned("major revision", identity.major_revision, 1)?
        .put_unsigned("minor revision", identity.minor_revision, 1)?
        .put_text(
            "firmware name",
            &identity.firmware_name,
            identity.firmware_name.len(),
        )?;

    build_ilc_frame(
        address as i32,
        FunctionCode::ReportServerId as i32,
        writer.as_bytes(),
    )
}

/// Report the server status (function code 18).
///
/// # Arguments
/// * `address` - Bus address.
/// * `mode` - ILC mode.
/// * `status` - Status bits.
/// * `faults` - Fault bits.
///
/// # Returns
/// Frame of the response.
pub fn report_server_status(
    address: u8,
    mode: InnerLoopControlMode,
    status: u16,
    faults: u16,
) -> Result<Frame> {
    let mut writer = PayloadWriter::with_capacity(5);
    writer
        .put_unsigned("mode", mode as u8, 1)?
        .put_unsigned("status", status, 2)?
        .put_unsigned("faults", faults, 2)?;

    build_ilc_frame(
        address as i32,
        FunctionCode::ReportServerStatus as i32,
        writer.as_bytes(),
    )
}

/// Report the mode after the change of mode (function code 65).
pub fn report_mode(address: u8, mode: InnerLoopControlMode) -> Result<Frame> {
    let mut writer = PayloadWriter::with_capacity(2);
    writer.put_unsigned("mode", mode as u8, 2)?;

    build_ilc_frame(
        address as i32,
        FunctionCode::ChangeMode as i32,
        writer.as_bytes(),
    )
}

/// Report the temporary address (function code 72).
pub fn report_temporary_address(address: u8, temporary_address: u8) -> Result<Frame> {
    let mut writer = PayloadWriter::with_capacity(1);
    writer.put_unsigned("temporary address", temporary_address, 1)?;

    build_ilc_frame(
        address as i32,
        FunctionCode::SetTemporaryAddress as i32,
        writer.as_bytes(),
    )
}

/// Acknowledge the reset (function code 107).
pub fn report_reset(address: u8) -> Result<Frame> {
    build_ilc_frame(address as i32, FunctionCode::Reset as i32, &[])
}
