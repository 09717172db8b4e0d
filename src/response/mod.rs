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

//! Builders of the simulated responses. Each builder is a pure function from
//! the typed parameters to a frame.

pub mod digital_io;
pub mod force_actuator;
pub mod hardpoint;
pub mod ilc_common;
pub mod sensor;

use crate::codec::frame_builder::Frame;
use crate::constants::{NUM_DAC_VALUE, NUM_DCA_PRESSURE};
use crate::enums::{InnerLoopControlMode, ResponseKind};
use crate::error::Result;

use force_actuator::{CalibrationData, DcaIdentity};
use ilc_common::ServerIdentity;

/// Response of the inner-loop controller (ILC) with its parameters.
#[derive(Debug, PartialEq, Clone)]
pub enum IlcResponse {
    ServerId(ServerIdentity),
    ServerStatus {
        mode: InnerLoopControlMode,
        status: u16,
        faults: u16,
    },
    Mode(InnerLoopControlMode),
    StepMotor {
        status: u8,
        encoder: i64,
        force: f32,
    },
    ForceAndStatus {
        status: u8,
        encoder: i64,
        force: f32,
    },
    TemporaryAddress(u8),
    BoostValveGainsSet,
    BoostValveGains {
        primary_gain: f32,
        secondary_gain: f32,
    },
    PneumaticForce {
        status: u8,
        primary: f32,
        secondary: Option<f32>,
    },
    PneumaticForceAndStatus {
        status: u8,
        primary: f32,
        secondary: Option<f32>,
    },
    AdcSampleRate(u8),
    AdcOffsetSensitivity,
    DacValues([u16; NUM_DAC_VALUE]),
    Reset,
    CalibrationData(Box<CalibrationData>),
    DcaPressure([f32; NUM_DCA_PRESSURE]),
    DcaId(DcaIdentity),
    DcaStatus(u16),
    Lvdt {
        breakaway: f32,
        displacement: f32,
    },
}

impl IlcResponse {
    /// Get the kind of the response.
    ///
    /// # Returns
    /// Response kind.
    pub fn kind(&self) -> ResponseKind {
        match self {
            IlcResponse::ServerId(_) => ResponseKind::ServerId,
            IlcResponse::ServerStatus { .. } => ResponseKind::ServerStatus,
            IlcResponse::Mode(_) => ResponseKind::Mode,
            IlcResponse::StepMotor { .. } => ResponseKind::StepMotor,
            IlcResponse::ForceAndStatus { .. } => ResponseKind::ForceAndStatus,
            IlcResponse::TemporaryAddress(_) => ResponseKind::TemporaryAddress,
            IlcResponse::BoostValveGainsSet => ResponseKind::BoostValveGainsSet,
            IlcResponse::BoostValveGains { .. } => ResponseKind::BoostValveGains,
            IlcResponse::PneumaticForce { .. } => ResponseKind::PneumaticForce,
            IlcResponse::PneumaticForceAndStatus { .. } => ResponseKind::PneumaticForceAndStatus,
            IlcResponse::AdcSampleRate(_) => ResponseKind::AdcSampleRate,
            IlcResponse::AdcOffsetSensitivity => ResponseKind::AdcOffsetSensitivity,
            IlcResponse::DacValues(_) => ResponseKind::DacValues,
            IlcResponse::Reset => ResponseKind::Reset,
            IlcResponse::CalibrationData(_) => ResponseKind::CalibrationData,
            IlcResponse::DcaPressure(_) => ResponseKind::DcaPressure,
            IlcResponse::DcaId(_) => ResponseKind::DcaId,
            IlcResponse::DcaStatus(_) => ResponseKind::DcaStatus,
            IlcResponse::Lvdt { .. } => ResponseKind::Lvdt,
        }
    }

    /// The response carries the secondary cylinder force of the dual-axis
    /// actuator or not.
    pub fn is_dual_axis(&self) -> bool {
        matches!(
            self,
            IlcResponse::PneumaticForce {
                secondary: Some(_),
                ..
            } | IlcResponse::PneumaticForceAndStatus {
                secondary: Some(_),
                ..
            }
        )
    }

    /// Build the frame of the response.
    ///
    /// # Arguments
    /// * `address` - Bus address of the ILC.
    ///
    /// # Returns
    /// Frame of the response.
    pub fn build(&self, address: u8) -> Result<Frame> {
        match self {
            IlcResponse::ServerId(identity) => ilc_common::report_server_id(address, identity),
            IlcResponse::ServerStatus {
                mode,
                status,
                faults,
            } => ilc_common::report_server_status(address, *mode, *status, *faults),
            IlcResponse::Mode(mode) => ilc_common::report_mode(address, *mode),
            IlcResponse::StepMotor {
                status,
                encoder,
                force,
            } => hardpoint::report_step_motor(address, *status, *encoder, *force),
            IlcResponse::ForceAndStatus {
                status,
                encoder,
                force,
            } => hardpoint::report_force_and_status(address, *status, *encoder, *force),
            IlcResponse::TemporaryAddress(temporary_address) => {
                ilc_common::report_temporary_address(address, *temporary_address)
            }
            IlcResponse::BoostValveGainsSet => {
                force_actuator::report_boost_valve_gains_set(address)
            }
            IlcResponse::BoostValveGains {
                primary_gain,
                secondary_gain,
            } => force_actuator::report_boost_valve_gains(address, *primary_gain, *secondary_gain),
            IlcResponse::PneumaticForce {
                status,
                primary,
                secondary,
            } => force_actuator::report_pneumatic_force(address, *status, *primary, *secondary),
            IlcResponse::PneumaticForceAndStatus {
                status,
                primary,
                secondary,
            } => force_actuator::report_pneumatic_force_and_status(
                address, *status, *primary, *secondary,
            ),
            IlcResponse::AdcSampleRate(scan_rate) => {
                force_actuator::report_adc_sample_rate(address, *scan_rate)
            }
            IlcResponse::AdcOffsetSensitivity => {
                force_actuator::report_adc_offset_sensitivity(address)
            }
            IlcResponse::DacValues(values) => force_actuator::report_dac_values(address, values),
            IlcResponse::Reset => ilc_common::report_reset(address),
            IlcResponse::CalibrationData(calibration) => {
                force_actuator::report_calibration_data(address, calibration)
            }
            IlcResponse::DcaPressure(pressures) => {
                force_actuator::report_dca_pressure(address, pressures)
            }
            IlcResponse::DcaId(identity) => force_actuator::report_dca_id(address, identity),
            IlcResponse::DcaStatus(status) => force_actuator::report_dca_status(address, *status),
            IlcResponse::Lvdt {
                breakaway,
                displacement,
            } => force_actuator::report_lvdt(address, *breakaway, *displacement),
        }
    }
}
