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

use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{AsRefStr, EnumIter, FromRepr};

/// Class of the device attached to the inner-loop controller (ILC).
#[derive(Debug, PartialEq, Clone, Copy, Hash, Eq, EnumIter, AsRefStr, Serialize)]
pub enum DeviceClass {
    ForceActuator,
    HardpointActuator,
    HardpointMonitor,
}

/// Public identifier of a device. The hardpoint actuators and the hardpoint
/// monitors share the identifiers 1-6, so the class is part of the
/// identifier.
#[derive(Debug, PartialEq, Clone, Copy, Hash, Eq, Serialize)]
pub enum DeviceId {
    ForceActuator(i32),
    HardpointActuator(i32),
    HardpointMonitor(i32),
}

impl DeviceId {
    /// Get the device class.
    ///
    /// # Returns
    /// Device class.
    pub fn class(&self) -> DeviceClass {
        match self {
            DeviceId::ForceActuator(_) => DeviceClass::ForceActuator,
            DeviceId::HardpointActuator(_) => DeviceClass::HardpointActuator,
            DeviceId::HardpointMonitor(_) => DeviceClass::HardpointMonitor,
        }
    }

    /// Get the numeric identifier.
    ///
    /// # Returns
    /// Numeric identifier.
    pub fn number(&self) -> i32 {
        match self {
            DeviceId::ForceActuator(id)
            | DeviceId::HardpointActuator(id)
            | DeviceId::HardpointMonitor(id) => *id,
        }
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceId::ForceActuator(id) => write!(f, "force actuator {id}"),
            DeviceId::HardpointActuator(id) => write!(f, "hardpoint actuator {id}"),
            DeviceId::HardpointMonitor(id) => write!(f, "hardpoint monitor {id}"),
        }
    }
}

/// Logical communication channel. Each channel is bound to exactly one
/// destination at start-up.
#[derive(Debug, PartialEq, Clone, Copy, Hash, Eq, EnumIter, AsRefStr, Serialize)]
pub enum Channel {
    SubnetA,
    SubnetB,
    SubnetC,
    SubnetD,
    SubnetE,
    Inclinometer,
    Displacement,
    Accelerometer,
    Gyro,
    DigitalInput,
    DigitalOutput,
    Acknowledgement,
}

impl Channel {
    /// Get the bus channel from the 1-based subnet number.
    ///
    /// # Arguments
    /// * `subnet` - Subnet number (1-5).
    ///
    /// # Returns
    /// Bus channel. None if the subnet number is unknown.
    pub fn from_subnet(subnet: u8) -> Option<Channel> {
        match subnet {
            1 => Some(Channel::SubnetA),
            2 => Some(Channel::SubnetB),
            3 => Some(Channel::SubnetC),
            4 => Some(Channel::SubnetD),
            5 => Some(Channel::SubnetE),
            _ => None,
        }
    }

    /// Get the 1-based subnet number.
    ///
    /// # Returns
    /// Subnet number. None if this is not a bus channel.
    pub fn subnet(&self) -> Option<u8> {
        match self {
            Channel::SubnetA => Some(1),
            Channel::SubnetB => Some(2),
            Channel::SubnetC => Some(3),
            Channel::SubnetD => Some(4),
            Channel::SubnetE => Some(5),
            _ => None,
        }
    }

    /// The channel sends frames to the control software or not.
    pub fn is_outbound(&self) -> bool {
        *self != Channel::Acknowledgement
    }
}

/// Orientation of the secondary cylinder of a force actuator.
#[derive(Debug, PartialEq, Clone, Copy, Hash, Eq, Serialize, Deserialize)]
pub enum Orientation {
    #[serde(rename = "NA")]
    None,
    #[serde(rename = "+X")]
    PlusX,
    #[serde(rename = "-X")]
    MinusX,
    #[serde(rename = "+Y")]
    PlusY,
    #[serde(rename = "-Y")]
    MinusY,
}

/// Mode of the inner-loop controller (ILC).
#[derive(FromRepr, Debug, PartialEq, Clone, Copy, Hash, Eq, EnumIter)]
#[repr(u8)]
pub enum InnerLoopControlMode {
    Standby = 0,
    Disabled = 1,
    Enabled = 2,
    FirmwareUpdate = 3,
    Fault = 4,
    ClearFaults = 5,
}

/// Function code of the ILC protocol.
#[derive(FromRepr, Debug, PartialEq, Clone, Copy, Hash, Eq, EnumIter)]
#[repr(u8)]
pub enum FunctionCode {
    ReportServerId = 17,
    ReportServerStatus = 18,
    ChangeMode = 65,
    StepMotor = 66,
    ForceAndStatus = 67,
    SetTemporaryAddress = 72,
    SetBoostValveGains = 73,
    ReadBoostValveGains = 74,
    PneumaticForce = 75,
    PneumaticForceAndStatus = 76,
    SetAdcSampleRate = 80,
    SetAdcOffsetSensitivity = 81,
    ReadDacValues = 82,
    Reset = 107,
    ReadCalibration = 110,
    ReadDcaPressure = 119,
    ReportDcaId = 120,
    ReportDcaStatus = 121,
    ReadLvdt = 122,
}

/// Kind of the ILC response. This is the typed replacement of a lookup by
/// function code.
#[derive(Debug, PartialEq, Clone, Copy, Hash, Eq, EnumIter)]
pub enum ResponseKind {
    ServerId,
    ServerStatus,
    Mode,
    StepMotor,
    ForceAndStatus,
    TemporaryAddress,
    BoostValveGainsSet,
    BoostValveGains,
    PneumaticForce,
    PneumaticForceAndStatus,
    AdcSampleRate,
    AdcOffsetSensitivity,
    DacValues,
    Reset,
    CalibrationData,
    DcaPressure,
    DcaId,
    DcaStatus,
    Lvdt,
}

impl ResponseKind {
    /// Get the function code of the response.
    ///
    /// # Returns
    /// Function code.
    pub fn function_code(&self) -> FunctionCode {
        match self {
            ResponseKind::ServerId => FunctionCode::ReportServerId,
            ResponseKind::ServerStatus => FunctionCode::ReportServerStatus,
            ResponseKind::Mode => FunctionCode::ChangeMode,
            ResponseKind::StepMotor => FunctionCode::StepMotor,
            ResponseKind::ForceAndStatus => FunctionCode::ForceAndStatus,
            ResponseKind::TemporaryAddress => FunctionCode::SetTemporaryAddress,
            ResponseKind::BoostValveGainsSet => FunctionCode::SetBoostValveGains,
            ResponseKind::BoostValveGains => FunctionCode::ReadBoostValveGains,
            ResponseKind::PneumaticForce => FunctionCode::PneumaticForce,
            ResponseKind::PneumaticForceAndStatus => FunctionCode::PneumaticForceAndStatus,
            ResponseKind::AdcSampleRate => FunctionCode::SetAdcSampleRate,
            ResponseKind::AdcOffsetSensitivity => FunctionCode::SetAdcOffsetSensitivity,
            ResponseKind::DacValues => FunctionCode::ReadDacValues,
            ResponseKind::Reset => FunctionCode::Reset,
            ResponseKind::CalibrationData => FunctionCode::ReadCalibration,
            ResponseKind::DcaPressure => FunctionCode::ReadDcaPressure,
            ResponseKind::DcaId => FunctionCode::ReportDcaId,
            ResponseKind::DcaStatus => FunctionCode::ReportDcaStatus,
            ResponseKind::Lvdt => FunctionCode::ReadLvdt,
        }
    }

    /// The response applies to the device class or not.
    ///
    /// # Arguments
    /// * `class` - Device class.
    ///
    /// # Returns
    /// True if the device of this class answers with this response.
    pub fn applies_to(&self, class: DeviceClass) -> bool {
        use DeviceClass::{ForceActuator, HardpointActuator, HardpointMonitor};

        match self {
            ResponseKind::ServerId
            | ResponseKind::ServerStatus
            | ResponseKind::Mode
            | ResponseKind::TemporaryAddress
            | ResponseKind::Reset => true,

            ResponseKind::StepMotor | ResponseKind::ForceAndStatus => class == HardpointActuator,

            ResponseKind::BoostValveGainsSet
            | ResponseKind::BoostValveGains
            | ResponseKind::PneumaticForce
            | ResponseKind::PneumaticForceAndStatus
            | ResponseKind::DacValues => class == ForceActuator,

            ResponseKind::AdcSampleRate
            | ResponseKind::AdcOffsetSensitivity
            | ResponseKind::CalibrationData => {
                (class == ForceActuator) || (class == HardpointActuator)
            }

            ResponseKind::DcaPressure
            | ResponseKind::DcaId
            | ResponseKind::DcaStatus
            | ResponseKind::Lvdt => (class == ForceActuator) || (class == HardpointMonitor),
        }
    }
}

/// Line of the digital input.
#[derive(FromRepr, Debug, PartialEq, Clone, Copy, Hash, Eq, EnumIter)]
#[repr(u8)]
pub enum DigitalInputLine {
    AirValveOpened = 0,
    AirValveClosed = 1,
    CellLightsOn = 2,
    InterlockPowerOk = 3,
    AuxPowerNetworkAOn = 4,
    AuxPowerNetworkBOn = 5,
    AuxPowerNetworkCOn = 6,
    AuxPowerNetworkDOn = 7,
    EmergencyStopActive = 8,
    ThermalControllerFault = 9,
    ParkingBrakeEngaged = 10,
}

/// Line of the digital output.
#[derive(FromRepr, Debug, PartialEq, Clone, Copy, Hash, Eq, EnumIter)]
#[repr(u8)]
pub enum DigitalOutputLine {
    AirCommand = 60,
    CellLightsCommand = 61,
    HeartbeatToSafetyController = 62,
    CriticalFaultToSafetyController = 63,
    MirrorLoweringToSafetyController = 64,
    MirrorParkedToSafetyController = 65,
    PowerNetworkACommand = 66,
    PowerNetworkBCommand = 67,
    PowerNetworkCCommand = 68,
    PowerNetworkDCommand = 69,
    AuxPowerNetworkACommand = 70,
    AuxPowerNetworkBCommand = 71,
    AuxPowerNetworkCCommand = 72,
    AuxPowerNetworkDCommand = 73,
    InterlockEnable = 74,
    FanCoilHeatersCommand = 75,
    CoolantPumpCommand = 76,
    Spare77 = 77,
}
