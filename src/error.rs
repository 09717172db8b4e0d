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

use std::io;
use std::time::Duration;
use thiserror::Error;

use crate::enums::{Channel, DeviceId, ResponseKind};

/// Errors raised by the codec, the response builders, the registry and the
/// router. Every error is local and synchronous and is returned to the caller
/// as is.
#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("invalid {field}: {value} is outside of the range {range}")]
    Validation {
        field: String,
        value: String,
        range: String,
    },
    #[error("{field}: {detail} does not fit in {width} byte(s)")]
    SizeMismatch {
        field: String,
        detail: String,
        width: usize,
    },
    #[error("{field}: text of {length} byte(s) is longer than {width} byte(s)")]
    TooLong {
        field: String,
        length: usize,
        width: usize,
    },
    #[error("{field}: {value} is outside of the range 0-255")]
    OutOfRange { field: String, value: i64 },
    #[error("device {0} is not in the registry")]
    NotFound(DeviceId),
    #[error("no reply on the {channel:?} channel within {timeout:?}")]
    Timeout { channel: Channel, timeout: Duration },
    #[error("response {kind:?} is not supported by the device {device}")]
    UnsupportedResponse { kind: ResponseKind, device: DeviceId },
    #[error("transport failure: {0}")]
    Io(#[from] io::Error),
    #[error("configuration failure: {0}")]
    Config(#[from] config::ConfigError),
    #[error("device table failure: {0}")]
    Table(#[from] csv::Error),
    #[error("serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimulatorError>;

impl SimulatorError {
    /// Create a validation error.
    ///
    /// # Arguments
    /// * `field` - Name of the offending field.
    /// * `value` - Offending value.
    /// * `range` - Legal range of the field.
    ///
    /// # Returns
    /// Validation error.
    pub fn validation(field: &str, value: impl ToString, range: &str) -> Self {
        Self::Validation {
            field: String::from(field),
            value: value.to_string(),
            range: String::from(range),
        }
    }

    /// Is the validation error or not.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message() {
        let error = SimulatorError::validation("accelerometer number", 5, "1-4");

        assert!(error.is_validation());
        assert_eq!(
            error.to_string(),
            "invalid accelerometer number: 5 is outside of the range 1-4"
        );
    }

    #[test]
    fn test_not_found_message() {
        let error = SimulatorError::NotFound(DeviceId::ForceActuator(999));

        assert!(!error.is_validation());
        assert_eq!(
            error.to_string(),
            "device force actuator 999 is not in the registry"
        );
    }

    #[test]
    fn test_serialization_error() {
        let error: SimulatorError = serde_json::from_str::<Vec<u8>>("[1,")
            .unwrap_err()
            .into();

        assert!(matches!(error, SimulatorError::Serialization(_)));
        assert!(error.to_string().starts_with("serialization failure: "));
    }

    #[test]
    fn test_out_of_range_message() {
        let error = SimulatorError::OutOfRange {
            field: String::from("address"),
            value: 256,
        };

        assert_eq!(error.to_string(), "address: 256 is outside of the range 0-255");
    }
}
