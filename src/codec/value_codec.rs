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

use num_traits::ToPrimitive;
use std::fmt::Display;

use crate::error::{Result, SimulatorError};

// Widest integer field of the protocol in bytes.
const MAX_INTEGER_WIDTH: usize = 8;

/// Value to encode into a frame.
#[derive(Debug, PartialEq, Clone)]
pub enum Value {
    // Integer and its signedness.
    Integer { value: i128, signed: bool },
    // IEEE-754 single precision.
    Float(f32),
    // ASCII text.
    Text(String),
}

impl Value {
    /// Create a signed integer value.
    pub fn signed(value: i64) -> Self {
        Value::Integer {
            value: value as i128,
            signed: true,
        }
    }

    /// Create an unsigned integer value.
    pub fn unsigned(value: u64) -> Self {
        Value::Integer {
            value: value as i128,
            signed: false,
        }
    }
}

/// Policy of the integer encoding when the value does not fit the declared
/// width.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum EncodeMode {
    // Fail with the size mismatch.
    Strict,
    // Keep the low-order bytes of the two's complement.
    Truncating,
}

/// Append the value to the buffer in big-endian order.
///
/// # Arguments
/// * `buffer` - Buffer to append to.
/// * `field` - Name of the field used in the error message.
/// * `value` - Value to encode.
/// * `width` - Declared width in bytes.
/// * `mode` - Integer encoding policy. Ignored by the float and text.
///
/// # Returns
/// Ok if the value is appended. The buffer is not changed on error.
pub fn append_value(
    buffer: &mut Vec<u8>,
    field: &str,
    value: &Value,
    width: usize,
    mode: EncodeMode,
) -> Result<()> {
    match value {
        Value::Integer { value, signed } => {
            append_integer(buffer, field, *value, *signed, width, mode)
        }
        Value::Float(value) => append_float(buffer, field, *value, width),
        Value::Text(text) => append_text(buffer, field, text, width),
    }
}

/// Encode the value in big-endian order with the strict policy.
///
/// # Arguments
/// * `field` - Name of the field used in the error message.
/// * `value` - Value to encode.
/// * `width` - Declared width in bytes.
///
/// # Returns
/// Encoded bytes.
pub fn encode_value(field: &str, value: &Value, width: usize) -> Result<Vec<u8>> {
    let mut buffer = Vec::with_capacity(width);
    append_value(&mut buffer, field, value, width, EncodeMode::Strict)?;

    Ok(buffer)
}

/// Get the range of the integer that fits in the width.
///
/// # Arguments
/// * `width` - Width in bytes (1-8).
/// * `signed` - Signed integer or not.
///
/// # Returns
/// Minimum and maximum values.
fn integer_range(width: usize, signed: bool) -> (i128, i128) {
    let bits = 8 * width as u32;
    if signed {
        (-(1_i128 << (bits - 1)), (1_i128 << (bits - 1)) - 1)
    } else {
        (0, (1_i128 << bits) - 1)
    }
}

fn append_integer(
    buffer: &mut Vec<u8>,
    field: &str,
    value: i128,
    signed: bool,
    width: usize,
    mode: EncodeMode,
) -> Result<()> {
    if (width == 0) || (width > MAX_INTEGER_WIDTH) {
        return Err(SimulatorError::SizeMismatch {
            field: String::from(field),
            detail: format!("integer field of width {width}"),
            width: width,
        });
    }

    if mode == EncodeMode::Strict {
        let (min, max) = integer_range(width, signed);
        if (value < min) || (value > max) {
            return Err(SimulatorError::SizeMismatch {
                field: String::from(field),
                detail: format!(
                    "{} integer {value}",
                    if signed { "signed" } else { "unsigned" }
                ),
                width: width,
            });
        }
    }

    let bytes = value.to_be_bytes();
    buffer.extend_from_slice(&bytes[(bytes.len() - width)..]);

    Ok(())
}

fn append_float(buffer: &mut Vec<u8>, field: &str, value: f32, width: usize) -> Result<()> {
    if width != 4 {
        return Err(SimulatorError::SizeMismatch {
            field: String::from(field),
            detail: format!("single precision float {value}"),
            width: width,
        });
    }

    buffer.extend_from_slice(&value.to_be_bytes());

    Ok(())
}

fn append_text(buffer: &mut Vec<u8>, field: &str, text: &str, width: usize) -> Result<()> {
    if !text.is_ascii() {
        return Err(SimulatorError::validation(field, text, "ASCII text"));
    }

    if text.len() > width {
        return Err(SimulatorError::TooLong {
            field: String::from(field),
            length: text.len(),
            width: width,
        });
    }

    buffer.extend_from_slice(text.as_bytes());
    buffer.resize(buffer.len() + width - text.len(), 0);

    Ok(())
}

/// Writer to assemble the payload of a frame field by field.
#[derive(Debug, Default)]
pub struct PayloadWriter {
    _buffer: Vec<u8>,
}

impl PayloadWriter {
    /// Create a new payload writer.
    pub fn new() -> Self {
        Self {
            _buffer: Vec::new(),
        }
    }

    /// Create a new payload writer with the reserved capacity.
    ///
    /// # Arguments
    /// * `capacity` - Capacity in bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            _buffer: Vec::with_capacity(capacity),
        }
    }

    /// Put the unsigned integer.
    ///
    /// # Arguments
    /// * `field` - Name of the field.
    /// * `value` - Value of the field.
    /// * `width` - Width in bytes.
    pub fn put_unsigned<T: ToPrimitive + Display>(
        &mut self,
        field: &str,
        value: T,
        width: usize,
    ) -> Result<&mut Self> {
        let converted = value
            .to_u64()
            .ok_or_else(|| SimulatorError::validation(field, &value, "unsigned integer"))?;
        append_value(
            &mut self._buffer,
            field,
            &Value::unsigned(converted),
            width,
            EncodeMode::Strict,
        )?;

        Ok(self)
    }

    /// Put the signed integer.
    ///
    /// # Arguments
    /// * `field` - Name of the field.
    /// * `value` - Value of the field.
    /// * `width` - Width in bytes.
    pub fn put_signed<T: ToPrimitive + Display>(
        &mut self,
        field: &str,
        value: T,
        width: usize,
    ) -> Result<&mut Self> {
        let converted = value
            .to_i64()
            .ok_or_else(|| SimulatorError::validation(field, &value, "signed integer"))?;
        append_value(
            &mut self._buffer,
            field,
            &Value::signed(converted),
            width,
            EncodeMode::Strict,
        )?;

        Ok(self)
    }

    /// Put the integer and keep only the low-order bytes. This is for the
    /// counters that wrap around on the hardware (e.g. encoder steps).
    ///
    /// # Arguments
    /// * `field` - Name of the field.
    /// * `value` - Value of the field.
    /// * `width` - Width in bytes.
    pub fn put_truncated(&mut self, field: &str, value: i64, width: usize) -> Result<&mut Self> {
        append_value(
            &mut self._buffer,
            field,
            &Value::signed(value),
            width,
            EncodeMode::Truncating,
        )?;

        Ok(self)
    }

    /// Put the single precision float.
    pub fn put_float(&mut self, field: &str, value: f32) -> Result<&mut Self> {
        append_value(&mut self._buffer, field, &Value::Float(value), 4, EncodeMode::Strict)?;

        Ok(self)
    }

    /// Put the floats in order.
    pub fn put_floats(&mut self, field: &str, values: &[f32]) -> Result<&mut Self> {
        for value in values {
            self.put_float(field, *value)?;
        }

        Ok(self)
    }

    /// Put the text padded with zeros to the width.
    pub fn put_text(&mut self, field: &str, text: &str, width: usize) -> Result<&mut Self> {
        append_value(
            &mut self._buffer,
            field,
            &Value::Text(String::from(text)),
            width,
            EncodeMode::Strict,
        )?;

        Ok(self)
    }

    /// Length of the payload in bytes.
    pub fn len(&self) -> usize {
        self._buffer.len()
    }

    /// The payload is empty or not.
    pub fn is_empty(&self) -> bool {
        self._buffer.is_empty()
    }

    /// Get the payload bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self._buffer
    }

    /// Consume the writer and get the payload bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self._buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn decode_signed(bytes: &[u8]) -> i128 {
        let mut extended = if bytes[0] & 0x80 != 0 {
            [0xFF; 16]
        } else {
            [0x00; 16]
        };
        extended[(16 - bytes.len())..].copy_from_slice(bytes);
        i128::from_be_bytes(extended)
    }

    fn decode_unsigned(bytes: &[u8]) -> i128 {
        let mut extended = [0x00; 16];
        extended[(16 - bytes.len())..].copy_from_slice(bytes);
        i128::from_be_bytes(extended)
    }

    #[test]
    fn test_encode_integer_big_endian() {
        assert_eq!(
            encode_value("status", &Value::unsigned(512), 2).unwrap(),
            vec![2, 0]
        );
        assert_eq!(
            encode_value("encoder", &Value::signed(-2), 4).unwrap(),
            vec![0xFF, 0xFF, 0xFF, 0xFE]
        );
        assert_eq!(
            encode_value("unique id", &Value::unsigned(0x0102_0304_0506), 6).unwrap(),
            vec![1, 2, 3, 4, 5, 6]
        );
    }

    #[test]
    fn test_encode_integer_boundary() {
        for width in [1, 2, 4, 6] {
            let (min, max) = integer_range(width, true);
            for value in [min, min + 1, -1, 0, 1, max - 1, max] {
                let bytes = encode_value(
                    "signed",
                    &Value::Integer {
                        value: value,
                        signed: true,
                    },
                    width,
                )
                .unwrap();

                assert_eq!(bytes.len(), width);
                assert_eq!(decode_signed(&bytes), value);
            }

            let (_, max) = integer_range(width, false);
            for value in [0, 1, max - 1, max] {
                let bytes = encode_value(
                    "unsigned",
                    &Value::Integer {
                        value: value,
                        signed: false,
                    },
                    width,
                )
                .unwrap();

                assert_eq!(bytes.len(), width);
                assert_eq!(decode_unsigned(&bytes), value);
            }
        }
    }

    #[test]
    fn test_encode_integer_size_mismatch() {
        for width in [1, 2, 4, 6] {
            let (min, max) = integer_range(width, true);
            for value in [min - 1, max + 1] {
                let result = encode_value(
                    "signed",
                    &Value::Integer {
                        value: value,
                        signed: true,
                    },
                    width,
                );
                assert!(matches!(result, Err(SimulatorError::SizeMismatch { .. })));
            }

            let (_, max) = integer_range(width, false);
            for value in [-1, max + 1] {
                let result = encode_value(
                    "unsigned",
                    &Value::Integer {
                        value: value,
                        signed: false,
                    },
                    width,
                );
                assert!(matches!(result, Err(SimulatorError::SizeMismatch { .. })));
            }
        }

        assert!(matches!(
            encode_value("zero width", &Value::unsigned(0), 0),
            Err(SimulatorError::SizeMismatch { .. })
        ));
        assert!(matches!(
            encode_value("too wide", &Value::unsigned(0), 9),
            Err(SimulatorError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn test_append_integer_truncating() {
        let mut buffer = Vec::new();
        append_value(
            &mut buffer,
            "encoder",
            &Value::signed(0x1_0000_0001),
            4,
            EncodeMode::Truncating,
        )
        .unwrap();

        assert_eq!(buffer, vec![0, 0, 0, 1]);

        buffer.clear();
        append_value(
            &mut buffer,
            "status",
            &Value::signed(-1),
            1,
            EncodeMode::Truncating,
        )
        .unwrap();

        assert_eq!(buffer, vec![0xFF]);
    }

    #[test]
    fn test_encode_float() {
        let bytes = encode_value("force", &Value::Float(1.5), 4).unwrap();

        assert_eq!(bytes, vec![0x3F, 0xC0, 0x00, 0x00]);
        assert_relative_eq!(
            f32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            1.5
        );

        for width in [1, 2, 8] {
            assert!(matches!(
                encode_value("force", &Value::Float(1.5), width),
                Err(SimulatorError::SizeMismatch { .. })
            ));
        }
    }

    #[test]
    fn test_encode_text() {
        assert_eq!(
            encode_value("name", &Value::Text(String::from("ILC")), 5).unwrap(),
            vec![b'I', b'L', b'C', 0, 0]
        );
        assert_eq!(
            encode_value("name", &Value::Text(String::from("ILC")), 3).unwrap(),
            b"ILC".to_vec()
        );

        assert!(matches!(
            encode_value("name", &Value::Text(String::from("ILC")), 2),
            Err(SimulatorError::TooLong {
                length: 3,
                width: 2,
                ..
            })
        ));
        assert!(encode_value("name", &Value::Text(String::from("µ")), 4)
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_append_value_keeps_buffer_on_error() {
        let mut buffer = vec![1, 2];
        let result = append_value(
            &mut buffer,
            "mode",
            &Value::unsigned(256),
            1,
            EncodeMode::Strict,
        );

        assert!(result.is_err());
        assert_eq!(buffer, vec![1, 2]);
    }

    #[test]
    fn test_payload_writer() {
        let mut writer = PayloadWriter::with_capacity(16);
        writer
            .put_unsigned("mode", 2_u8, 1)
            .unwrap()
            .put_signed("encoder", -1_i32, 4)
            .unwrap()
            .put_float("force", 0.0)
            .unwrap()
            .put_text("name", "A", 2)
            .unwrap();

        assert_eq!(writer.len(), 11);
        assert_eq!(
            writer.into_bytes(),
            vec![2, 0xFF, 0xFF, 0xFF, 0xFF, 0, 0, 0, 0, b'A', 0]
        );
    }

    #[test]
    fn test_payload_writer_error() {
        let mut writer = PayloadWriter::new();

        assert!(writer.put_unsigned("mode", -1_i32, 1).unwrap_err().is_validation());
        assert!(matches!(
            writer.put_unsigned("mode", 300_u32, 1),
            Err(SimulatorError::SizeMismatch { .. })
        ));
        assert!(writer.is_empty());
    }
}
