//! Per-cell value encoding.
//!
//! Every function here writes one fixed-size slot of an observation into a
//! caller-provided buffer. They check the variable's declared type, keep
//! application values out of the reserved missing-value region, and never
//! touch session state.

use crate::bits::ByteOrder;
use crate::error::{DtaError, Result};
use crate::profile::VersionProfile;
use crate::types::sentinel::{
    BYTE_MAX, BYTE_MISSING, BYTE_MISSING_A, DOUBLE_MAX_BITS, DOUBLE_MISSING_A_BITS,
    DOUBLE_MISSING_BITS, DOUBLE_TAG_SHIFT, FLOAT_MAX_BITS, FLOAT_MISSING_A_BITS,
    FLOAT_MISSING_BITS, FLOAT_TAG_SHIFT, INT16_MAX, INT16_MISSING, INT16_MISSING_A, INT32_MAX,
    INT32_MISSING, INT32_MISSING_A,
};
use crate::types::{DtaType, DtaValue, DtaVariable, MissingValue};

/// Borrow the first `width` bytes of `buf`.
fn slot(buf: &mut [u8], width: usize) -> Result<&mut [u8]> {
    let actual = buf.len();
    buf.get_mut(..width).ok_or(DtaError::RowLengthMismatch {
        expected: width,
        actual,
    })
}

fn check_type(variable: &DtaVariable, actual: DtaType) -> Result<()> {
    if variable.data_type != actual {
        return Err(DtaError::type_mismatch(
            &variable.name,
            variable.data_type,
            actual,
        ));
    }
    Ok(())
}

pub fn write_byte(buf: &mut [u8], variable: &DtaVariable, value: i8) -> Result<()> {
    check_type(variable, DtaType::Byte)?;
    if value > BYTE_MAX {
        return Err(DtaError::out_of_range(&variable.name));
    }
    put_byte(buf, value)
}

pub fn write_int16(
    buf: &mut [u8],
    variable: &DtaVariable,
    value: i16,
    order: ByteOrder,
) -> Result<()> {
    check_type(variable, DtaType::Int16)?;
    if value > INT16_MAX {
        return Err(DtaError::out_of_range(&variable.name));
    }
    put_int16(buf, value, order)
}

pub fn write_int32(
    buf: &mut [u8],
    variable: &DtaVariable,
    value: i32,
    order: ByteOrder,
) -> Result<()> {
    check_type(variable, DtaType::Int32)?;
    if value > INT32_MAX {
        return Err(DtaError::out_of_range(&variable.name));
    }
    put_int32(buf, value, order)
}

/// Write a float. NaN becomes system missing; +inf and values above the
/// largest non-missing float are rejected.
pub fn write_float(
    buf: &mut [u8],
    variable: &DtaVariable,
    value: f32,
    order: ByteOrder,
) -> Result<()> {
    check_type(variable, DtaType::Float)?;
    if value > f32::from_bits(FLOAT_MAX_BITS) {
        return Err(DtaError::out_of_range(&variable.name));
    }
    if value.is_nan() {
        return write_numeric_missing(buf, variable, order);
    }
    put_u32(buf, value.to_bits(), order)
}

/// Write a double. NaN becomes system missing; +inf and values above the
/// largest non-missing double are rejected.
pub fn write_double(
    buf: &mut [u8],
    variable: &DtaVariable,
    value: f64,
    order: ByteOrder,
) -> Result<()> {
    check_type(variable, DtaType::Double)?;
    if value > f64::from_bits(DOUBLE_MAX_BITS) {
        return Err(DtaError::out_of_range(&variable.name));
    }
    if value.is_nan() {
        return write_numeric_missing(buf, variable, order);
    }
    put_u64(buf, value.to_bits(), order)
}

/// Write a string left-justified and null-padded to the clamped width.
///
/// `None` and empty strings produce an all-zero field; longer values are
/// truncated to the field.
pub fn write_string(
    buf: &mut [u8],
    variable: &DtaVariable,
    value: Option<&str>,
    max_width: usize,
) -> Result<()> {
    check_type(variable, DtaType::String)?;
    let width = match variable.storage_width {
        0 => max_width,
        width => width.min(max_width),
    };
    let field = slot(buf, width)?;
    field.fill(0);
    if let Some(value) = value {
        let bytes = value.as_bytes();
        let len = bytes.len().min(width);
        field[..len].copy_from_slice(&bytes[..len]);
    }
    Ok(())
}

/// Write the system missing value (`.`) of a numeric variable.
pub fn write_numeric_missing(
    buf: &mut [u8],
    variable: &DtaVariable,
    order: ByteOrder,
) -> Result<()> {
    match variable.data_type {
        DtaType::Byte => put_byte(buf, BYTE_MISSING),
        DtaType::Int16 => put_int16(buf, INT16_MISSING, order),
        DtaType::Int32 => put_int32(buf, INT32_MISSING, order),
        DtaType::Float => put_u32(buf, FLOAT_MISSING_BITS, order),
        DtaType::Double => put_u64(buf, DOUBLE_MISSING_BITS, order),
        // `.` is a numeric code
        DtaType::String => Err(DtaError::type_mismatch(
            &variable.name,
            DtaType::String,
            DtaType::Double,
        )),
    }
}

/// Write a tagged missing value (`.a` through `.z`).
pub fn write_tagged_missing(
    buf: &mut [u8],
    variable: &DtaVariable,
    tag: char,
    order: ByteOrder,
) -> Result<()> {
    let Some(offset) = MissingValue::tag_offset(tag) else {
        return Err(DtaError::out_of_range(&variable.name));
    };
    match variable.data_type {
        DtaType::Byte => put_byte(buf, BYTE_MISSING_A + offset as i8),
        DtaType::Int16 => put_int16(buf, INT16_MISSING_A + i16::from(offset), order),
        DtaType::Int32 => put_int32(buf, INT32_MISSING_A + i32::from(offset), order),
        DtaType::Float => put_u32(
            buf,
            FLOAT_MISSING_A_BITS + (u32::from(offset) << FLOAT_TAG_SHIFT),
            order,
        ),
        DtaType::Double => put_u64(
            buf,
            DOUBLE_MISSING_A_BITS + (u64::from(offset) << DOUBLE_TAG_SHIFT),
            order,
        ),
        DtaType::String => Err(DtaError::tagged_not_supported(&variable.name)),
    }
}

/// Encode any cell value, dispatching strings and plain missing values
/// through the version profile.
pub fn encode_value(
    buf: &mut [u8],
    variable: &DtaVariable,
    value: &DtaValue,
    profile: &VersionProfile,
    order: ByteOrder,
) -> Result<()> {
    match value {
        DtaValue::Byte(v) => write_byte(buf, variable, *v),
        DtaValue::Int16(v) => write_int16(buf, variable, *v, order),
        DtaValue::Int32(v) => write_int32(buf, variable, *v, order),
        DtaValue::Float(v) => write_float(buf, variable, *v, order),
        DtaValue::Double(v) => write_double(buf, variable, *v, order),
        DtaValue::String(v) => (profile.write_string)(buf, variable, v.as_deref()),
        DtaValue::Missing(MissingValue::System) => (profile.write_missing)(buf, variable, order),
        DtaValue::Missing(MissingValue::Tagged(tag)) => {
            write_tagged_missing(buf, variable, *tag, order)
        }
    }
}

/// Bytes per observation for the given variables.
#[must_use]
pub fn row_width(variables: &[DtaVariable], profile: &VersionProfile) -> usize {
    variables.iter().map(|v| profile.storage_width(v)).sum()
}

fn put_byte(buf: &mut [u8], value: i8) -> Result<()> {
    slot(buf, 1)?[0] = value as u8;
    Ok(())
}

fn put_int16(buf: &mut [u8], value: i16, order: ByteOrder) -> Result<()> {
    order.put_u16(slot(buf, 2)?, value as u16);
    Ok(())
}

fn put_int32(buf: &mut [u8], value: i32, order: ByteOrder) -> Result<()> {
    put_u32(buf, value as u32, order)
}

fn put_u32(buf: &mut [u8], value: u32, order: ByteOrder) -> Result<()> {
    order.put_u32(slot(buf, 4)?, value);
    Ok(())
}

fn put_u64(buf: &mut [u8], value: u64, order: ByteOrder) -> Result<()> {
    order.put_u64(slot(buf, 8)?, value);
    Ok(())
}
