use tracing::debug;

use super::error::{EncodeError, FieldValueError};
use super::layout::Field;
use super::writer::MessageWriter;
use crate::record::Record;

/// Encodes all five fields in canonical order, followed by the terminator.
///
/// The budget is `buf.len()`. Returns the number of bytes written,
/// terminator included.
///
/// # Examples
/// ```
/// use blinken_core::{Record, encode};
///
/// let mut record = Record::zeroed();
/// record.red = 10;
/// record.time = 300;
///
/// let mut buf = [0u8; 32];
/// let written = encode(&record, &mut buf)?;
/// assert_eq!(&buf[..written], b"R10G0B0W0T300\0");
/// # Ok::<(), blinken_core::EncodeError>(())
/// ```
pub fn encode(record: &Record, buf: &mut [u8]) -> Result<usize, EncodeError> {
    let mut writer = MessageWriter::new(buf);
    for field in Field::ALL {
        let value = checked_value(record, field).map_err(fail)?;
        writer.write_field(field, value).map_err(fail)?;
    }
    writer.write_terminator().map_err(fail)?;
    Ok(writer.written())
}

/// Encodes only the set fields, in canonical order, without a terminator.
///
/// Returns `Ok(0)` when no field is set; use [`Record::is_set`] to tell that
/// apart from an empty budget.
///
/// # Examples
/// ```
/// use blinken_core::{Record, encode_sparse};
///
/// let mut patch = Record::unset();
/// patch.white = 128;
///
/// let mut buf = [0u8; 8];
/// let written = encode_sparse(&patch, &mut buf)?;
/// assert_eq!(&buf[..written], b"W128");
/// # Ok::<(), blinken_core::EncodeError>(())
/// ```
pub fn encode_sparse(record: &Record, buf: &mut [u8]) -> Result<usize, EncodeError> {
    let mut writer = MessageWriter::new(buf);
    for field in record.set_fields() {
        let value = checked_value(record, field).map_err(fail)?;
        writer.write_field(field, value).map_err(fail)?;
    }
    Ok(writer.written())
}

pub fn encode_to_vec(record: &Record, budget: usize) -> Result<Vec<u8>, EncodeError> {
    let mut buf = vec![0u8; budget];
    let written = encode(record, &mut buf)?;
    buf.truncate(written);
    Ok(buf)
}

pub fn encode_sparse_to_vec(record: &Record, budget: usize) -> Result<Vec<u8>, EncodeError> {
    let mut buf = vec![0u8; budget];
    let written = encode_sparse(record, &mut buf)?;
    buf.truncate(written);
    Ok(buf)
}

fn checked_value(record: &Record, field: Field) -> Result<u64, EncodeError> {
    let value = i64::from(record.get(field));
    if !field.contains(value) {
        return Err(FieldValueError::new(field, value).into());
    }
    u64::try_from(value).map_err(|_| FieldValueError::new(field, value).into())
}

fn fail(err: EncodeError) -> EncodeError {
    debug!(error = %err, "encode aborted");
    err
}
