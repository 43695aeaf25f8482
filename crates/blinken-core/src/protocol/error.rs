use thiserror::Error;

use super::layout::Field;

/// Coarse classification shared by decode and encode failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unrecognized tag, or digits expected but absent.
    Syntax,
    /// Value outside the field's bounds.
    Range,
    /// Output would not fit the budget or the digit scratch.
    BufferTooSmall,
}

/// Errors returned by message decoding.
///
/// A failed decode consumed nothing: the whole message is rejected.
///
/// # Examples
/// ```
/// use blinken_core::{DecodeError, ErrorKind, decode};
///
/// let err = decode(b"X5").unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::Syntax);
/// assert!(matches!(err, DecodeError::UnknownTag { offset: 0, .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unknown field tag {found:#04x} at offset {offset}")]
    UnknownTag { offset: usize, found: u8 },
    #[error("missing digits for {field} at offset {offset}")]
    MissingDigits { field: Field, offset: usize },
    #[error("{field} value out of range at offset {offset} (max {max})")]
    OutOfRange {
        field: Field,
        offset: usize,
        max: u32,
    },
}

impl DecodeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DecodeError::UnknownTag { .. } | DecodeError::MissingDigits { .. } => ErrorKind::Syntax,
            DecodeError::OutOfRange { .. } => ErrorKind::Range,
        }
    }

    /// Offset of the token that failed (tag or digit run).
    pub fn offset(&self) -> usize {
        match self {
            DecodeError::UnknownTag { offset, .. }
            | DecodeError::MissingDigits { offset, .. }
            | DecodeError::OutOfRange { offset, .. } => *offset,
        }
    }
}

/// Errors returned by message encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("buffer too small for {field}: need {needed} bytes, {remaining} remaining")]
    BufferTooSmall {
        field: Field,
        needed: usize,
        remaining: usize,
    },
    #[error("buffer too small for message terminator")]
    NoRoomForTerminator,
    #[error("{field} needs more than {capacity} digits")]
    DigitOverflow { field: Field, capacity: usize },
    #[error("{field} value {value} out of range {min}..={max}")]
    OutOfRange {
        field: Field,
        value: i64,
        min: i32,
        max: u32,
    },
}

impl EncodeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EncodeError::OutOfRange { .. } => ErrorKind::Range,
            EncodeError::BufferTooSmall { .. }
            | EncodeError::NoRoomForTerminator
            | EncodeError::DigitOverflow { .. } => ErrorKind::BufferTooSmall,
        }
    }
}

/// Value rejected when storing into a [`Record`](crate::Record) slot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("value {value} out of range for {field} ({min}..={max})")]
pub struct FieldValueError {
    pub field: Field,
    pub value: i64,
    pub min: i32,
    pub max: u32,
}

impl FieldValueError {
    pub(crate) fn new(field: Field, value: i64) -> Self {
        Self {
            field,
            value,
            min: field.min(),
            max: field.max(),
        }
    }
}

impl From<FieldValueError> for EncodeError {
    fn from(err: FieldValueError) -> Self {
        EncodeError::OutOfRange {
            field: err.field,
            value: err.value,
            min: err.min,
            max: err.max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_kinds() {
        let tag = DecodeError::UnknownTag {
            offset: 3,
            found: b'X',
        };
        assert_eq!(tag.kind(), ErrorKind::Syntax);
        assert_eq!(tag.offset(), 3);
        assert!(tag.to_string().contains("0x58"));

        let range = DecodeError::OutOfRange {
            field: Field::Red,
            offset: 1,
            max: 255,
        };
        assert_eq!(range.kind(), ErrorKind::Range);
        assert!(range.to_string().contains("red value out of range"));
    }

    #[test]
    fn encode_kinds() {
        assert_eq!(
            EncodeError::NoRoomForTerminator.kind(),
            ErrorKind::BufferTooSmall
        );
        let err: EncodeError = FieldValueError::new(Field::Time, -5).into();
        assert_eq!(err.kind(), ErrorKind::Range);
        assert!(err.to_string().contains("time value -5"));
    }
}
