use tracing::{debug, trace};

use super::error::DecodeError;
use super::layout::Field;
use super::reader::MessageReader;
use crate::record::Record;

enum DecodeState {
    Scanning,
    ParsingValue(Field),
}

/// Decodes a message into a zeroed record.
///
/// The message is accepted whole or not at all; no caller state is touched.
///
/// # Examples
/// ```
/// use blinken_core::decode;
///
/// let record = decode(b"R255T1500")?;
/// assert_eq!(record.red, 255);
/// assert_eq!(record.green, 0);
/// assert_eq!(record.time, 1500);
/// # Ok::<(), blinken_core::DecodeError>(())
/// ```
pub fn decode(input: &[u8]) -> Result<Record, DecodeError> {
    let mut record = Record::zeroed();
    decode_into(&mut record, input)?;
    Ok(record)
}

/// Decodes a message into an unset record, leaving absent fields unset.
///
/// # Examples
/// ```
/// use blinken_core::{Field, decode_sparse};
///
/// let patch = decode_sparse(b"G007")?;
/// assert_eq!(patch.green, 7);
/// assert!(patch.is_unset(Field::Red));
/// # Ok::<(), blinken_core::DecodeError>(())
/// ```
pub fn decode_sparse(input: &[u8]) -> Result<Record, DecodeError> {
    let mut record = Record::unset();
    decode_into(&mut record, input)?;
    Ok(record)
}

/// Decodes a message directly into `record`.
///
/// Returns the number of bytes consumed, terminator excluded. Fields are
/// written as they are accepted, so on error `record` may hold values from
/// earlier fields, and the failing field's slot is reset to zero. Decode into
/// a scratch record when the target must stay untouched on failure.
pub fn decode_into(record: &mut Record, input: &[u8]) -> Result<usize, DecodeError> {
    let mut reader = MessageReader::new(input);
    let mut state = DecodeState::Scanning;

    loop {
        state = match state {
            DecodeState::Scanning => {
                if reader.at_terminator() {
                    return Ok(reader.position());
                }
                match reader.read_tag() {
                    Ok(field) => DecodeState::ParsingValue(field),
                    Err(err) => return Err(reject(err)),
                }
            }
            DecodeState::ParsingValue(field) => match reader.read_bounded(field) {
                Ok(value) => {
                    trace!(%field, value, "field accepted");
                    record
                        .set(field, i64::from(value))
                        .map_err(|_| DecodeError::OutOfRange {
                            field,
                            offset: reader.position(),
                            max: field.max(),
                        })?;
                    DecodeState::Scanning
                }
                Err(err) => {
                    if let Err(reset) = record.set(field, 0) {
                        debug!(%reset, "failed to reset field");
                    }
                    return Err(reject(err));
                }
            },
        };
    }
}

fn reject(err: DecodeError) -> DecodeError {
    debug!(error = %err, offset = err.offset(), "message rejected");
    err
}

#[cfg(test)]
mod tests {
    use super::{decode, decode_into, decode_sparse};
    use crate::protocol::error::{DecodeError, ErrorKind};
    use crate::protocol::layout::{Field, TIME_MAX};
    use crate::record::Record;

    #[test]
    fn parse_empty() {
        assert_eq!(decode(b"").unwrap(), Record::zeroed());
        assert_eq!(decode_sparse(b"").unwrap(), Record::unset());
        assert_eq!(decode(b"\0").unwrap(), Record::zeroed());
    }

    #[test]
    fn parse_all_channels_min() {
        let record = decode(b"R0G0B0W0T0").unwrap();
        assert_eq!(record, Record::zeroed());
    }

    #[test]
    fn parse_all_channels_max() {
        let message = format!("R255G255B255W255T{TIME_MAX}");
        let record = decode(message.as_bytes()).unwrap();
        assert_eq!(record.red, 255);
        assert_eq!(record.green, 255);
        assert_eq!(record.blue, 255);
        assert_eq!(record.white, 255);
        assert_eq!(record.time, TIME_MAX);
    }

    #[test]
    fn parse_leading_zeros() {
        assert_eq!(decode(b"R007").unwrap().red, 7);
        assert_eq!(decode(b"R7").unwrap().red, 7);
        assert_eq!(decode(b"T000000000000001").unwrap().time, 1);
    }

    #[test]
    fn parse_any_order_and_subset() {
        let record = decode_sparse(b"T30B2").unwrap();
        assert_eq!(record.time, 30);
        assert_eq!(record.blue, 2);
        assert!(record.is_unset(Field::Red));
        assert!(record.is_unset(Field::White));
    }

    #[test]
    fn repeated_tags_overwrite() {
        assert_eq!(decode(b"R1R2R3").unwrap().red, 3);
    }

    #[test]
    fn parse_overflow() {
        assert_eq!(decode(b"R255").unwrap().red, 255);
        let err = decode(b"R256").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
        assert_eq!(err.offset(), 1);

        let over = format!("T{}", TIME_MAX as u64 + 1);
        assert!(decode(over.as_bytes()).is_err());
    }

    #[test]
    fn parse_unknown_tag() {
        for message in [&b"X5"[..], b"R1X5", b"X5R1", b"R1X5G2", b"r1"] {
            let err = decode(message).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Syntax, "{:?}", message);
        }
    }

    #[test]
    fn parse_missing_digits() {
        assert!(matches!(
            decode(b"R").unwrap_err(),
            DecodeError::MissingDigits { field: Field::Red, offset: 1 }
        ));
        assert!(matches!(
            decode(b"RG1").unwrap_err(),
            DecodeError::MissingDigits { field: Field::Red, offset: 1 }
        ));
    }

    #[test]
    fn parse_rejects_delimiters() {
        assert!(decode(b"R1 G2").is_err());
        assert!(decode(b"R1\n").is_err());
        assert!(decode(b"R-1").is_err());
    }

    #[test]
    fn terminator_stops_decoding() {
        let mut record = Record::unset();
        let consumed = decode_into(&mut record, b"G42\0X!").unwrap();
        assert_eq!(consumed, 3);
        assert_eq!(record.green, 42);
        assert!(record.is_unset(Field::Red));
    }

    #[test]
    fn in_place_failure_keeps_earlier_fields_and_zeroes_failing_slot() {
        let mut record = Record::unset();
        record.blue = 99;
        let err = decode_into(&mut record, b"G5B999").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
        assert_eq!(record.green, 5);
        assert_eq!(record.blue, 0);
    }

    #[test]
    fn atomic_decode_returns_nothing_on_failure() {
        let mut state = Record::zeroed();
        state.red = 50;
        if let Ok(record) = decode(b"R10X") {
            state = record;
        }
        assert_eq!(state.red, 50);
    }
}
