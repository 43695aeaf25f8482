use super::error::DecodeError;
use super::layout::{self, Field};

/// Cursor over a message. Every read either consumes a whole token or
/// leaves the position where it was.
pub struct MessageReader<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> MessageReader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    pub fn at_terminator(&self) -> bool {
        matches!(self.peek(), None | Some(layout::TERMINATOR))
    }

    pub fn read_digit(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        if !byte.is_ascii_digit() {
            return None;
        }
        self.pos += 1;
        Some(byte - b'0')
    }

    pub fn read_tag(&mut self) -> Result<Field, DecodeError> {
        let offset = self.pos;
        let found = self.peek().unwrap_or(layout::TERMINATOR);
        let field = Field::from_tag(found).ok_or(DecodeError::UnknownTag { offset, found })?;
        self.pos += layout::TAG_LEN;
        Ok(field)
    }

    /// Reads the longest digit run as the value of `field`.
    ///
    /// Leading zeros are accepted and the run has no width limit. The value
    /// is checked against the field maximum before each digit is committed.
    pub fn read_bounded(&mut self, field: Field) -> Result<u32, DecodeError> {
        let start = self.pos;
        let max = field.max();
        let mut value = 0u32;
        let mut digits = 0usize;

        while let Some(digit) = self.read_digit() {
            digits += 1;
            let next = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(u32::from(digit)))
                .filter(|v| *v <= max);
            match next {
                Some(next) => value = next,
                None => {
                    self.pos = start;
                    return Err(DecodeError::OutOfRange {
                        field,
                        offset: start,
                        max,
                    });
                }
            }
        }

        if digits == 0 {
            return Err(DecodeError::MissingDigits {
                field,
                offset: start,
            });
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::MessageReader;
    use crate::protocol::error::DecodeError;
    use crate::protocol::layout::{Field, TIME_MAX, VALUE_MAX};

    #[test]
    fn digit_consumes_one_byte_or_nothing() {
        for byte in 0..=u8::MAX {
            let input = [byte];
            let mut reader = MessageReader::new(&input);
            match reader.read_digit() {
                Some(digit) => {
                    assert!(byte.is_ascii_digit());
                    assert_eq!(digit, byte - b'0');
                    assert_eq!(reader.position(), 1);
                }
                None => {
                    assert!(!byte.is_ascii_digit());
                    assert_eq!(reader.position(), 0);
                }
            }
        }
    }

    #[test]
    fn digit_at_end_of_input() {
        let mut reader = MessageReader::new(b"");
        assert_eq!(reader.read_digit(), None);
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn tag_parses_every_field() {
        for field in Field::ALL {
            let input = [field.tag(), b'1'];
            let mut reader = MessageReader::new(&input);
            assert_eq!(reader.read_tag().unwrap(), field);
            assert_eq!(reader.position(), 1);
        }
    }

    #[test]
    fn tag_rejects_terminator_without_moving() {
        let mut reader = MessageReader::new(b"\0");
        let err = reader.read_tag().unwrap_err();
        assert_eq!(err, DecodeError::UnknownTag { offset: 0, found: 0 });
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn bounded_accepts_full_channel_range() {
        for value in 0..=VALUE_MAX as u32 {
            let text = value.to_string();
            let mut reader = MessageReader::new(text.as_bytes());
            assert_eq!(reader.read_bounded(Field::Green).unwrap(), value);
            assert_eq!(reader.position(), text.len());
        }
    }

    #[test]
    fn bounded_stops_at_first_non_digit() {
        let mut reader = MessageReader::new(b"12G3");
        assert_eq!(reader.read_bounded(Field::Red).unwrap(), 12);
        assert_eq!(reader.position(), 2);
        assert_eq!(reader.peek(), Some(b'G'));
    }

    #[test]
    fn bounded_leading_zeros_are_unbounded_width() {
        let text = format!("{}7", "0".repeat(40));
        let mut reader = MessageReader::new(text.as_bytes());
        assert_eq!(reader.read_bounded(Field::Blue).unwrap(), 7);
        assert_eq!(reader.position(), text.len());
    }

    #[test]
    fn bounded_overflow_restores_position() {
        let mut reader = MessageReader::new(b"256");
        let err = reader.read_bounded(Field::Red).unwrap_err();
        assert!(matches!(err, DecodeError::OutOfRange { offset: 0, max: 255, .. }));
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn bounded_time_limits() {
        let max = TIME_MAX.to_string();
        let mut reader = MessageReader::new(max.as_bytes());
        assert_eq!(reader.read_bounded(Field::Time).unwrap(), TIME_MAX as u32);

        let over = (TIME_MAX as u64 + 1).to_string();
        let mut reader = MessageReader::new(over.as_bytes());
        assert!(reader.read_bounded(Field::Time).is_err());
        assert_eq!(reader.position(), 0);

        let mut reader = MessageReader::new(b"99999999999999999999");
        assert!(reader.read_bounded(Field::Time).is_err());
    }

    #[test]
    fn bounded_requires_a_digit() {
        let mut reader = MessageReader::new(b"G1");
        let err = reader.read_bounded(Field::Red).unwrap_err();
        assert_eq!(
            err,
            DecodeError::MissingDigits {
                field: Field::Red,
                offset: 0
            }
        );
        assert_eq!(reader.position(), 0);
    }
}
