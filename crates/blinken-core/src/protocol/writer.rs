use super::error::EncodeError;
use super::layout::{self, Field};

/// Budget-bounded writer over a caller-owned buffer.
///
/// The buffer length is the budget; nothing is ever written past it.
pub struct MessageWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> MessageWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn written(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn write_tag(&mut self, field: Field) -> Result<(), EncodeError> {
        self.require(field, layout::TAG_LEN)?;
        self.buf[self.pos] = field.tag();
        self.pos += layout::TAG_LEN;
        Ok(())
    }

    /// Writes `value` as decimal digits, most significant first.
    pub fn write_digits(&mut self, field: Field, value: u64) -> Result<usize, EncodeError> {
        let mut scratch = [0u8; layout::DIGIT_SCRATCH_LEN];
        let len = format_digits(value, &mut scratch).ok_or(EncodeError::DigitOverflow {
            field,
            capacity: layout::DIGIT_SCRATCH_LEN,
        })?;
        self.require(field, len)?;

        let out = &mut self.buf[self.pos..self.pos + len];
        for (dst, src) in out.iter_mut().zip(scratch[..len].iter().rev()) {
            *dst = *src;
        }
        self.pos += len;
        Ok(len)
    }

    pub fn write_field(&mut self, field: Field, value: u64) -> Result<(), EncodeError> {
        self.write_tag(field)?;
        self.write_digits(field, value)?;
        Ok(())
    }

    pub fn write_terminator(&mut self) -> Result<(), EncodeError> {
        if self.remaining() == 0 {
            return Err(EncodeError::NoRoomForTerminator);
        }
        self.buf[self.pos] = layout::TERMINATOR;
        self.pos += 1;
        Ok(())
    }

    fn require(&self, field: Field, needed: usize) -> Result<(), EncodeError> {
        if self.remaining() < needed {
            return Err(EncodeError::BufferTooSmall {
                field,
                needed,
                remaining: self.remaining(),
            });
        }
        Ok(())
    }
}

/// Fills `scratch` with the digits of `value`, least significant first.
///
/// Returns `None` when the value needs more digits than the scratch holds.
fn format_digits(mut value: u64, scratch: &mut [u8; layout::DIGIT_SCRATCH_LEN]) -> Option<usize> {
    let mut len = 0;
    loop {
        if len == scratch.len() {
            return None;
        }
        scratch[len] = b'0' + (value % 10) as u8;
        len += 1;
        value /= 10;
        if value == 0 {
            return Some(len);
        }
    }
}
