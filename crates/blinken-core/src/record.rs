use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::fields::RecordFields;
use crate::protocol::error::FieldValueError;
use crate::protocol::layout::{Field, TIME_UNSET, VALUE_UNSET};

/// Lighting state: four channel intensities and a fade duration.
///
/// Slots hold either an in-range value or the `-1` sentinel ("unset"). A
/// zeroed record describes a complete device state; an unset record is an
/// empty sparse patch.
///
/// # Examples
/// ```
/// use blinken_core::{Field, Record};
///
/// let mut patch = Record::unset();
/// assert!(!patch.is_set());
/// patch.set(Field::Red, 10)?;
/// assert!(patch.is_set());
/// assert_eq!(patch.get(Field::Red), 10);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// Serialized through [`RecordFields`]: unset slots are omitted and
/// deserialized values are range-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RecordFields", into = "RecordFields")]
pub struct Record {
    pub red: i16,
    pub green: i16,
    pub blue: i16,
    pub white: i16,
    /// Fade duration in milliseconds.
    pub time: i32,
}

impl Record {
    /// Baseline initial state: every slot zero.
    pub const fn zeroed() -> Self {
        Self {
            red: 0,
            green: 0,
            blue: 0,
            white: 0,
            time: 0,
        }
    }

    /// Sparse initial state: every slot unset.
    pub const fn unset() -> Self {
        Self {
            red: VALUE_UNSET,
            green: VALUE_UNSET,
            blue: VALUE_UNSET,
            white: VALUE_UNSET,
            time: TIME_UNSET,
        }
    }

    /// Overwrites every slot with the values of `src`.
    pub fn copy_from(&mut self, src: &Record) {
        *self = *src;
    }

    /// True when at least one slot differs from the fully unset record.
    pub fn is_set(&self) -> bool {
        *self != Self::unset()
    }

    pub fn is_unset(&self, field: Field) -> bool {
        self.get(field) == field.unset()
    }

    pub fn get(&self, field: Field) -> i32 {
        match field {
            Field::Red => i32::from(self.red),
            Field::Green => i32::from(self.green),
            Field::Blue => i32::from(self.blue),
            Field::White => i32::from(self.white),
            Field::Time => self.time,
        }
    }

    /// Stores an in-range value into the slot for `field`.
    pub fn set(&mut self, field: Field, value: i64) -> Result<(), FieldValueError> {
        if !field.contains(value) {
            return Err(FieldValueError::new(field, value));
        }
        let err = || FieldValueError::new(field, value);
        match field {
            Field::Red => self.red = i16::try_from(value).map_err(|_| err())?,
            Field::Green => self.green = i16::try_from(value).map_err(|_| err())?,
            Field::Blue => self.blue = i16::try_from(value).map_err(|_| err())?,
            Field::White => self.white = i16::try_from(value).map_err(|_| err())?,
            Field::Time => self.time = i32::try_from(value).map_err(|_| err())?,
        }
        Ok(())
    }

    /// Marks the slot for `field` as unset.
    pub fn clear(&mut self, field: Field) {
        match field {
            Field::Red => self.red = VALUE_UNSET,
            Field::Green => self.green = VALUE_UNSET,
            Field::Blue => self.blue = VALUE_UNSET,
            Field::White => self.white = VALUE_UNSET,
            Field::Time => self.time = TIME_UNSET,
        }
    }

    /// Copies every set slot of `patch` into `self`; unset slots are skipped.
    ///
    /// Slots holding a value outside the field's bounds are skipped too.
    pub fn apply(&mut self, patch: &Record) {
        for field in patch.set_fields() {
            let value = i64::from(patch.get(field));
            if let Err(err) = self.set(field, value) {
                debug!(%err, "patch slot skipped");
            }
        }
    }

    /// Fields currently set, in canonical order.
    pub fn set_fields(&self) -> impl Iterator<Item = Field> + '_ {
        Field::ALL
            .into_iter()
            .filter(move |field| !self.is_unset(*field))
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::zeroed()
    }
}
