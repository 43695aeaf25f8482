use serde::{Deserialize, Serialize};

use crate::protocol::error::FieldValueError;
use crate::protocol::layout::Field;
use crate::record::Record;

/// Record view with optional fields, used for JSON input and output.
///
/// Absent keys map to unset slots. Values are range-checked when converted
/// back into a [`Record`].
///
/// # Examples
/// ```
/// use blinken_core::{Record, RecordFields};
///
/// let fields: RecordFields = serde_json::from_str(r#"{"red": 10, "time": 250}"#)?;
/// let record = Record::try_from(fields)?;
/// assert_eq!(record.red, 10);
/// assert!(record.is_unset(blinken_core::Field::Green));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub red: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub green: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blue: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub white: Option<i64>,
    /// Fade duration in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
}

impl RecordFields {
    pub fn get(&self, field: Field) -> Option<i64> {
        match field {
            Field::Red => self.red,
            Field::Green => self.green,
            Field::Blue => self.blue,
            Field::White => self.white,
            Field::Time => self.time,
        }
    }

    pub fn slot_mut(&mut self, field: Field) -> &mut Option<i64> {
        match field {
            Field::Red => &mut self.red,
            Field::Green => &mut self.green,
            Field::Blue => &mut self.blue,
            Field::White => &mut self.white,
            Field::Time => &mut self.time,
        }
    }

    /// Fills slots from `other` where it has a value.
    pub fn merge(&mut self, other: &RecordFields) {
        for field in Field::ALL {
            if let Some(value) = other.get(field) {
                *self.slot_mut(field) = Some(value);
            }
        }
    }
}

impl From<&Record> for RecordFields {
    fn from(record: &Record) -> Self {
        let mut fields = RecordFields::default();
        for field in record.set_fields() {
            *fields.slot_mut(field) = Some(i64::from(record.get(field)));
        }
        fields
    }
}

impl From<Record> for RecordFields {
    fn from(record: Record) -> Self {
        RecordFields::from(&record)
    }
}

impl TryFrom<RecordFields> for Record {
    type Error = FieldValueError;

    fn try_from(fields: RecordFields) -> Result<Self, Self::Error> {
        let mut record = Record::unset();
        for field in Field::ALL {
            if let Some(value) = fields.get(field) {
                record.set(field, value)?;
            }
        }
        Ok(record)
    }
}
