use std::fmt;

/// Ends a message. The end of the input slice is treated the same way.
pub const TERMINATOR: u8 = 0x00;
pub const TAG_LEN: usize = 1;

pub const VALUE_MIN: i16 = 0;
pub const VALUE_MAX: i16 = 255;
pub const VALUE_UNSET: i16 = -1;

pub const TIME_MIN: i32 = 0;
pub const TIME_MAX: i32 = i32::MAX;
pub const TIME_UNSET: i32 = -1;

/// Widest field is the fade time: `2147483647` has 10 digits.
pub const DIGIT_SCRATCH_LEN: usize = 10;

/// One scalar slot of a [`Record`](crate::Record), addressed by its wire tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Red,
    Green,
    Blue,
    White,
    Time,
}

/// Static description of one field: tag byte, bounds and sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub field: Field,
    pub tag: u8,
    pub name: &'static str,
    pub min: i32,
    pub max: u32,
    pub unset: i32,
}

/// Tag dispatch table, in canonical encode order.
pub const FIELD_TABLE: [FieldSpec; 5] = [
    FieldSpec {
        field: Field::Red,
        tag: b'R',
        name: "red",
        min: VALUE_MIN as i32,
        max: VALUE_MAX as u32,
        unset: VALUE_UNSET as i32,
    },
    FieldSpec {
        field: Field::Green,
        tag: b'G',
        name: "green",
        min: VALUE_MIN as i32,
        max: VALUE_MAX as u32,
        unset: VALUE_UNSET as i32,
    },
    FieldSpec {
        field: Field::Blue,
        tag: b'B',
        name: "blue",
        min: VALUE_MIN as i32,
        max: VALUE_MAX as u32,
        unset: VALUE_UNSET as i32,
    },
    FieldSpec {
        field: Field::White,
        tag: b'W',
        name: "white",
        min: VALUE_MIN as i32,
        max: VALUE_MAX as u32,
        unset: VALUE_UNSET as i32,
    },
    FieldSpec {
        field: Field::Time,
        tag: b'T',
        name: "time",
        min: TIME_MIN,
        max: TIME_MAX as u32,
        unset: TIME_UNSET,
    },
];

impl Field {
    /// All fields in canonical order (R, G, B, W, T).
    pub const ALL: [Field; 5] = [
        Field::Red,
        Field::Green,
        Field::Blue,
        Field::White,
        Field::Time,
    ];

    pub fn spec(self) -> &'static FieldSpec {
        &FIELD_TABLE[self as usize]
    }

    pub fn from_tag(tag: u8) -> Option<Field> {
        FIELD_TABLE
            .iter()
            .find(|spec| spec.tag == tag)
            .map(|spec| spec.field)
    }

    pub fn tag(self) -> u8 {
        self.spec().tag
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn min(self) -> i32 {
        self.spec().min
    }

    pub fn max(self) -> u32 {
        self.spec().max
    }

    pub fn unset(self) -> i32 {
        self.spec().unset
    }

    /// Whether `value` lies in the field's wire domain (the sentinel does not).
    pub fn contains(self, value: i64) -> bool {
        value >= i64::from(self.min()) && value <= i64::from(self.max())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_order_matches_field_discriminants() {
        for (index, field) in Field::ALL.iter().enumerate() {
            assert_eq!(FIELD_TABLE[index].field, *field);
        }
    }

    #[test]
    fn tags_are_unique() {
        for a in FIELD_TABLE.iter() {
            let same = FIELD_TABLE.iter().filter(|b| b.tag == a.tag).count();
            assert_eq!(same, 1, "duplicate tag {}", a.tag as char);
        }
    }

    #[test]
    fn from_tag_rejects_other_bytes() {
        assert_eq!(Field::from_tag(b'R'), Some(Field::Red));
        assert_eq!(Field::from_tag(b'T'), Some(Field::Time));
        assert_eq!(Field::from_tag(b'r'), None);
        assert_eq!(Field::from_tag(b'X'), None);
        assert_eq!(Field::from_tag(TERMINATOR), None);
    }

    #[test]
    fn scratch_fits_widest_field() {
        let widest = FIELD_TABLE
            .iter()
            .map(|spec| spec.max.to_string().len())
            .max()
            .unwrap();
        assert_eq!(widest, DIGIT_SCRATCH_LEN);
    }

    #[test]
    fn contains_excludes_sentinel() {
        assert!(Field::Red.contains(0));
        assert!(Field::Red.contains(255));
        assert!(!Field::Red.contains(256));
        assert!(!Field::Red.contains(i64::from(VALUE_UNSET)));
        assert!(Field::Time.contains(i64::from(TIME_MAX)));
        assert!(!Field::Time.contains(i64::from(TIME_MAX) + 1));
    }
}
