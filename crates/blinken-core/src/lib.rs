//! Blinken core library: the lighting-state wire codec.
//!
//! This crate decodes compact text messages such as `R255G0B10W0T1500` into a
//! [`Record`] (four channel intensities plus a fade time) and encodes records
//! back under a caller-supplied byte budget. The codec is synchronous, keeps
//! no state between calls and performs no I/O; transports, discovery and
//! actuation belong to the caller.
//!
//! Invariants:
//! - A message is accepted whole or rejected whole.
//! - Values are checked against their bounds before being committed; there
//!   is no truncation or wrap.
//! - Encoding never writes past the buffer it is given.
//!
//! Two record conventions coexist: a zeroed record is a complete device
//! state, an unset record (`-1` in every slot) is an empty sparse patch.
//! [`DeviceState`] merges sparse patches into the current state.
//!
//! Version française (résumé):
//! Cette crate décode et encode les messages texte d'état lumineux
//! (`R`, `G`, `B`, `W`, `T`). Pas d'E/S, pas d'état global ; un message
//! invalide est rejeté entièrement et l'encodage respecte le budget donné.
//!
//! # Examples
//! ```
//! use blinken_core::{DeviceState, decode_sparse, encode_sparse_to_vec};
//!
//! let patch = decode_sparse(b"R10")?;
//! assert!(patch.is_set());
//! assert_eq!(encode_sparse_to_vec(&patch, 32)?, b"R10");
//!
//! let mut state = DeviceState::new();
//! state.apply_message(b"R10")?;
//! assert_eq!(state.current().red, 10);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod fields;
mod protocol;
mod record;
mod state;

pub use fields::RecordFields;
pub use protocol::error::{DecodeError, EncodeError, ErrorKind, FieldValueError};
pub use protocol::layout::{
    DIGIT_SCRATCH_LEN, FIELD_TABLE, Field, FieldSpec, TERMINATOR, TIME_MAX, TIME_MIN, TIME_UNSET,
    VALUE_MAX, VALUE_MIN, VALUE_UNSET,
};
pub use protocol::reader::MessageReader;
pub use protocol::writer::MessageWriter;
pub use protocol::{
    decode, decode_into, decode_sparse, encode, encode_sparse, encode_sparse_to_vec,
    encode_to_vec,
};
pub use record::Record;
pub use state::DeviceState;

/// Default encode budget used by tooling, in bytes.
pub const DEFAULT_BUDGET: usize = 32;
