//! Blinken wire codec.
//!
//! Messages are single-line ASCII: a run of `tag digits` pairs with no
//! delimiters, optionally ended by a NUL byte. Tags are `R`, `G`, `B`, `W`
//! (channels, 0..=255) and `T` (fade time in ms, 0..=2147483647). The
//! module follows a layered structure:
//! - `layout`: tags, bounds and the field table (source of truth)
//! - `reader`: cursor over input bytes; digit, tag and bounded integer reads
//! - `writer`: budget-bounded output; tag, digit and terminator writes
//! - `parser`: whole-message decode state machine
//! - `encoder`: whole-message encode, full or sparse
//! - `error`: explicit, actionable errors
//!
//! Every operation is all-or-nothing. Nothing here allocates except the
//! `*_to_vec` helpers, and nothing performs I/O.
//!
//! Version française (résumé):
//! Le codec lit et écrit des messages texte `R..G..B..W..T..`. Les bornes et
//! la table des champs sont dans `layout`, les lectures dans `reader`, les
//! écritures bornées dans `writer`. Tout message invalide est rejeté en bloc.

pub mod encoder;
pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;
pub mod writer;

pub use encoder::{encode, encode_sparse, encode_sparse_to_vec, encode_to_vec};
pub use parser::{decode, decode_into, decode_sparse};
