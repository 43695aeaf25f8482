use tracing::debug;

use crate::protocol::error::DecodeError;
use crate::protocol::parser::decode_sparse;
use crate::record::Record;

/// Current device state, owned by the controller.
///
/// Incoming messages are decoded into a fresh patch and merged only after
/// the whole message was accepted, so readers never observe a half-applied
/// update.
///
/// # Examples
/// ```
/// use blinken_core::DeviceState;
///
/// let mut state = DeviceState::new();
/// state.apply_message(b"R10T500")?;
/// assert!(state.apply_message(b"G20X").is_err());
/// assert_eq!(state.current().red, 10);
/// assert_eq!(state.current().green, 0);
/// # Ok::<(), blinken_core::DecodeError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceState {
    current: Record,
}

impl DeviceState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: Record) -> Self {
        Self { current: record }
    }

    pub fn current(&self) -> &Record {
        &self.current
    }

    /// Decodes `message` as a sparse patch and merges it on success.
    ///
    /// Returns the applied patch.
    pub fn apply_message(&mut self, message: &[u8]) -> Result<Record, DecodeError> {
        let patch = decode_sparse(message)?;
        self.current.apply(&patch);
        debug!(?patch, "patch applied");
        Ok(patch)
    }

    /// Replaces the whole state, returning the previous one.
    pub fn replace(&mut self, record: Record) -> Record {
        std::mem::replace(&mut self.current, record)
    }
}
