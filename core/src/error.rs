//! Error taxonomy for the bridge.
//!
//! Marshalling and adapter failures are never swallowed: they surface to the
//! caller as the failing operation's error, and the host buffer is left as it
//! was before the operation.

use crate::edit::DeletionDirection;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The engine module could not be fetched, instantiated or set up.
    /// Fatal for the session.
    #[error("engine failed to load: {0}")]
    EngineLoadFailure(String),

    /// An operation was attempted before the engine finished loading.
    #[error("engine is not ready")]
    EngineNotReady,

    /// `initialize` was called a second time. Programming error.
    #[error("engine was already initialized")]
    AlreadyInitialized,

    /// Encoded input does not fit in the engine's scratch area.
    #[error("input of {needed} bytes exceeds scratch capacity of {capacity} bytes")]
    BufferOverrun { needed: usize, capacity: usize },

    /// An engine-reported region lies outside its linear memory.
    #[error("region {pointer:#x}+{len} is outside engine memory of {memory_len} bytes")]
    OutOfBounds {
        pointer: u32,
        len: usize,
        memory_len: usize,
    },

    /// Engine memory held bytes that are not valid UTF-8.
    #[error("engine returned invalid UTF-8: {0}")]
    Decode(#[from] std::str::Utf8Error),

    /// The engine asked for a deletion that does not fit the host buffer.
    #[error("cannot delete {deleted} codepoints {direction} from cursor {cursor} in buffer of {len}")]
    EditOutOfRange {
        deleted: usize,
        direction: DeletionDirection,
        cursor: usize,
        len: usize,
    },

    /// A pointer reposition targeted an offset past the end of the buffer.
    #[error("cursor offset {offset} is past the end of buffer of {len}")]
    CursorOutOfRange { offset: usize, len: usize },

    /// A relative cursor move does not fit the engine's `u32` count.
    #[error("cursor move of {delta} codepoints exceeds the engine's range")]
    CursorMoveOutOfRange { delta: isize },
}

impl Error {
    /// Build a load failure from a loader error, keeping its context chain.
    pub fn load_failure(err: anyhow::Error) -> Self {
        Error::EngineLoadFailure(format!("{err:#}"))
    }

    /// Whether this error ends the editing session.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::EngineLoadFailure(_) | Error::AlreadyInitialized)
    }

    /// Whether this error came from crossing the memory boundary.
    pub fn is_marshalling(&self) -> bool {
        matches!(
            self,
            Error::BufferOverrun { .. } | Error::OutOfBounds { .. } | Error::Decode(_)
        )
    }
}
