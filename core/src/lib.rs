//! jaime-core
//!
//! Edit-synchronization bridge between a host-visible text buffer and an
//! external, stateful kana conversion engine that exposes only a flat ABI
//! (byte pointers, lengths and counts into its linear memory).
//!
//! Public API:
//! - `EngineAbi` / `EngineLoader` - The engine boundary and how it is loaded
//! - `EngineAdapter` - Typed, fallible calls over the raw ABI
//! - `EditBridge` - State machine keeping host text and cursor in lock-step
//!   with the engine
//! - `HostBuffer` - Codepoint-indexed text and cursor with the edit rule
//! - `EditResult` - Delete/insert outcome of a mutating engine call
//! - `CandidateList` - Pending candidates, best first
//! - `Config` - Configuration (TOML)
//! - `Error` - Error taxonomy
//!
//! ```rust,ignore
//! use jaime_core::{Config, Direction, EditBridge};
//!
//! let mut bridge = EditBridge::new(&Config::default());
//! bridge.load(&loader)?;
//!
//! bridge.insert("k")?;
//! bridge.insert("a")?;            // "ka" -> "か"
//! bridge.move_cursor(Direction::Backward)?;
//! bridge.reposition(1)?;          // user clicked after "か"
//! bridge.commit()?;               // no-op without candidates
//! ```

pub mod abi;
pub use abi::{EngineAbi, EngineLoader, Export, ExportKind};

pub mod marshal;

pub mod adapter;
pub use adapter::EngineAdapter;

pub mod edit;
pub use edit::{DeletionDirection, EditResult};

pub mod host_buffer;
pub use host_buffer::HostBuffer;

pub mod candidate;
pub use candidate::CandidateList;

pub mod bridge;
pub use bridge::{BridgeState, Direction, EditBridge};

pub mod config;
pub use config::Config;

pub mod error;
pub use error::{Error, Result};

#[cfg(any(test, feature = "testing"))]
pub mod testing;
