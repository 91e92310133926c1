//! # jaime-surface
//!
//! Input surface controller built on jaime-core: turns UI events into edit
//! bridge calls and exposes the resulting state for rendering.

pub mod config;
pub mod controller;
pub mod snapshot;

// Re-export the bridge types a UI needs from core
pub use jaime_core::{Direction, EngineAbi, EngineLoader, Error, Result};

pub use config::SurfaceConfig;
pub use controller::{InputSurface, KeyEvent, KeyResult};
pub use snapshot::{SurfaceSnapshot, SurfaceStatus};
