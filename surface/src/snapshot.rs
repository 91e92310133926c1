//! Surface state for the UI.
//!
//! After each event the UI reads a `SurfaceSnapshot` and re-renders from it:
//! the text, where to put the caret, which candidates to show and whether
//! the field is enabled. Plain data with public fields, serializable so it can
//! be handed across to a web or native view as JSON.

use serde::{Deserialize, Serialize};

/// Whether the surface can accept input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceStatus {
    /// Engine still loading; input disabled
    #[default]
    Loading,
    /// Engine loaded; input enabled
    Ready,
    /// Engine failed to load; input disabled for the session
    Unavailable,
}

/// Snapshot of everything the UI shows.
///
/// # Fields
///
/// - `text`: Buffer contents
/// - `cursor`: Caret position (codepoint offset)
/// - `candidates`: Pending candidates, best first
/// - `status`: Loading / ready / unavailable
/// - `message`: Why the surface is unavailable, or the last operation error
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceSnapshot {
    pub text: String,
    pub cursor: usize,
    pub candidates: Vec<String>,
    pub status: SurfaceStatus,
    pub message: Option<String>,
}

impl SurfaceSnapshot {
    /// Whether the input field should be disabled.
    pub fn disabled(&self) -> bool {
        self.status != SurfaceStatus::Ready
    }

    /// Check if there are candidates to show.
    pub fn has_candidates(&self) -> bool {
        !self.candidates.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
