//! Edit results reported by the engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the cursor an engine deletion applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeletionDirection {
    /// Codepoints immediately before the cursor.
    #[default]
    Backward,
    /// Codepoints starting at the cursor.
    Forward,
}

impl DeletionDirection {
    /// Decode the engine's direction code.
    ///
    /// `1` is forward; every other code is backward. Code `0` means "no
    /// deletion" and only ever accompanies a zero count, where the direction
    /// has no effect.
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => DeletionDirection::Forward,
            _ => DeletionDirection::Backward,
        }
    }
}

impl fmt::Display for DeletionDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeletionDirection::Backward => f.write_str("backward"),
            DeletionDirection::Forward => f.write_str("forward"),
        }
    }
}

/// Outcome of a mutating engine call (`insert` or `apply_match`).
///
/// Means: delete `deleted` codepoints on the `direction` side of the cursor,
/// then insert `inserted` at the resulting cursor.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EditResult {
    pub deleted: usize,
    pub direction: DeletionDirection,
    pub inserted: String,
}

impl EditResult {
    /// A backward edit, the shape every engine without a direction accessor reports.
    pub fn new<T: Into<String>>(deleted: usize, inserted: T) -> Self {
        Self {
            deleted,
            direction: DeletionDirection::Backward,
            inserted: inserted.into(),
        }
    }

    pub fn with_direction(mut self, direction: DeletionDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Number of codepoints in the inserted text.
    pub fn inserted_len(&self) -> usize {
        self.inserted.chars().count()
    }
}
