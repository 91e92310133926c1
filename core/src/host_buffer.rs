//! Host-visible text buffer with a codepoint cursor.
//!
//! This is the text the user sees. The cursor is counted in codepoints (not
//! bytes), the same unit the engine uses for its own cursor and for the
//! deletion counts it reports.

use crate::edit::{DeletionDirection, EditResult};
use crate::error::{Error, Result};

/// Host buffer tracking text and cursor position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HostBuffer {
    text: String,
    cursor: usize, // Codepoint offset, not byte offset
}

impl HostBuffer {
    /// Create a new empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the cursor position (codepoint offset).
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Get the length of the buffer in codepoints.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Byte offset of codepoint `index`, or the end of the text.
    fn byte_offset(&self, index: usize) -> usize {
        self.text
            .char_indices()
            .nth(index)
            .map_or(self.text.len(), |(offset, _)| offset)
    }

    /// Apply an engine edit: delete, then insert at the shifted cursor.
    ///
    /// Backward deletions remove the codepoints immediately before the cursor
    /// and move the cursor back over them. Forward deletions remove codepoints
    /// starting at the cursor. The inserted text then goes in at the cursor,
    /// which ends up just after it. The deletion is checked against the buffer
    /// first; a result that does not fit leaves the buffer untouched.
    pub fn apply_edit(&mut self, edit: &EditResult) -> Result<()> {
        let len = self.len();
        let mut pos = self.cursor;

        let deletion = match edit.direction {
            DeletionDirection::Backward => pos.checked_sub(edit.deleted).map(|start| start..pos),
            DeletionDirection::Forward => Some(pos..pos + edit.deleted).filter(|r| r.end <= len),
        };
        let Some(deletion) = deletion else {
            return Err(Error::EditOutOfRange {
                deleted: edit.deleted,
                direction: edit.direction,
                cursor: pos,
                len,
            });
        };

        if !deletion.is_empty() {
            let start = self.byte_offset(deletion.start);
            let end = self.byte_offset(deletion.end);
            self.text.replace_range(start..end, "");
            pos = deletion.start;
        }

        let at = self.byte_offset(pos);
        self.text.insert_str(at, &edit.inserted);
        self.cursor = pos + edit.inserted_len();
        Ok(())
    }

    /// Delete the codepoint before the cursor (backspace).
    /// Returns true if a codepoint was deleted.
    pub fn delete_before(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let at = self.byte_offset(self.cursor - 1);
        self.text.remove(at);
        self.cursor -= 1;
        true
    }

    /// Delete the codepoint at the cursor (delete key).
    /// Returns true if a codepoint was deleted.
    pub fn delete_after(&mut self) -> bool {
        if self.cursor >= self.len() {
            return false;
        }
        let at = self.byte_offset(self.cursor);
        self.text.remove(at);
        true
    }

    /// Move the cursor by `delta` codepoints, clamped to the buffer.
    /// Returns the distance actually moved.
    pub fn move_by(&mut self, delta: isize) -> isize {
        let target = self
            .cursor
            .saturating_add_signed(delta)
            .min(self.len());
        let moved = target as isize - self.cursor as isize;
        self.cursor = target;
        moved
    }

    /// Set the cursor position (must be within the buffer).
    pub fn set_cursor(&mut self, pos: usize) -> bool {
        if pos <= self.len() {
            self.cursor = pos;
            true
        } else {
            false
        }
    }
}
