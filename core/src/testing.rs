//! In-memory engine for tests.
//!
//! `ScriptedEngine` implements the flat ABI over a real byte vector, so every
//! exchange goes through the marshaller exactly as it would with a loaded
//! module. It does no conversion of its own: each `insert` / `apply_match`
//! pops the next scripted [`EditResult`] (an unscripted insert echoes its
//! input). It keeps its own text and cursor, applied from the same results, so
//! tests can check that host and engine never drift apart.

use crate::abi::{EngineAbi, Export, ExportKind};
use crate::edit::{DeletionDirection, EditResult};
use std::collections::VecDeque;

/// Initial size of the engine's linear memory.
pub const MEMORY_SIZE: usize = 4096;
/// Default offset of the input scratch area.
pub const INPUT_BUFFER: u32 = 64;
/// Offset the inserted text of the last result is written at.
pub const RESULT_AREA: u32 = 1024;
/// Offset candidate texts are laid out from.
pub const MATCH_AREA: u32 = 2048;

/// A mutating or moving call the engine received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineCall {
    Init,
    Insert(u32),
    DeleteBack,
    DeleteForward,
    MoveBack(u32),
    MoveForward(u32),
    ApplyMatch,
}

#[derive(Debug, Clone)]
struct Step {
    result: EditResult,
    matches: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default)]
struct LastResult {
    deleted: u32,
    direction: DeletionDirection,
    pointer: u32,
    len: u32,
}

#[derive(Debug, Clone)]
pub struct ScriptedEngine {
    memory: Vec<u8>,
    input_buffer: u32,
    text: Vec<char>,
    cursor: usize,
    inserts: VecDeque<Step>,
    applies: VecDeque<EditResult>,
    matches: Vec<(u32, u32)>,
    last: LastResult,
    report_direction: bool,
    corrupt_next: bool,
    calls: Vec<EngineCall>,
    received: Vec<String>,
}

impl Default for ScriptedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self {
            memory: vec![0; MEMORY_SIZE],
            input_buffer: INPUT_BUFFER,
            text: Vec::new(),
            cursor: 0,
            inserts: VecDeque::new(),
            applies: VecDeque::new(),
            matches: Vec::new(),
            last: LastResult::default(),
            report_direction: false,
            corrupt_next: false,
            calls: Vec::new(),
            received: Vec::new(),
        }
    }

    /// Queue the result of the next unscripted `insert`.
    pub fn script_insert(&mut self, result: EditResult) -> &mut Self {
        self.inserts.push_back(Step {
            result,
            matches: None,
        });
        self
    }

    /// Queue an `insert` result that also replaces the candidate list.
    pub fn script_insert_with_matches<I, S>(&mut self, result: EditResult, matches: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inserts.push_back(Step {
            result,
            matches: Some(matches.into_iter().map(Into::into).collect()),
        });
        self
    }

    /// Queue the result of the next `apply_match`.
    pub fn script_apply(&mut self, result: EditResult) -> &mut Self {
        self.applies.push_back(result);
        self
    }

    /// Replace the pending candidates, laying them out in memory.
    pub fn set_matches<I, S>(&mut self, matches: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let matches: Vec<String> = matches.into_iter().map(Into::into).collect();
        self.layout_matches(&matches);
        self
    }

    /// Export `getDeletionDirection` from now on.
    pub fn report_direction(&mut self, enabled: bool) -> &mut Self {
        self.report_direction = enabled;
        self
    }

    /// Make the next result's inserted text invalid UTF-8.
    pub fn corrupt_next_result(&mut self) -> &mut Self {
        self.corrupt_next = true;
        self
    }

    /// Point candidate `index` past the end of memory.
    pub fn break_match(&mut self, index: usize) -> &mut Self {
        if let Some(entry) = self.matches.get_mut(index) {
            entry.0 = self.memory.len() as u32;
        }
        self
    }

    /// Grow linear memory, as a module does when it allocates.
    pub fn grow_memory(&mut self, additional: usize) -> &mut Self {
        let len = self.memory.len();
        self.memory.resize(len + additional, 0);
        self
    }

    /// Move the scratch area.
    pub fn relocate_input_buffer(&mut self, offset: u32) -> &mut Self {
        self.input_buffer = offset;
        self
    }

    pub fn text(&self) -> String {
        self.text.iter().collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn calls(&self) -> &[EngineCall] {
        &self.calls
    }

    /// Decoded input payloads, in order.
    pub fn received(&self) -> &[String] {
        &self.received
    }

    pub fn init_calls(&self) -> usize {
        self.calls.iter().filter(|c| **c == EngineCall::Init).count()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    fn write(&mut self, offset: u32, bytes: &[u8]) {
        let start = offset as usize;
        let end = start + bytes.len();
        if end > self.memory.len() {
            self.memory.resize(end, 0);
        }
        self.memory[start..end].copy_from_slice(bytes);
    }

    fn layout_matches(&mut self, matches: &[String]) {
        self.matches.clear();
        let mut offset = MATCH_AREA;
        for text in matches {
            let bytes = text.as_bytes().to_vec();
            self.write(offset, &bytes);
            self.matches.push((offset, bytes.len() as u32));
            offset += bytes.len() as u32;
        }
    }

    fn apply(&mut self, result: &EditResult) {
        let deleted = result.deleted;
        match result.direction {
            DeletionDirection::Backward => {
                let start = self.cursor.saturating_sub(deleted);
                self.text.drain(start..self.cursor);
                self.cursor = start;
            }
            DeletionDirection::Forward => {
                let end = (self.cursor + deleted).min(self.text.len());
                self.text.drain(self.cursor..end);
            }
        }
        for ch in result.inserted.chars() {
            self.text.insert(self.cursor, ch);
            self.cursor += 1;
        }

        let bytes = if std::mem::take(&mut self.corrupt_next) {
            vec![0xff; result.inserted.len().max(1)]
        } else {
            result.inserted.as_bytes().to_vec()
        };
        self.write(RESULT_AREA, &bytes);
        self.last = LastResult {
            deleted: deleted as u32,
            direction: result.direction,
            pointer: RESULT_AREA,
            len: bytes.len() as u32,
        };
    }
}

impl EngineAbi for ScriptedEngine {
    fn init(&mut self) {
        self.calls.push(EngineCall::Init);
    }

    fn input_buffer_pointer(&mut self) -> u32 {
        self.input_buffer
    }

    fn insert(&mut self, len: u32) {
        self.calls.push(EngineCall::Insert(len));
        let start = self.input_buffer as usize;
        let input = self
            .memory
            .get(start..start + len as usize)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .unwrap_or_default();

        let step = self.inserts.pop_front().unwrap_or_else(|| Step {
            result: EditResult::new(0, input.clone()),
            matches: None,
        });
        self.received.push(input);
        self.apply(&step.result);
        if let Some(matches) = step.matches {
            self.layout_matches(&matches);
        }
    }

    fn deleted_codepoints(&mut self) -> u32 {
        self.last.deleted
    }

    fn deletion_direction(&mut self) -> Option<u32> {
        if !self.report_direction {
            return None;
        }
        Some(match (self.last.deleted, self.last.direction) {
            (0, _) => 0,
            (_, DeletionDirection::Forward) => 1,
            (_, DeletionDirection::Backward) => 2,
        })
    }

    fn inserted_text_length(&mut self) -> u32 {
        self.last.len
    }

    fn inserted_text_pointer(&mut self) -> u32 {
        self.last.pointer
    }

    fn delete_back(&mut self) {
        self.calls.push(EngineCall::DeleteBack);
        if self.cursor > 0 {
            self.cursor -= 1;
            self.text.remove(self.cursor);
        }
    }

    fn delete_forward(&mut self) {
        self.calls.push(EngineCall::DeleteForward);
        if self.cursor < self.text.len() {
            self.text.remove(self.cursor);
        }
    }

    fn move_cursor_back(&mut self, n: u32) {
        self.calls.push(EngineCall::MoveBack(n));
        self.cursor = self.cursor.saturating_sub(n as usize);
    }

    fn move_cursor_forward(&mut self, n: u32) {
        self.calls.push(EngineCall::MoveForward(n));
        self.cursor = (self.cursor + n as usize).min(self.text.len());
    }

    fn match_count(&mut self) -> u32 {
        self.matches.len() as u32
    }

    fn match_text_pointer(&mut self, index: u32) -> u32 {
        self.matches.get(index as usize).map_or(0, |m| m.0)
    }

    fn match_text_length(&mut self, index: u32) -> u32 {
        self.matches.get(index as usize).map_or(0, |m| m.1)
    }

    fn apply_match(&mut self) {
        self.calls.push(EngineCall::ApplyMatch);
        let result = self.applies.pop_front().unwrap_or_default();
        self.apply(&result);
        self.matches.clear();
    }

    fn memory(&self) -> &[u8] {
        &self.memory
    }

    fn memory_mut(&mut self) -> &mut [u8] {
        &mut self.memory
    }

    fn exports(&self) -> Vec<Export> {
        let mut exports: Vec<Export> = [
            "init",
            "getInputBufferPointer",
            "insert",
            "getDeletedCodepoints",
            "getInsertedTextLength",
            "getInsertedTextPointer",
            "deleteBack",
            "deleteForward",
            "moveCursorBack",
            "moveCursorForward",
            "getMatchCount",
            "getMatchText",
            "getMatchTextLength",
            "applyMatch",
        ]
        .into_iter()
        .map(|name| Export::new(name, ExportKind::Function))
        .collect();
        if self.report_direction {
            exports.push(Export::new("getDeletionDirection", ExportKind::Function));
        }
        exports.push(Export::new("memory", ExportKind::Memory));
        exports
    }
}
