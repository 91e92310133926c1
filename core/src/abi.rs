//! The conversion engine's flat ABI.
//!
//! The engine exposes no structured API: only byte pointers into its linear
//! memory, byte lengths and counts. `EngineAbi` mirrors that export set one
//! method per export, so a WebAssembly instance (or any other host for the
//! engine) can implement it with thin forwarding calls. Everything typed lives
//! in [`crate::adapter::EngineAdapter`].
//!
//! Every method takes `&mut self`: the engine is stateful and non-reentrant,
//! and most runtimes need exclusive access to their store to make a call.

use serde::{Deserialize, Serialize};

/// Kind of an exported engine symbol, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Function,
    Memory,
    Global,
    Table,
}

/// One exported symbol of the loaded engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Export {
    pub name: String,
    pub kind: ExportKind,
}

impl Export {
    pub fn new<T: Into<String>>(name: T, kind: ExportKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Raw engine operations (`init`, `getInputBufferPointer`, `insert`, ...).
pub trait EngineAbi {
    /// One-time engine setup.
    fn init(&mut self);

    /// Offset of the scratch area the host writes input text into.
    fn input_buffer_pointer(&mut self) -> u32;

    /// Process `len` bytes of input from the scratch area.
    fn insert(&mut self, len: u32);

    /// Codepoints removed by the last `insert` / `apply_match`.
    fn deleted_codepoints(&mut self) -> u32;

    /// Direction of the last deletion: `0` none, `1` forward, otherwise backward.
    ///
    /// Engines that do not export a direction return `None`, and every
    /// deletion is then treated as backward from the pre-edit cursor.
    fn deletion_direction(&mut self) -> Option<u32> {
        None
    }

    /// Byte length of the text inserted by the last `insert` / `apply_match`.
    fn inserted_text_length(&mut self) -> u32;

    /// Offset of the text inserted by the last `insert` / `apply_match`.
    fn inserted_text_pointer(&mut self) -> u32;

    fn delete_back(&mut self);

    fn delete_forward(&mut self);

    fn move_cursor_back(&mut self, n: u32);

    fn move_cursor_forward(&mut self, n: u32);

    /// Number of candidates for the pending composition.
    fn match_count(&mut self) -> u32;

    /// Offset of candidate `index`'s text.
    fn match_text_pointer(&mut self, index: u32) -> u32;

    /// Byte length of candidate `index`'s text.
    fn match_text_length(&mut self, index: u32) -> u32;

    /// Commit the engine's currently selected candidate.
    fn apply_match(&mut self);

    /// The engine's linear memory as it is right now.
    fn memory(&self) -> &[u8];

    fn memory_mut(&mut self) -> &mut [u8];

    /// Exported symbols, for diagnostics after loading.
    fn exports(&self) -> Vec<Export> {
        Vec::new()
    }
}

impl<E: EngineAbi + ?Sized> EngineAbi for Box<E> {
    fn init(&mut self) {
        (**self).init()
    }
    fn input_buffer_pointer(&mut self) -> u32 {
        (**self).input_buffer_pointer()
    }
    fn insert(&mut self, len: u32) {
        (**self).insert(len)
    }
    fn deleted_codepoints(&mut self) -> u32 {
        (**self).deleted_codepoints()
    }
    fn deletion_direction(&mut self) -> Option<u32> {
        (**self).deletion_direction()
    }
    fn inserted_text_length(&mut self) -> u32 {
        (**self).inserted_text_length()
    }
    fn inserted_text_pointer(&mut self) -> u32 {
        (**self).inserted_text_pointer()
    }
    fn delete_back(&mut self) {
        (**self).delete_back()
    }
    fn delete_forward(&mut self) {
        (**self).delete_forward()
    }
    fn move_cursor_back(&mut self, n: u32) {
        (**self).move_cursor_back(n)
    }
    fn move_cursor_forward(&mut self, n: u32) {
        (**self).move_cursor_forward(n)
    }
    fn match_count(&mut self) -> u32 {
        (**self).match_count()
    }
    fn match_text_pointer(&mut self, index: u32) -> u32 {
        (**self).match_text_pointer(index)
    }
    fn match_text_length(&mut self, index: u32) -> u32 {
        (**self).match_text_length(index)
    }
    fn apply_match(&mut self) {
        (**self).apply_match()
    }
    fn memory(&self) -> &[u8] {
        (**self).memory()
    }
    fn memory_mut(&mut self) -> &mut [u8] {
        (**self).memory_mut()
    }
    fn exports(&self) -> Vec<Export> {
        (**self).exports()
    }
}

/// Fetches and instantiates an engine module.
///
/// This is the only step that may fail for reasons outside the bridge (I/O,
/// a corrupt module, a missing export), so its errors are opaque.
pub trait EngineLoader {
    type Engine: EngineAbi;

    fn load(&self) -> anyhow::Result<Self::Engine>;
}

impl<E, F> EngineLoader for F
where
    E: EngineAbi,
    F: Fn() -> anyhow::Result<E>,
{
    type Engine = E;

    fn load(&self) -> anyhow::Result<E> {
        self()
    }
}
