//! Edit bridge: keeps the host buffer and the engine in lock-step.
//!
//! The engine never reports where its cursor is. The bridge mirrors it by
//! applying exactly the deltas it sends, so after every completed operation
//! the host cursor is the engine cursor. The only cursor change the bridge
//! does not originate is a pointer reposition, which it turns into a relative
//! move before adopting the new offset.

use crate::abi::{EngineAbi, EngineLoader, Export};
use crate::adapter::EngineAdapter;
use crate::candidate::CandidateList;
use crate::config::Config;
use crate::edit::EditResult;
use crate::error::{Error, Result};
use crate::host_buffer::HostBuffer;
use tracing::{debug, info, warn};

/// Lifecycle of the bridge within one editing session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BridgeState {
    /// Engine not loaded yet; edits are rejected.
    #[default]
    Uninitialized,
    /// Engine loaded and set up.
    Ready,
    /// Engine failed to load. Permanent for the session.
    Unavailable(String),
}

/// Direction of a single-step cursor move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Backward,
    Forward,
}

impl Direction {
    fn delta(self) -> isize {
        match self {
            Direction::Backward => -1,
            Direction::Forward => 1,
        }
    }
}

pub struct EditBridge<E: EngineAbi> {
    adapter: EngineAdapter<E>,
    buffer: HostBuffer,
    candidates: CandidateList,
    state: BridgeState,
}

impl<E: EngineAbi> EditBridge<E> {
    /// Create a bridge with an empty buffer and no engine.
    pub fn new(config: &Config) -> Self {
        Self {
            adapter: EngineAdapter::new(config),
            buffer: HostBuffer::new(),
            candidates: CandidateList::new(),
            state: BridgeState::Uninitialized,
        }
    }

    pub fn state(&self) -> &BridgeState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == BridgeState::Ready
    }

    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    pub fn cursor(&self) -> usize {
        self.buffer.cursor()
    }

    pub fn buffer(&self) -> &HostBuffer {
        &self.buffer
    }

    pub fn candidates(&self) -> &CandidateList {
        &self.candidates
    }

    /// The loaded engine, if any.
    pub fn engine(&self) -> Option<&E> {
        self.adapter.engine()
    }

    /// Direct engine access. Calls made through this bypass the bridge and
    /// are not mirrored into the host buffer.
    pub fn engine_mut(&mut self) -> Option<&mut E> {
        self.adapter.engine_mut()
    }

    /// Exported symbols of the loaded engine.
    pub fn exports(&self) -> Result<Vec<Export>> {
        self.adapter.exports()
    }

    /// Load the engine with `loader` and set it up.
    pub fn load<L>(&mut self, loader: &L) -> Result<()>
    where
        L: EngineLoader<Engine = E>,
    {
        match loader.load() {
            Ok(engine) => self.attach(engine),
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Set up an engine that was instantiated elsewhere.
    pub fn attach(&mut self, engine: E) -> Result<()> {
        match &self.state {
            BridgeState::Uninitialized => {}
            BridgeState::Ready => return Err(Error::AlreadyInitialized),
            BridgeState::Unavailable(message) => {
                return Err(Error::EngineLoadFailure(message.clone()))
            }
        }
        self.adapter.initialize(engine)?;
        self.state = BridgeState::Ready;
        info!("engine ready");
        Ok(())
    }

    /// Record a failed load. The bridge stays unavailable for the session.
    pub fn fail(&mut self, err: anyhow::Error) -> Error {
        let error = Error::load_failure(err);
        if self.state == BridgeState::Uninitialized {
            warn!(%error, "engine unavailable");
            self.state = BridgeState::Unavailable(error.to_string());
        }
        error
    }

    fn ensure_ready(&self) -> Result<()> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(Error::EngineNotReady)
        }
    }

    /// Replace the candidate list with the engine's current matches.
    ///
    /// On failure the list is cleared rather than left stale.
    fn refresh_candidates(&mut self) -> Result<()> {
        match self.adapter.list_matches() {
            Ok(matches) => {
                self.candidates.set_candidates(matches);
                Ok(())
            }
            Err(err) => {
                self.candidates.clear();
                Err(err)
            }
        }
    }

    /// Apply an edit the engine has already made. If the host buffer rejects
    /// it the engine's pending matches no longer correspond to anything, so
    /// the candidate list is dropped.
    fn apply_engine_edit(&mut self, result: &EditResult) -> Result<()> {
        self.buffer.apply_edit(result).inspect_err(|_| self.candidates.clear())
    }

    /// Send a keystroke payload to the engine and apply its edit.
    pub fn insert(&mut self, text: &str) -> Result<EditResult> {
        self.ensure_ready()?;
        let result = self.adapter.insert(text)?;
        self.apply_engine_edit(&result)?;
        debug!(text = self.buffer.text(), cursor = self.buffer.cursor(), "applied insert");
        self.refresh_candidates()?;
        Ok(result)
    }

    /// Backspace. Returns whether a host codepoint was removed.
    pub fn delete_back(&mut self) -> Result<bool> {
        self.ensure_ready()?;
        self.adapter.delete_back()?;
        let removed = self.buffer.delete_before();
        self.refresh_candidates()?;
        Ok(removed)
    }

    /// Forward delete. Returns whether a host codepoint was removed.
    pub fn delete_forward(&mut self) -> Result<bool> {
        self.ensure_ready()?;
        self.adapter.delete_forward()?;
        let removed = self.buffer.delete_after();
        self.refresh_candidates()?;
        Ok(removed)
    }

    /// Move one codepoint. The engine is always told to move; the host
    /// mirror clamps at the buffer edges. Candidates are not refreshed.
    pub fn move_cursor(&mut self, direction: Direction) -> Result<()> {
        self.ensure_ready()?;
        let delta = direction.delta();
        self.adapter.move_cursor(delta)?;
        self.buffer.move_by(delta);
        Ok(())
    }

    /// Adopt a cursor position set by the UI (a click), resynchronizing the
    /// engine with one relative move.
    pub fn reposition(&mut self, offset: usize) -> Result<()> {
        self.ensure_ready()?;
        let len = self.buffer.len();
        if offset > len {
            return Err(Error::CursorOutOfRange { offset, len });
        }
        let diff = offset as isize - self.buffer.cursor() as isize;
        if diff != 0 {
            self.adapter.move_cursor(diff)?;
            self.buffer.set_cursor(offset);
            debug!(offset, diff, "cursor resynchronized");
        }
        Ok(())
    }

    /// Commit the engine's best candidate.
    ///
    /// With no candidates pending this does nothing and returns `Ok(None)`.
    pub fn commit(&mut self) -> Result<Option<EditResult>> {
        self.ensure_ready()?;
        if self.candidates.is_empty() {
            return Ok(None);
        }
        let result = self.adapter.apply_match()?;
        self.candidates.clear();
        self.apply_engine_edit(&result)?;
        debug!(text = self.buffer.text(), cursor = self.buffer.cursor(), "applied commit");
        Ok(Some(result))
    }
}
