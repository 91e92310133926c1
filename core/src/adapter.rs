//! Typed, fallible calls over the engine's flat ABI.
//!
//! Each adapter method is one exchange with the engine: it either completes and
//! returns owned data, or fails with a typed error. There are no retries and no
//! partial results. Text the engine reports is copied out of its memory before
//! the next engine call is made.

use crate::abi::{EngineAbi, Export};
use crate::config::Config;
use crate::edit::{DeletionDirection, EditResult};
use crate::error::{Error, Result};
use crate::marshal;
use tracing::debug;

pub struct EngineAdapter<E: EngineAbi> {
    engine: Option<E>,
    scratch_capacity: usize,
    max_candidates: Option<usize>,
}

impl<E: EngineAbi> EngineAdapter<E> {
    /// Create an adapter with no engine attached yet.
    pub fn new(config: &Config) -> Self {
        Self {
            engine: None,
            scratch_capacity: config.scratch_capacity,
            max_candidates: config.max_candidates,
        }
    }

    /// Attach a freshly instantiated engine and run its one-time setup.
    ///
    /// Calling this twice in a session is a programming error.
    pub fn initialize(&mut self, mut engine: E) -> Result<()> {
        if self.engine.is_some() {
            return Err(Error::AlreadyInitialized);
        }
        engine.init();
        debug!(exports = engine.exports().len(), "engine initialized");
        self.engine = Some(engine);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.engine.is_some()
    }

    /// Borrow the attached engine.
    pub fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }

    pub fn engine_mut(&mut self) -> Option<&mut E> {
        self.engine.as_mut()
    }

    fn ready(&mut self) -> Result<&mut E> {
        self.engine.as_mut().ok_or(Error::EngineNotReady)
    }

    /// Feed a raw keystroke payload to the engine.
    pub fn insert(&mut self, text: &str) -> Result<EditResult> {
        let capacity = self.scratch_capacity;
        let engine = self.ready()?;

        let offset = engine.input_buffer_pointer();
        let len = marshal::write_text(engine.memory_mut(), offset, capacity, text)?;
        engine.insert(len);

        let result = read_edit_result(engine)?;
        debug!(input = text, ?result, "engine insert");
        Ok(result)
    }

    pub fn delete_back(&mut self) -> Result<()> {
        self.ready()?.delete_back();
        debug!("engine delete back");
        Ok(())
    }

    pub fn delete_forward(&mut self) -> Result<()> {
        self.ready()?.delete_forward();
        debug!("engine delete forward");
        Ok(())
    }

    /// Move the engine cursor by a signed number of codepoints.
    ///
    /// The engine only has unsigned forward/backward moves, so the sign picks
    /// the primitive and the magnitude becomes its count. Zero makes no call,
    /// and a magnitude the engine cannot take makes none either.
    pub fn move_cursor(&mut self, delta: isize) -> Result<()> {
        let engine = self.ready()?;
        let magnitude = u32::try_from(delta.unsigned_abs())
            .map_err(|_| Error::CursorMoveOutOfRange { delta })?;
        if delta > 0 {
            engine.move_cursor_forward(magnitude);
        } else if delta < 0 {
            engine.move_cursor_back(magnitude);
        }
        debug!(delta, "engine move cursor");
        Ok(())
    }

    /// Candidates for the pending composition; empty when nothing is pending.
    pub fn list_matches(&mut self) -> Result<Vec<String>> {
        let limit = self.max_candidates;
        let engine = self.ready()?;

        let mut count = engine.match_count() as usize;
        if let Some(limit) = limit {
            count = count.min(limit);
        }

        let mut matches = Vec::with_capacity(count);
        for index in 0..count as u32 {
            let len = engine.match_text_length(index) as usize;
            let pointer = engine.match_text_pointer(index);
            matches.push(marshal::read_text(engine.memory(), pointer, len)?);
        }
        debug!(count = matches.len(), "engine matches");
        Ok(matches)
    }

    /// Commit the engine's selected candidate.
    pub fn apply_match(&mut self) -> Result<EditResult> {
        let engine = self.ready()?;
        engine.apply_match();
        let result = read_edit_result(engine)?;
        debug!(?result, "engine apply match");
        Ok(result)
    }

    /// Exported symbols of the attached engine.
    pub fn exports(&self) -> Result<Vec<Export>> {
        self.engine
            .as_ref()
            .map(EngineAbi::exports)
            .ok_or(Error::EngineNotReady)
    }
}

fn read_edit_result<E: EngineAbi>(engine: &mut E) -> Result<EditResult> {
    let deleted = engine.deleted_codepoints() as usize;
    let direction = engine
        .deletion_direction()
        .map(DeletionDirection::from_code)
        .unwrap_or_default();
    let len = engine.inserted_text_length() as usize;
    let pointer = engine.inserted_text_pointer();
    let inserted = marshal::read_text(engine.memory(), pointer, len)?;
    Ok(EditResult {
        deleted,
        direction,
        inserted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{EngineCall, ScriptedEngine};
    use pretty_assertions::assert_eq;

    fn adapter() -> EngineAdapter<ScriptedEngine> {
        let mut adapter = EngineAdapter::new(&Config::default());
        adapter.initialize(ScriptedEngine::new()).unwrap();
        adapter
    }

    #[test]
    fn calls_before_initialize_are_rejected() {
        let mut adapter: EngineAdapter<ScriptedEngine> = EngineAdapter::new(&Config::default());
        assert!(matches!(adapter.insert("k"), Err(Error::EngineNotReady)));
        assert!(matches!(adapter.delete_back(), Err(Error::EngineNotReady)));
        assert!(matches!(adapter.move_cursor(1), Err(Error::EngineNotReady)));
        assert!(matches!(adapter.list_matches(), Err(Error::EngineNotReady)));
        assert!(matches!(adapter.apply_match(), Err(Error::EngineNotReady)));
        assert!(matches!(adapter.exports(), Err(Error::EngineNotReady)));
    }

    #[test]
    fn second_initialize_is_an_error() {
        let mut adapter = adapter();
        assert!(matches!(
            adapter.initialize(ScriptedEngine::new()),
            Err(Error::AlreadyInitialized)
        ));
        assert_eq!(adapter.engine().unwrap().init_calls(), 1);
    }

    #[test]
    fn insert_stages_input_and_reads_result() {
        let mut adapter = adapter();
        adapter
            .engine_mut()
            .unwrap()
            .script_insert(EditResult::new(0, "k"));
        let result = adapter.insert("k").unwrap();
        assert_eq!(result, EditResult::new(0, "k"));

        let engine = adapter.engine().unwrap();
        assert_eq!(engine.received(), ["k"]);
        assert_eq!(engine.calls().last(), Some(&EngineCall::Insert(1)));
    }

    #[test]
    fn insert_reads_explicit_direction() {
        let mut adapter = adapter();
        let engine = adapter.engine_mut().unwrap();
        engine.script_insert(EditResult::new(0, "ab"));
        adapter.insert("ab").unwrap();
        adapter.move_cursor(-2).unwrap();

        let engine = adapter.engine_mut().unwrap();
        engine.report_direction(true);
        engine.script_insert(EditResult::new(1, "x").with_direction(DeletionDirection::Forward));
        let result = adapter.insert("x").unwrap();
        assert_eq!(result.direction, DeletionDirection::Forward);
        assert_eq!(adapter.engine().unwrap().text(), "xb");
    }

    #[test]
    fn oversized_input_never_reaches_engine() {
        let mut adapter = EngineAdapter::new(&Config {
            scratch_capacity: 4,
            ..Config::default()
        });
        adapter.initialize(ScriptedEngine::new()).unwrap();
        assert!(matches!(
            adapter.insert("abcd"),
            Err(Error::BufferOverrun { needed: 5, capacity: 4 })
        ));
        assert!(adapter.engine().unwrap().received().is_empty());
    }

    #[test]
    fn move_cursor_maps_sign_to_primitive() {
        let mut adapter = adapter();
        adapter.move_cursor(3).unwrap();
        adapter.move_cursor(-2).unwrap();
        adapter.move_cursor(0).unwrap();
        assert_eq!(
            adapter.engine().unwrap().calls(),
            [EngineCall::Init, EngineCall::MoveForward(3), EngineCall::MoveBack(2)]
        );
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn move_past_u32_range_is_rejected_without_engine_call() {
        let mut adapter = adapter();
        let delta = -(u32::MAX as isize) - 1;
        assert!(matches!(
            adapter.move_cursor(delta),
            Err(Error::CursorMoveOutOfRange { delta: d }) if d == delta
        ));
        assert!(matches!(
            adapter.move_cursor(isize::MAX),
            Err(Error::CursorMoveOutOfRange { .. })
        ));
        assert_eq!(adapter.engine().unwrap().calls(), [EngineCall::Init]);
    }

    #[test]
    fn list_matches_decodes_each_candidate() {
        let mut adapter = adapter();
        adapter
            .engine_mut()
            .unwrap()
            .set_matches(["漢字", "感じ", "かんじ"]);
        assert_eq!(adapter.list_matches().unwrap(), ["漢字", "感じ", "かんじ"]);
    }

    #[test]
    fn list_matches_respects_limit() {
        let mut adapter = EngineAdapter::new(&Config {
            max_candidates: Some(2),
            ..Config::default()
        });
        adapter.initialize(ScriptedEngine::new()).unwrap();
        adapter
            .engine_mut()
            .unwrap()
            .set_matches(["漢字", "感じ", "かんじ"]);
        assert_eq!(adapter.list_matches().unwrap(), ["漢字", "感じ"]);
    }

    #[test]
    fn empty_composition_has_no_matches() {
        let mut adapter = adapter();
        assert!(adapter.list_matches().unwrap().is_empty());
    }

    #[test]
    fn corrupt_inserted_text_is_decode_error() {
        let mut adapter = adapter();
        let engine = adapter.engine_mut().unwrap();
        engine.script_insert(EditResult::new(0, "k"));
        engine.corrupt_next_result();
        assert!(matches!(adapter.insert("k"), Err(Error::Decode(_))));
    }
}
