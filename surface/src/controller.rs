//! Input surface controller.
//!
//! `InputSurface` sits between the UI toolkit and the edit bridge. It turns raw
//! UI events (keys, text insertion, clicks) into bridge calls and owns no
//! conversion state of its own. While the engine is loading or unavailable it
//! ignores input, so the UI should disable the field (see
//! [`InputSurface::disabled`]). Operation errors go to the registered error
//! handler; the visible text is never corrupted by a failed operation.

use crate::config::SurfaceConfig;
use crate::snapshot::{SurfaceSnapshot, SurfaceStatus};
use jaime_core::{BridgeState, Direction, EditBridge, EngineAbi, EngineLoader, Error};
use tracing::{debug, error, warn};

/// Key event types the surface can process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyEvent {
    /// Character input
    Char(char),
    /// Text insertion event (e.g. `beforeinput` with `insertText`)
    Text(String),
    /// Backspace key
    Backspace,
    /// Delete key
    Delete,
    /// Left arrow key
    Left,
    /// Right arrow key
    Right,
    /// Enter/Return key (accept best candidate)
    Enter,
    /// Space key
    Space,
}

/// Result of processing a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResult {
    /// Key was handled by the surface
    Handled,
    /// Key was not handled (let the UI's default behavior run)
    NotHandled,
}

type ErrorHandler = Box<dyn FnMut(&Error)>;

/// Controller translating UI events into edit bridge calls.
pub struct InputSurface<E: EngineAbi> {
    /// Edit bridge owning the text, cursor and engine
    bridge: EditBridge<E>,

    config: SurfaceConfig,

    /// Last per-operation error, for display
    last_error: Option<String>,

    on_error: Option<ErrorHandler>,
}

impl<E: EngineAbi> InputSurface<E> {
    /// Create a surface in the loading state.
    pub fn new(config: SurfaceConfig) -> Self {
        Self {
            bridge: EditBridge::new(&config.base),
            config,
            last_error: None,
            on_error: None,
        }
    }

    /// Register the callback that receives operation and load errors.
    pub fn set_error_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&Error) + 'static,
    {
        self.on_error = Some(Box::new(handler));
    }

    /// Load the engine synchronously with `loader`.
    pub fn load_with<L>(&mut self, loader: &L) -> bool
    where
        L: EngineLoader<Engine = E>,
    {
        let outcome = self.bridge.load(loader);
        self.settle_load(outcome)
    }

    /// Deliver the outcome of a load performed elsewhere (e.g. by an async
    /// host). Returns whether the surface is now ready.
    pub fn finish_load(&mut self, outcome: anyhow::Result<E>) -> bool {
        let outcome = match outcome {
            Ok(engine) => self.bridge.attach(engine),
            Err(err) => Err(self.bridge.fail(err)),
        };
        self.settle_load(outcome)
    }

    fn settle_load(&mut self, outcome: jaime_core::Result<()>) -> bool {
        match outcome {
            Ok(()) => true,
            Err(err) => {
                self.report(err);
                false
            }
        }
    }

    pub fn status(&self) -> SurfaceStatus {
        match self.bridge.state() {
            BridgeState::Uninitialized => SurfaceStatus::Loading,
            BridgeState::Ready => SurfaceStatus::Ready,
            BridgeState::Unavailable(_) => SurfaceStatus::Unavailable,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status() == SurfaceStatus::Ready
    }

    /// Whether the UI should disable the input field.
    pub fn disabled(&self) -> bool {
        !self.is_ready()
    }

    pub fn text(&self) -> &str {
        self.bridge.text()
    }

    pub fn cursor(&self) -> usize {
        self.bridge.cursor()
    }

    /// All pending candidates, best first.
    pub fn candidates(&self) -> &[String] {
        self.bridge.candidates().candidates()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn bridge(&self) -> &EditBridge<E> {
        &self.bridge
    }

    pub fn bridge_mut(&mut self) -> &mut EditBridge<E> {
        &mut self.bridge
    }

    fn report(&mut self, err: Error) {
        if err.is_fatal() {
            error!(error = %err, "engine load rejected");
        } else if err.is_marshalling() {
            warn!(error = %err, "engine memory exchange failed");
        } else {
            warn!(error = %err, "input surface operation failed");
        }
        self.last_error = Some(err.to_string());
        if let Some(handler) = self.on_error.as_mut() {
            handler(&err);
        }
    }

    /// Run a bridge operation if the surface is enabled.
    fn run<T>(&mut self, op: impl FnOnce(&mut EditBridge<E>) -> jaime_core::Result<T>) -> KeyResult {
        if self.disabled() {
            return KeyResult::NotHandled;
        }
        self.last_error = None;
        if let Err(err) = op(&mut self.bridge) {
            self.report(err);
        }
        KeyResult::Handled
    }

    /// Text typed or inserted by the UI.
    pub fn on_keystroke(&mut self, text: &str) -> KeyResult {
        if text.is_empty() {
            return KeyResult::NotHandled;
        }
        debug!(text, "keystroke");
        self.run(|bridge| bridge.insert(text))
    }

    pub fn on_delete_back(&mut self) -> KeyResult {
        self.run(|bridge| bridge.delete_back())
    }

    pub fn on_delete_forward(&mut self) -> KeyResult {
        self.run(|bridge| bridge.delete_forward())
    }

    pub fn on_move_cursor(&mut self, direction: Direction) -> KeyResult {
        self.run(|bridge| bridge.move_cursor(direction))
    }

    /// The UI moved the caret itself (a click or tap).
    pub fn on_pointer_reposition(&mut self, offset: usize) -> KeyResult {
        debug!(offset, "pointer reposition");
        self.run(|bridge| bridge.reposition(offset))
    }

    /// Accept the engine's best candidate.
    ///
    /// Not handled when nothing is pending, so a UI can bind this to a key
    /// without checking state first and keep the key's default behavior.
    pub fn on_commit_candidate(&mut self) -> KeyResult {
        if self.bridge.candidates().is_empty() {
            return KeyResult::NotHandled;
        }
        self.run(|bridge| bridge.commit())
    }

    /// Process a key event.
    ///
    /// Returns `KeyResult::Handled` if the surface consumed the key, or
    /// `KeyResult::NotHandled` if the UI should apply its default behavior.
    pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult {
        if self.disabled() {
            return KeyResult::NotHandled;
        }
        let pending = !self.bridge.candidates().is_empty();

        match key {
            KeyEvent::Char(ch) => {
                let mut buf = [0u8; 4];
                self.on_keystroke(ch.encode_utf8(&mut buf))
            }
            KeyEvent::Text(text) => self.on_keystroke(&text),
            KeyEvent::Backspace => self.on_delete_back(),
            KeyEvent::Delete => self.on_delete_forward(),
            KeyEvent::Left => self.on_move_cursor(Direction::Backward),
            KeyEvent::Right => self.on_move_cursor(Direction::Forward),
            KeyEvent::Enter if self.config.commit_on_enter => self.on_commit_candidate(),
            KeyEvent::Enter => KeyResult::NotHandled,
            KeyEvent::Space if self.config.commit_on_space && pending => {
                self.on_commit_candidate()
            }
            KeyEvent::Space => self.on_keystroke(" "),
        }
    }

    /// Current state for the UI to render.
    pub fn snapshot(&self) -> SurfaceSnapshot {
        let message = match self.bridge.state() {
            BridgeState::Unavailable(message) => Some(message.clone()),
            _ => self.last_error.clone(),
        };

        SurfaceSnapshot {
            text: self.bridge.text().to_string(),
            cursor: self.bridge.cursor(),
            candidates: self.candidates().to_vec(),
            status: self.status(),
            message,
        }
    }
}
