/// Control dispatch: route a session control activation to its handler.
use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::SessionError;
use crate::render::{ChoiceSpec, FormSpec, RenderInstruction};
use crate::state::SessionState;
use crate::types::{ControlId, Payload};

// ---------------------------------------------------------------------------
// Handler trait
// ---------------------------------------------------------------------------

/// What a handler asks the state machine to do next.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Render(RenderInstruction),
    Prompt(FormSpec),
    Choose(ChoiceSpec),
    /// Deliver the draft and end the session.
    Commit,
    /// End the session without delivering anything.
    Discard,
}

pub trait ControlHandler: Send + Sync {
    fn handle(
        &self,
        control: ControlId,
        state: &mut SessionState,
        payload: Payload,
    ) -> Result<Transition, SessionError>;
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

pub struct ControlDispatcher {
    handlers: HashMap<ControlId, Arc<dyn ControlHandler>>,
}

impl ControlDispatcher {
    pub fn new() -> Self {
        Self { handlers: HashMap::new() }
    }

    /// Dispatcher with a handler for every control of the panel.
    pub fn with_builtin_handlers() -> Self {
        let mut dispatcher = Self::new();
        crate::handlers::register_builtin(&mut dispatcher);
        dispatcher
    }

    pub fn register(&mut self, control: ControlId, handler: Arc<dyn ControlHandler>) {
        self.handlers.insert(control, handler);
    }

    pub fn handles(&self, control: ControlId) -> bool {
        self.handlers.contains_key(&control)
    }

    pub fn dispatch(
        &self,
        control: ControlId,
        state: &mut SessionState,
        payload: Payload,
    ) -> Result<Transition, SessionError> {
        let handler = self
            .handlers
            .get(&control)
            .ok_or(SessionError::Unhandled { control })?;
        debug!("[Session] Dispatching {} ({:?})", control, payload_kind(&payload));
        handler.handle(control, state, payload)
    }
}

impl Default for ControlDispatcher {
    fn default() -> Self { Self::new() }
}

fn payload_kind(payload: &Payload) -> &'static str {
    match payload {
        Payload::Press => "press",
        Payload::Form(_) => "form",
        Payload::Selection(_) => "selection",
    }
}
