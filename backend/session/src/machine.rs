//! The per-session state machine: `Active` until a commit, a confirmed cancel
//! or the idle timeout ends it.

use std::sync::Arc;

use embedtool_core::{EmbedDraft, SessionMode, TutorialOverlay, UserIdentity};
use tracing::debug;

use crate::controls::ControlRegistry;
use crate::dispatch::{ControlDispatcher, Transition};
use crate::error::SessionError;
use crate::render::{Rejection, RenderInstruction, Reply};
use crate::state::{SessionFlags, SessionState};
use crate::types::{ControlActivation, SessionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Active,
    Terminated,
    Expired,
}

/// Shared, session-independent pieces every session is built with.
#[derive(Clone)]
pub struct SessionContext {
    pub overlay: Arc<TutorialOverlay>,
    pub controls: Arc<ControlRegistry>,
    pub dispatcher: Arc<ControlDispatcher>,
}

impl SessionContext {
    pub fn new(overlay: TutorialOverlay) -> Self {
        Self {
            overlay: Arc::new(overlay),
            controls: Arc::new(ControlRegistry::new()),
            dispatcher: Arc::new(ControlDispatcher::with_builtin_handlers()),
        }
    }
}

/// The draft to deliver once the session has terminated.
#[derive(Debug, Clone, PartialEq)]
pub struct Commit {
    pub mode: SessionMode,
    pub draft: EmbedDraft,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Reply(Reply),
    Commit(Commit),
}

pub struct Session {
    id: SessionId,
    mode: SessionMode,
    state: SessionState,
    status: SessionStatus,
    dispatcher: Arc<ControlDispatcher>,
}

impl Session {
    pub fn new(id: SessionId, mode: SessionMode, draft: EmbedDraft, invoker: UserIdentity, ctx: &SessionContext) -> Self {
        Self {
            id,
            mode,
            state: SessionState::new(draft, invoker, ctx.overlay.clone(), ctx.controls.clone()),
            status: SessionStatus::Active,
            dispatcher: ctx.dispatcher.clone(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn mode(&self) -> &SessionMode {
        &self.mode
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn draft(&self) -> &EmbedDraft {
        &self.state.draft
    }

    pub fn flags(&self) -> SessionFlags {
        self.state.flags
    }

    pub fn render(&self) -> RenderInstruction {
        self.state.render()
    }

    /// Mark an active session as timed out. Returns `false` if it had already ended.
    pub fn expire(&mut self) -> bool {
        if self.status != SessionStatus::Active {
            return false;
        }
        self.status = SessionStatus::Expired;
        true
    }

    pub fn handle_control_activation(&mut self, activation: ControlActivation) -> Result<Step, SessionError> {
        match self.status {
            SessionStatus::Active => {}
            SessionStatus::Terminated => return Err(SessionError::Terminated),
            SessionStatus::Expired => return Err(SessionError::Expired),
        }
        if let Some(actor) = activation.actor {
            self.state.invoker = actor;
        }

        let control = activation.control;
        match self.dispatcher.dispatch(control, &mut self.state, activation.payload) {
            Ok(Transition::Render(render)) => Ok(Step::Reply(Reply::Render(render))),
            Ok(Transition::Prompt(form)) => Ok(Step::Reply(Reply::Prompt(form))),
            Ok(Transition::Choose(choice)) => Ok(Step::Reply(Reply::Choose(choice))),
            Ok(Transition::Commit) => {
                self.status = SessionStatus::Terminated;
                debug!("[Session] {} committed ({})", self.id, self.mode);
                Ok(Step::Commit(Commit {
                    mode: self.mode,
                    draft: self.state.draft.clone(),
                }))
            }
            Ok(Transition::Discard) => {
                self.status = SessionStatus::Terminated;
                debug!("[Session] {} discarded", self.id);
                Ok(Step::Reply(Reply::Discarded))
            }
            Err(SessionError::Embed(err)) => {
                debug!("[Session] {} rejected {}: {}", self.id, control, err);
                Ok(Step::Reply(Reply::Rejected(Rejection::from(err))))
            }
            Err(err) => Err(err),
        }
    }
}
