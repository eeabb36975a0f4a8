/// Built-in control handlers.
///
/// Each handler is a concrete struct implementing `ControlHandler`. Handlers
/// only ever replace `state.draft` with a fully validated successor, so a
/// rejected activation leaves the draft as it was.
use std::sync::Arc;

use chrono::Utc;
use embedtool_core::draft::AUTHOR_NAME_LIMIT;
use embedtool_core::{EmbedError, ValidationError};
use tracing::debug;

use crate::dispatch::{ControlDispatcher, ControlHandler, Transition};
use crate::error::SessionError;
use crate::forms::{FieldPicker, FormKind, SubForm};
use crate::state::SessionState;
use crate::types::{ControlId, Payload};

pub fn register_builtin(dispatcher: &mut ControlDispatcher) {
    let form: Arc<dyn ControlHandler> = Arc::new(FormHandler);
    for control in [
        ControlId::Title,
        ControlId::Description,
        ControlId::Color,
        ControlId::Thumbnail,
        ControlId::Image,
        ControlId::FooterImage,
        ControlId::FooterText,
        ControlId::AddField,
    ] {
        dispatcher.register(control, form.clone());
    }
    let picker: Arc<dyn ControlHandler> = Arc::new(FieldPickerHandler);
    dispatcher.register(ControlId::RemoveField, picker.clone());
    dispatcher.register(ControlId::EditField, picker);
    dispatcher.register(ControlId::ToggleAuthor, Arc::new(ToggleAuthorHandler));
    dispatcher.register(ControlId::ToggleTimestamp, Arc::new(ToggleTimestampHandler));
    dispatcher.register(ControlId::ToggleTutorial, Arc::new(ToggleTutorialHandler));
    dispatcher.register(ControlId::Send, Arc::new(SendHandler));
    dispatcher.register(ControlId::Cancel, Arc::new(CancelHandler));
}

fn press_only(control: ControlId, payload: &Payload) -> Result<(), SessionError> {
    match payload {
        Payload::Press => Ok(()),
        _ => Err(SessionError::UnexpectedPayload { control }),
    }
}

// ---------------------------------------------------------------------------
// Facet forms and Add Field
// ---------------------------------------------------------------------------

pub struct FormHandler;

impl ControlHandler for FormHandler {
    fn handle(&self, control: ControlId, state: &mut SessionState, payload: Payload) -> Result<Transition, SessionError> {
        let kind = FormKind::for_control(control).ok_or(SessionError::Unhandled { control })?;
        match payload {
            Payload::Press => {
                let (form, spec) = SubForm::open(kind, &state.draft, state.flags.tutorial_visible)?;
                state.open_form = Some(form);
                Ok(Transition::Prompt(spec))
            }
            Payload::Form(values) => {
                // A submission without a matching open form echoes the current tutorial state.
                let form = match state.open_form {
                    Some(form) if form.kind() == kind => form,
                    _ => SubForm::open(kind, &state.draft, state.flags.tutorial_visible)?.0,
                };
                let (next, render) = form.submit(&state.draft, &values, state.frame())?;
                state.draft = next;
                state.open_form = None;
                Ok(Transition::Render(render))
            }
            Payload::Selection(_) => Err(SessionError::UnexpectedPayload { control }),
        }
    }
}

// ---------------------------------------------------------------------------
// Remove Field / Edit Field
// ---------------------------------------------------------------------------

pub struct FieldPickerHandler;

impl ControlHandler for FieldPickerHandler {
    fn handle(&self, control: ControlId, state: &mut SessionState, payload: Payload) -> Result<Transition, SessionError> {
        match payload {
            Payload::Press => {
                let (picker, spec) = FieldPicker::open(control, &state.draft, state.flags.tutorial_visible)?;
                state.open_picker = Some(picker);
                Ok(Transition::Choose(spec))
            }
            Payload::Selection(index) => {
                let picker = match state.open_picker {
                    Some(picker) if picker.control() == control => picker,
                    _ => FieldPicker::open(control, &state.draft, state.flags.tutorial_visible)?.0,
                };
                if control == ControlId::RemoveField {
                    let (next, render) = picker.remove(&state.draft, index, state.frame())?;
                    state.draft = next;
                    state.open_picker = None;
                    Ok(Transition::Render(render))
                } else {
                    let (form, spec) = picker.edit(&state.draft, index)?;
                    state.open_picker = None;
                    state.open_form = Some(form);
                    Ok(Transition::Prompt(spec))
                }
            }
            Payload::Form(values) if control == ControlId::EditField => {
                let form = state
                    .open_form
                    .filter(|f| matches!(f.kind(), FormKind::EditField { .. }))
                    .ok_or(SessionError::UnexpectedPayload { control })?;
                let (next, render) = form.submit(&state.draft, &values, state.frame())?;
                state.draft = next;
                state.open_form = None;
                Ok(Transition::Render(render))
            }
            Payload::Form(_) => Err(SessionError::UnexpectedPayload { control }),
        }
    }
}

// ---------------------------------------------------------------------------
// Toggles
// ---------------------------------------------------------------------------

pub struct ToggleAuthorHandler;

impl ControlHandler for ToggleAuthorHandler {
    fn handle(&self, control: ControlId, state: &mut SessionState, payload: Payload) -> Result<Transition, SessionError> {
        press_only(control, &payload)?;
        let mut next = state.draft.clone();
        if state.flags.author_visible {
            next.author_name = None;
            next.author_icon_url = None;
        } else {
            let name = &state.invoker.display_name;
            let len = name.chars().count();
            if len > AUTHOR_NAME_LIMIT {
                let err = ValidationError::TextTooLong { facet: "author name", len, limit: AUTHOR_NAME_LIMIT };
                return Err(EmbedError::from(err).into());
            }
            next.author_name = Some(name.clone());
            next.author_icon_url = state.invoker.avatar_url.clone();
            next.check_limits().map_err(EmbedError::from)?;
        }
        state.draft = next;
        state.flags.author_visible = !state.flags.author_visible;
        debug!("[Session] Author now {}", if state.flags.author_visible { "shown" } else { "hidden" });
        Ok(Transition::Render(state.render()))
    }
}

pub struct ToggleTimestampHandler;

impl ControlHandler for ToggleTimestampHandler {
    fn handle(&self, control: ControlId, state: &mut SessionState, payload: Payload) -> Result<Transition, SessionError> {
        press_only(control, &payload)?;
        state.flags.timestamp_visible = !state.flags.timestamp_visible;
        state.draft.timestamp = state.flags.timestamp_visible.then(Utc::now);
        Ok(Transition::Render(state.render()))
    }
}

pub struct ToggleTutorialHandler;

impl ControlHandler for ToggleTutorialHandler {
    fn handle(&self, control: ControlId, state: &mut SessionState, payload: Payload) -> Result<Transition, SessionError> {
        press_only(control, &payload)?;
        state.flags.tutorial_visible = !state.flags.tutorial_visible;
        Ok(Transition::Render(state.render()))
    }
}

// ---------------------------------------------------------------------------
// Send / Cancel
// ---------------------------------------------------------------------------

pub struct SendHandler;

impl ControlHandler for SendHandler {
    fn handle(&self, control: ControlId, _state: &mut SessionState, payload: Payload) -> Result<Transition, SessionError> {
        press_only(control, &payload)?;
        Ok(Transition::Commit)
    }
}

pub struct CancelHandler;

impl ControlHandler for CancelHandler {
    fn handle(&self, control: ControlId, state: &mut SessionState, payload: Payload) -> Result<Transition, SessionError> {
        press_only(control, &payload)?;
        if state.flags.cancel_armed {
            return Ok(Transition::Discard);
        }
        state.flags.cancel_armed = true;
        Ok(Transition::Render(state.render()))
    }
}
