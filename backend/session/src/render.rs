/// Render instructions and replies handed back to the presentation adapter.
use embedtool_core::{EmbedDraft, EmbedError, MessageRef};
use serde::Serialize;

use crate::controls::ControlsLayout;
use crate::types::ControlId;

/// Everything the panel shows after an activation.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderInstruction {
    pub primary: EmbedDraft,
    pub tutorial: Option<EmbedDraft>,
    pub controls: ControlsLayout,
}

impl RenderInstruction {
    pub fn embeds(&self) -> Vec<&EmbedDraft> {
        std::iter::once(&self.primary).chain(self.tutorial.as_ref()).collect()
    }
}

// ---------------------------------------------------------------------------
// Forms
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputStyle {
    Short,
    Paragraph,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormInput {
    pub id: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub style: InputStyle,
    pub max_length: u16,
    pub required: bool,
    /// Pre-filled value.
    pub value: Option<String>,
}

/// A modal form the adapter must show; submitting it comes back as
/// `Payload::Form` on `control`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSpec {
    pub control: ControlId,
    pub title: &'static str,
    pub inputs: Vec<FormInput>,
}

// ---------------------------------------------------------------------------
// Choices
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    pub label: String,
    pub description: String,
    pub index: usize,
}

/// A one-of choice over the draft's fields; picking comes back as
/// `Payload::Selection` on `control`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceSpec {
    pub control: ControlId,
    pub title: &'static str,
    pub description: &'static str,
    pub placeholder: &'static str,
    pub options: Vec<ChoiceOption>,
}

// ---------------------------------------------------------------------------
// Replies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub heading: &'static str,
    pub message: String,
    pub error: EmbedError,
}

impl From<EmbedError> for Rejection {
    fn from(error: EmbedError) -> Self {
        Self {
            heading: error.heading(),
            message: capitalize(&error.to_string()),
            error,
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Outcome of a committed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminationResult {
    pub message: MessageRef,
    /// `true` when an existing message was edited rather than a new one sent.
    pub edited: bool,
}

impl TerminationResult {
    pub fn jump_url(&self) -> String {
        self.message.jump_url()
    }

    pub fn heading(&self) -> &'static str {
        if self.edited { "Embed Edited" } else { "Embed Sent" }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Render(RenderInstruction),
    Prompt(FormSpec),
    Choose(ChoiceSpec),
    Rejected(Rejection),
    Terminated(TerminationResult),
    Discarded,
}
