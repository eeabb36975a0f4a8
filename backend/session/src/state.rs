//! Mutable per-session state handed to control handlers.

use std::sync::Arc;

use embedtool_core::{EmbedDraft, TutorialOverlay, UserIdentity};
use serde::Serialize;

use crate::controls::{ControlRegistry, ControlsLayout};
use crate::forms::{FieldPicker, Frame, SubForm};
use crate::render::RenderInstruction;

/// Every flag starts off, also for edit sessions over an embed that already has
/// an author or timestamp: the first toggle press sets them from the invoker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionFlags {
    pub tutorial_visible: bool,
    pub author_visible: bool,
    pub timestamp_visible: bool,
    pub cancel_armed: bool,
}

pub struct SessionState {
    pub draft: EmbedDraft,
    pub flags: SessionFlags,
    /// Identity used for the author facet; refreshed on every activation.
    pub invoker: UserIdentity,
    pub open_form: Option<SubForm>,
    pub open_picker: Option<FieldPicker>,
    overlay: Arc<TutorialOverlay>,
    controls: Arc<ControlRegistry>,
}

impl SessionState {
    pub fn new(
        draft: EmbedDraft,
        invoker: UserIdentity,
        overlay: Arc<TutorialOverlay>,
        controls: Arc<ControlRegistry>,
    ) -> Self {
        Self {
            flags: SessionFlags::default(),
            draft,
            invoker,
            open_form: None,
            open_picker: None,
            overlay,
            controls,
        }
    }

    pub fn frame(&self) -> Frame<'_> {
        Frame {
            overlay: &self.overlay,
            controls: ControlsLayout::build(&self.controls, self.flags.cancel_armed),
        }
    }

    /// Render the current draft with the current tutorial flag.
    pub fn render(&self) -> RenderInstruction {
        self.frame().render(&self.draft, self.flags.tutorial_visible)
    }
}
