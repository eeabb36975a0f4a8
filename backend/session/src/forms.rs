//! Sub-form controllers.
//!
//! A form is opened with a snapshot of the draft and later submitted with the
//! raw values; submission either yields the next draft plus its render or an
//! error, and never touches the draft it was given. Whether the tutorial is
//! echoed in that render is fixed when the form opens.

use embedtool_core::draft::{DESCRIPTION_LIMIT, FOOTER_TEXT_LIMIT, TITLE_LIMIT, URL_LIMIT};
use embedtool_core::fields::check_index;
use embedtool_core::{
    EmbedDraft, EmbedError, Field, TutorialOverlay, add_field, optional_text, optional_url,
    parse_bool, parse_color, remove_field_at, set_field_at,
};

use crate::controls::ControlsLayout;
use crate::render::{ChoiceOption, ChoiceSpec, FormInput, FormSpec, InputStyle, RenderInstruction};
use crate::types::{ControlId, FormValues};

const COLOR_INPUT_LIMIT: u16 = 20;
const INLINE_INPUT_LIMIT: u16 = 5;
/// Select menu option labels and descriptions are capped at 100 characters.
const OPTION_TEXT_LIMIT: usize = 100;

/// What a render needs besides the draft.
pub struct Frame<'a> {
    pub overlay: &'a TutorialOverlay,
    pub controls: ControlsLayout,
}

impl Frame<'_> {
    pub fn render(self, draft: &EmbedDraft, echo_tutorial: bool) -> RenderInstruction {
        RenderInstruction {
            primary: draft.clone(),
            tutorial: echo_tutorial.then(|| self.overlay.embed().clone()),
            controls: self.controls,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Title,
    Description,
    Color,
    Thumbnail,
    Image,
    FooterImage,
    FooterText,
    AddField,
    EditField { index: usize },
}

impl FormKind {
    /// Form opened directly by pressing `control`. Edit Field goes through a
    /// choice first and is not listed here.
    pub fn for_control(control: ControlId) -> Option<Self> {
        Some(match control {
            ControlId::Title => FormKind::Title,
            ControlId::Description => FormKind::Description,
            ControlId::Color => FormKind::Color,
            ControlId::Thumbnail => FormKind::Thumbnail,
            ControlId::Image => FormKind::Image,
            ControlId::FooterImage => FormKind::FooterImage,
            ControlId::FooterText => FormKind::FooterText,
            ControlId::AddField => FormKind::AddField,
            _ => return None,
        })
    }

    pub fn control(self) -> ControlId {
        match self {
            FormKind::Title => ControlId::Title,
            FormKind::Description => ControlId::Description,
            FormKind::Color => ControlId::Color,
            FormKind::Thumbnail => ControlId::Thumbnail,
            FormKind::Image => ControlId::Image,
            FormKind::FooterImage => ControlId::FooterImage,
            FormKind::FooterText => ControlId::FooterText,
            FormKind::AddField => ControlId::AddField,
            FormKind::EditField { .. } => ControlId::EditField,
        }
    }
}

// ---------------------------------------------------------------------------
// Sub-form
// ---------------------------------------------------------------------------

/// A form waiting for its submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubForm {
    kind: FormKind,
    echo_tutorial: bool,
}

impl SubForm {
    /// Open a form pre-filled from `draft`.
    pub fn open(kind: FormKind, draft: &EmbedDraft, echo_tutorial: bool) -> Result<(Self, FormSpec), EmbedError> {
        if let FormKind::EditField { index } = kind {
            check_index(draft, index)?;
        }
        let form = Self { kind, echo_tutorial };
        let spec = form.spec(draft);
        Ok((form, spec))
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn control(&self) -> ControlId {
        self.kind.control()
    }

    /// Validate `values` against `draft` and produce the next draft and its render.
    pub fn submit(
        &self,
        draft: &EmbedDraft,
        values: &FormValues,
        frame: Frame<'_>,
    ) -> Result<(EmbedDraft, RenderInstruction), EmbedError> {
        let next = self.apply(draft, values)?;
        next.check_limits()?;
        let render = frame.render(&next, self.echo_tutorial);
        Ok((next, render))
    }

    fn apply(&self, draft: &EmbedDraft, values: &FormValues) -> Result<EmbedDraft, EmbedError> {
        let mut next = draft.clone();
        match self.kind {
            FormKind::Title => next.title = optional_text(values.get("title"), "title", TITLE_LIMIT)?,
            FormKind::Description => {
                next.description = optional_text(values.get("description"), "description", DESCRIPTION_LIMIT)?
            }
            FormKind::Color => next.color = parse_color(values.get("color"))?,
            FormKind::Thumbnail => next.thumbnail_url = optional_url(values.get("url"), "thumbnail URL")?,
            FormKind::Image => next.image_url = optional_url(values.get("url"), "image URL")?,
            FormKind::FooterImage => next.footer_icon_url = optional_url(values.get("url"), "footer image URL")?,
            FormKind::FooterText => {
                next.footer_text = optional_text(values.get("footer"), "footer", FOOTER_TEXT_LIMIT)?
            }
            FormKind::AddField => next = add_field(draft, submitted_field(values)?)?,
            FormKind::EditField { index } => next = set_field_at(draft, index, submitted_field(values)?)?,
        }
        Ok(next)
    }

    fn spec(&self, draft: &EmbedDraft) -> FormSpec {
        let control = self.control();
        let (title, inputs) = match self.kind {
            FormKind::Title => (
                "Embed Title",
                vec![paragraph("title", "Embed Title:", "Please enter the title of the embed...", TITLE_LIMIT)
                    .prefill(draft.title.clone())],
            ),
            FormKind::Description => (
                "Embed Description",
                vec![paragraph(
                    "description",
                    "Embed Description:",
                    "Please enter the description of the embed...",
                    DESCRIPTION_LIMIT,
                )
                .prefill(draft.description.clone())],
            ),
            FormKind::Color => (
                "Embed Color",
                vec![FormInput {
                    id: "color",
                    label: "Embed Color:",
                    placeholder: "Please enter the HEX code of the color of the embed...",
                    style: InputStyle::Short,
                    max_length: COLOR_INPUT_LIMIT,
                    required: false,
                    value: Some(draft.color.hex()),
                }],
            ),
            FormKind::Thumbnail => (
                "Embed Thumbnail",
                vec![url_input("Thumbnail URL:", "Please enter the URL of the thumbnail...")
                    .prefill(draft.thumbnail_url.clone())],
            ),
            FormKind::Image => (
                "Embed Image",
                vec![url_input("Image URL:", "Please enter the URL of the image...").prefill(draft.image_url.clone())],
            ),
            FormKind::FooterImage => (
                "Footer Image",
                vec![url_input("Footer Image URL:", "Please enter the URL of the footer image...")
                    .prefill(draft.footer_icon_url.clone())],
            ),
            FormKind::FooterText => (
                "Embed Footer",
                vec![paragraph("footer", "Embed Footer:", "Please enter the footer of the embed...", FOOTER_TEXT_LIMIT)
                    .prefill(draft.footer_text.clone())],
            ),
            FormKind::AddField => ("Add Field", field_inputs(None)),
            FormKind::EditField { index } => ("Edit Field", field_inputs(draft.fields.get(index))),
        };
        FormSpec { control, title, inputs }
    }
}

/// Inline is checked before name and value.
fn submitted_field(values: &FormValues) -> Result<Field, EmbedError> {
    let inline = parse_bool(values.get("inline"))?;
    Ok(Field::new(values.get("name"), values.get("value"), inline)?)
}

fn paragraph(id: &'static str, label: &'static str, placeholder: &'static str, limit: usize) -> FormInput {
    FormInput {
        id,
        label,
        placeholder,
        style: InputStyle::Paragraph,
        max_length: u16::try_from(limit).unwrap_or(u16::MAX),
        required: false,
        value: None,
    }
}

fn url_input(label: &'static str, placeholder: &'static str) -> FormInput {
    paragraph("url", label, placeholder, URL_LIMIT)
}

fn field_inputs(current: Option<&Field>) -> Vec<FormInput> {
    use embedtool_core::draft::{FIELD_NAME_LIMIT, FIELD_VALUE_LIMIT};
    vec![
        paragraph("name", "Field Title:", "Please enter the title of the field...", FIELD_NAME_LIMIT)
            .prefill(current.map(|f| f.name.clone())),
        paragraph("value", "Field Value:", "Please enter the value of the field...", FIELD_VALUE_LIMIT)
            .prefill(current.map(|f| f.value.clone())),
        FormInput {
            id: "inline",
            label: "Inline:",
            placeholder: "Whether the field should be inline (True/False)...",
            style: InputStyle::Short,
            max_length: INLINE_INPUT_LIMIT,
            required: true,
            value: current.map(|f| if f.inline { "True".to_string() } else { "False".to_string() }),
        },
    ]
}

impl FormInput {
    fn prefill(mut self, value: Option<String>) -> Self {
        self.value = value;
        self
    }
}

// ---------------------------------------------------------------------------
// Field picker
// ---------------------------------------------------------------------------

/// A field choice list waiting for a selection (Remove Field / Edit Field).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPicker {
    control: ControlId,
    echo_tutorial: bool,
}

impl FieldPicker {
    pub fn open(control: ControlId, draft: &EmbedDraft, echo_tutorial: bool) -> Result<(Self, ChoiceSpec), EmbedError> {
        if draft.fields.is_empty() {
            return Err(EmbedError::NoFields);
        }
        let (title, description) = match control {
            ControlId::RemoveField => ("Remove a Field", "Select the field you want to remove."),
            _ => ("Edit a Field", "Select the field you want to edit."),
        };
        let placeholder = match control {
            ControlId::RemoveField => "Please select a field to remove...",
            _ => "Please select a field to edit...",
        };
        let options = draft
            .fields
            .iter()
            .enumerate()
            .map(|(index, field)| ChoiceOption {
                label: clip(&field.name),
                description: clip(&field.value),
                index,
            })
            .collect();
        let spec = ChoiceSpec { control, title, description, placeholder, options };
        Ok((Self { control, echo_tutorial }, spec))
    }

    pub fn control(&self) -> ControlId {
        self.control
    }

    /// Remove the selected field.
    pub fn remove(
        &self,
        draft: &EmbedDraft,
        index: usize,
        frame: Frame<'_>,
    ) -> Result<(EmbedDraft, RenderInstruction), EmbedError> {
        let next = remove_field_at(draft, index)?;
        let render = frame.render(&next, self.echo_tutorial);
        Ok((next, render))
    }

    /// Open the edit form for the selected field, keeping this picker's echo flag.
    pub fn edit(&self, draft: &EmbedDraft, index: usize) -> Result<(SubForm, FormSpec), EmbedError> {
        SubForm::open(FormKind::EditField { index }, draft, self.echo_tutorial)
    }
}

fn clip(text: &str) -> String {
    if text.chars().count() <= OPTION_TEXT_LIMIT {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(OPTION_TEXT_LIMIT - 1).collect();
    clipped.push('…');
    clipped
}
