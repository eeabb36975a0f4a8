//! Discord Modals
//!
//! Form specs become modals; submitted modals become form values.

use embedtool_session::{FormSpec, FormValues, InputStyle, SessionId, control_custom_id};
use serenity::all::{ActionRow, ActionRowComponent, CreateActionRow, CreateInputText, CreateModal, InputTextStyle};

/// Modal titles are capped at 45 characters by Discord.
const MODAL_TITLE_LIMIT: usize = 45;

pub fn form_modal(session: SessionId, form: &FormSpec) -> CreateModal {
    let rows = form
        .inputs
        .iter()
        .map(|input| {
            let style = match input.style {
                InputStyle::Short => InputTextStyle::Short,
                InputStyle::Paragraph => InputTextStyle::Paragraph,
            };
            let mut text = CreateInputText::new(style, input.label, input.id)
                .placeholder(input.placeholder)
                .max_length(input.max_length)
                .required(input.required);
            if let Some(value) = &input.value {
                text = text.value(value.clone());
            }
            CreateActionRow::InputText(text)
        })
        .collect();
    let title: String = form.title.chars().take(MODAL_TITLE_LIMIT).collect();
    CreateModal::new(control_custom_id(session, form.control), title).components(rows)
}

/// Collect every text input of a submitted modal. Inputs left empty may come
/// back without a value and read as empty.
pub fn modal_values(rows: &[ActionRow]) -> FormValues {
    rows.iter()
        .flat_map(|row| row.components.iter())
        .filter_map(|component| match component {
            ActionRowComponent::InputText(input) => {
                Some((input.custom_id.clone(), input.value.clone().unwrap_or_default()))
            }
            _ => None,
        })
        .collect()
}
