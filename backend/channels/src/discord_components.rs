//! Discord Components
//!
//! Renders the editor panel as button rows, field choices as a select menu,
//! and turns component interactions back into control activations.

use embedtool_session::{
    ChoiceSpec, ControlActivation, ControlStyle, ControlsLayout, PanelButton, SessionId, control_custom_id,
    detect_control, header_custom_id,
};
use serenity::all::{
    ButtonStyle, ComponentInteractionDataKind, CreateActionRow, CreateButton, CreateSelectMenu,
    CreateSelectMenuKind, CreateSelectMenuOption,
};

fn button_style(style: ControlStyle) -> ButtonStyle {
    match style {
        ControlStyle::Header => ButtonStyle::Primary,
        ControlStyle::Neutral => ButtonStyle::Secondary,
        ControlStyle::Confirm => ButtonStyle::Success,
        ControlStyle::Danger => ButtonStyle::Danger,
    }
}

/// One action row per panel row.
pub fn panel_rows(session: SessionId, layout: &ControlsLayout) -> Vec<CreateActionRow> {
    layout
        .rows
        .iter()
        .map(|row| {
            let buttons = row
                .iter()
                .map(|button| match button {
                    PanelButton::Header { row } => CreateButton::new(header_custom_id(session, *row))
                        .label(row.header())
                        .style(button_style(ControlStyle::Header))
                        .disabled(true),
                    PanelButton::Control { id, label, style, disabled } => {
                        CreateButton::new(control_custom_id(session, *id))
                            .label(label)
                            .style(button_style(*style))
                            .disabled(*disabled)
                    }
                })
                .collect();
            CreateActionRow::Buttons(buttons)
        })
        .collect()
}

/// A select menu listing the draft's fields; option values are field positions.
pub fn choice_row(session: SessionId, choice: &ChoiceSpec) -> CreateActionRow {
    let options = choice
        .options
        .iter()
        .map(|opt| {
            CreateSelectMenuOption::new(opt.label.clone(), opt.index.to_string()).description(opt.description.clone())
        })
        .collect();
    let menu = CreateSelectMenu::new(
        control_custom_id(session, choice.control),
        CreateSelectMenuKind::String { options },
    )
    .placeholder(choice.placeholder);
    CreateActionRow::SelectMenu(menu)
}

/// Decode a button press or a field selection. Returns `None` for ids that do
/// not belong to a session control.
pub fn component_activation(
    custom_id: &str,
    kind: &ComponentInteractionDataKind,
) -> Option<(SessionId, ControlActivation)> {
    let (session, control) = detect_control(custom_id)?;
    let activation = match kind {
        ComponentInteractionDataKind::Button => ControlActivation::press(control),
        ComponentInteractionDataKind::StringSelect { values } => {
            let index = values.first()?.parse().ok()?;
            ControlActivation::select(control, index)
        }
        _ => return None,
    };
    Some((session, activation))
}
