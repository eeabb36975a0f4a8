/// Control registry: the fixed editor panel: five rows, each led by a
/// disabled header, followed by three controls.
use serde::{Deserialize, Serialize};

use crate::types::ControlId;

// ---------------------------------------------------------------------------
// Rows and styles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlRow {
    General,
    Fields,
    Images,
    Options,
    Settings,
}

impl ControlRow {
    pub const ALL: [ControlRow; 5] = [
        ControlRow::General,
        ControlRow::Fields,
        ControlRow::Images,
        ControlRow::Options,
        ControlRow::Settings,
    ];

    pub fn header(self) -> &'static str {
        match self {
            ControlRow::General => "GENERAL",
            ControlRow::Fields => "FIELDS",
            ControlRow::Images => "IMAGES",
            ControlRow::Options => "OPTIONS",
            ControlRow::Settings => "SETTINGS",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            ControlRow::General => "general",
            ControlRow::Fields => "fields",
            ControlRow::Images => "images",
            ControlRow::Options => "options",
            ControlRow::Settings => "settings",
        }
    }
}

/// Presentation hint; the adapter maps it onto its own button styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlStyle {
    Header,
    Neutral,
    Confirm,
    Danger,
}

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlDef {
    pub id: ControlId,
    pub label: &'static str,
    pub row: ControlRow,
    pub style: ControlStyle,
}

fn def(id: ControlId, label: &'static str, row: ControlRow) -> ControlDef {
    ControlDef { id, label, row, style: ControlStyle::Neutral }
}

pub fn builtin_controls() -> Vec<ControlDef> {
    use ControlId::*;
    use ControlRow::*;
    vec![
        def(Title, "Title", General),
        def(Description, "Description", General),
        def(Color, "Color", General),
        def(AddField, "Add", Fields),
        def(RemoveField, "Remove", Fields),
        def(EditField, "Edit", Fields),
        def(Thumbnail, "Thumbnail", Images),
        def(Image, "Image", Images),
        def(FooterImage, "Footer", Images),
        def(ToggleAuthor, "Author", Options),
        def(FooterText, "Footer", Options),
        def(ToggleTimestamp, "Timestamp", Options),
        ControlDef { id: Send, label: "Send", row: Settings, style: ControlStyle::Confirm },
        def(ToggleTutorial, "Tutorial", Settings),
        ControlDef { id: Cancel, label: "Cancel", row: Settings, style: ControlStyle::Danger },
    ]
}

pub const CONFIRM_LABEL: &str = "Confirm";

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

pub struct ControlRegistry {
    controls: Vec<ControlDef>,
}

impl ControlRegistry {
    pub fn new() -> Self {
        Self { controls: builtin_controls() }
    }

    pub fn all(&self) -> &[ControlDef] {
        &self.controls
    }

    pub fn find(&self, id: ControlId) -> Option<&ControlDef> {
        self.controls.iter().find(|c| c.id == id)
    }

    pub fn row(&self, row: ControlRow) -> impl Iterator<Item = &ControlDef> {
        self.controls.iter().filter(move |c| c.row == row)
    }
}

impl Default for ControlRegistry {
    fn default() -> Self { Self::new() }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// What a single button on the panel looks like right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelButton {
    Header { row: ControlRow },
    Control { id: ControlId, label: String, style: ControlStyle, disabled: bool },
}

impl PanelButton {
    pub fn label(&self) -> &str {
        match self {
            PanelButton::Header { row } => row.header(),
            PanelButton::Control { label, .. } => label,
        }
    }

    pub fn is_disabled(&self) -> bool {
        match self {
            PanelButton::Header { .. } => true,
            PanelButton::Control { disabled, .. } => *disabled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlsLayout {
    pub rows: Vec<Vec<PanelButton>>,
}

impl ControlsLayout {
    /// Build the panel for the current session flags.
    pub fn build(registry: &ControlRegistry, cancel_armed: bool) -> Self {
        let rows = ControlRow::ALL
            .into_iter()
            .map(|row| {
                let mut buttons = vec![PanelButton::Header { row }];
                buttons.extend(registry.row(row).map(|def| {
                    let label = if def.id == ControlId::Cancel && cancel_armed {
                        CONFIRM_LABEL
                    } else {
                        def.label
                    };
                    PanelButton::Control {
                        id: def.id,
                        label: label.to_string(),
                        style: def.style,
                        disabled: false,
                    }
                }));
                buttons
            })
            .collect();
        Self { rows }
    }

    pub fn disable_all(&mut self) {
        for button in self.rows.iter_mut().flatten() {
            if let PanelButton::Control { disabled, .. } = button {
                *disabled = true;
            }
        }
    }

    pub fn disabled(mut self) -> Self {
        self.disable_all();
        self
    }

    pub fn find(&self, id: ControlId) -> Option<&PanelButton> {
        self.rows
            .iter()
            .flatten()
            .find(|b| matches!(b, PanelButton::Control { id: bid, .. } if *bid == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_control_is_registered_once() {
        let registry = ControlRegistry::new();
        for id in ControlId::ALL {
            assert_eq!(registry.all().iter().filter(|c| c.id == id).count(), 1, "{id}");
        }
    }

    #[test]
    fn layout_has_five_rows_of_four() {
        let layout = ControlsLayout::build(&ControlRegistry::new(), false);
        assert_eq!(layout.rows.len(), 5);
        assert!(layout.rows.iter().all(|r| r.len() == 4));
        assert!(layout.rows.iter().all(|r| matches!(r[0], PanelButton::Header { .. })));
        assert_eq!(layout.rows[4][1].label(), "Send");
    }

    #[test]
    fn armed_cancel_reads_confirm() {
        let registry = ControlRegistry::new();
        let idle = ControlsLayout::build(&registry, false);
        let armed = ControlsLayout::build(&registry, true);
        assert_eq!(idle.find(ControlId::Cancel).unwrap().label(), "Cancel");
        assert_eq!(armed.find(ControlId::Cancel).unwrap().label(), "Confirm");
    }

    #[test]
    fn disabled_layout_disables_everything() {
        let layout = ControlsLayout::build(&ControlRegistry::new(), false).disabled();
        assert!(layout.rows.iter().flatten().all(PanelButton::is_disabled));
    }
}
