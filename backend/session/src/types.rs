/// Control, payload and session identifier types.
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use embedtool_core::UserIdentity;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Session id
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

// ---------------------------------------------------------------------------
// Controls
// ---------------------------------------------------------------------------

/// Every interactive control of the editor panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlId {
    Title,
    Description,
    Color,
    AddField,
    RemoveField,
    EditField,
    Thumbnail,
    Image,
    FooterImage,
    ToggleAuthor,
    FooterText,
    ToggleTimestamp,
    Send,
    ToggleTutorial,
    Cancel,
}

impl ControlId {
    pub const ALL: [ControlId; 15] = [
        ControlId::Title,
        ControlId::Description,
        ControlId::Color,
        ControlId::AddField,
        ControlId::RemoveField,
        ControlId::EditField,
        ControlId::Thumbnail,
        ControlId::Image,
        ControlId::FooterImage,
        ControlId::ToggleAuthor,
        ControlId::FooterText,
        ControlId::ToggleTimestamp,
        ControlId::Send,
        ControlId::ToggleTutorial,
        ControlId::Cancel,
    ];

    /// Stable key used inside component custom ids.
    pub fn key(self) -> &'static str {
        match self {
            ControlId::Title => "title",
            ControlId::Description => "description",
            ControlId::Color => "color",
            ControlId::AddField => "add_field",
            ControlId::RemoveField => "remove_field",
            ControlId::EditField => "edit_field",
            ControlId::Thumbnail => "thumbnail",
            ControlId::Image => "image",
            ControlId::FooterImage => "footer_image",
            ControlId::ToggleAuthor => "author",
            ControlId::FooterText => "footer_text",
            ControlId::ToggleTimestamp => "timestamp",
            ControlId::Send => "send",
            ControlId::ToggleTutorial => "tutorial",
            ControlId::Cancel => "cancel",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// Values submitted through a form, keyed by input id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues(HashMap<String, String>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(id, value);
        self
    }

    pub fn insert(&mut self, id: impl Into<String>, value: impl Into<String>) {
        self.0.insert(id.into(), value.into());
    }

    /// Submitted value for `id`; inputs left out of the submission read as empty.
    pub fn get(&self, id: &str) -> &str {
        self.0.get(id).map(String::as_str).unwrap_or("")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormValues {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Plain button press.
    Press,
    /// A form opened by the control was submitted.
    Form(FormValues),
    /// A field was picked from a choice list.
    Selection(usize),
}

/// One user interaction with a session control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlActivation {
    pub control: ControlId,
    pub payload: Payload,
    /// Current identity of the user who interacted, when the platform supplies it.
    pub actor: Option<UserIdentity>,
}

impl ControlActivation {
    pub fn press(control: ControlId) -> Self {
        Self { control, payload: Payload::Press, actor: None }
    }

    pub fn form(control: ControlId, values: FormValues) -> Self {
        Self { control, payload: Payload::Form(values), actor: None }
    }

    pub fn select(control: ControlId, index: usize) -> Self {
        Self { control, payload: Payload::Selection(index), actor: None }
    }

    pub fn by(mut self, actor: UserIdentity) -> Self {
        self.actor = Some(actor);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_keys_round_trip() {
        for control in ControlId::ALL {
            assert_eq!(ControlId::from_key(control.key()), Some(control));
        }
        assert_eq!(ControlId::from_key("nope"), None);
    }

    #[test]
    fn missing_form_values_read_empty() {
        let values = FormValues::new().with("title", "Hello");
        assert_eq!(values.get("title"), "Hello");
        assert_eq!(values.get("description"), "");
    }

    #[test]
    fn session_id_parses_its_display() {
        let id = SessionId::new();
        assert_eq!(id.to_string().parse::<SessionId>().unwrap(), id);
    }
}
