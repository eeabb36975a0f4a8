//! The embed under construction.
//!
//! `EmbedDraft` is plain data: every facet is optional except the color, and the
//! session that owns a draft is the only thing allowed to replace it.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const TITLE_LIMIT: usize = 256;
pub const DESCRIPTION_LIMIT: usize = 4000;
pub const FIELD_NAME_LIMIT: usize = 256;
pub const FIELD_VALUE_LIMIT: usize = 1024;
pub const FOOTER_TEXT_LIMIT: usize = 2048;
pub const AUTHOR_NAME_LIMIT: usize = 256;
pub const URL_LIMIT: usize = 2048;
pub const MAX_FIELDS: usize = 25;
/// Combined length of all text in one embed.
pub const TOTAL_TEXT_LIMIT: usize = 6000;

const STARTER_TITLE: &str = "Embed Tool";
const STARTER_DESCRIPTION: &str = "Use the buttons below to edit the embed.\n\
    Press \"Tutorial\" to hide/show the example embed below.";

/// A 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgb(u32);

impl Rgb {
    pub const fn new(value: u32) -> Self {
        Self(value & 0xFF_FFFF)
    }

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    /// Lowercase `#rrggbb` form, used to pre-fill the color form.
    pub fn hex(self) -> String {
        format!("#{:06x}", self.0)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

/// One name/value pair of an embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl Field {
    /// Build a field, rejecting blank or over-long text.
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        inline: bool,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let value = value.into();
        check_required(&name, "field name", FIELD_NAME_LIMIT)?;
        check_required(&value, "field value", FIELD_VALUE_LIMIT)?;
        Ok(Self { name, value, inline })
    }
}

fn check_required(text: &str, facet: &'static str, limit: usize) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::MissingText { facet });
    }
    let len = text.chars().count();
    if len > limit {
        return Err(ValidationError::TextTooLong { facet, len, limit });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub color: Rgb,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl EmbedDraft {
    /// An empty draft with only a color.
    pub fn empty(color: Rgb) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    /// The draft a brand new send session starts from.
    pub fn starter(color: Rgb) -> Self {
        Self {
            title: Some(STARTER_TITLE.to_string()),
            description: Some(STARTER_DESCRIPTION.to_string()),
            color,
            ..Default::default()
        }
    }

    pub fn has_author(&self) -> bool {
        self.author_name.is_some()
    }

    pub fn has_footer(&self) -> bool {
        self.footer_text.is_some() || self.footer_icon_url.is_some()
    }

    /// Number of characters counted against the per-embed text budget.
    pub fn text_len(&self) -> usize {
        let opt = |s: &Option<String>| s.as_deref().map_or(0, |s| s.chars().count());
        let fields: usize = self
            .fields
            .iter()
            .map(|f| f.name.chars().count() + f.value.chars().count())
            .sum();
        opt(&self.title)
            + opt(&self.description)
            + opt(&self.author_name)
            + opt(&self.footer_text)
            + fields
    }

    /// Check the limits that span several facets.
    pub fn check_limits(&self) -> Result<(), ValidationError> {
        if self.fields.len() > MAX_FIELDS {
            return Err(ValidationError::TooManyFields { limit: MAX_FIELDS });
        }
        let len = self.text_len();
        if len > TOTAL_TEXT_LIMIT {
            return Err(ValidationError::TextTooLong {
                facet: "embed",
                len,
                limit: TOTAL_TEXT_LIMIT,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_hex_is_zero_padded() {
        assert_eq!(Rgb::new(0x00FF00).hex(), "#00ff00");
        assert_eq!(Rgb::from_rgb(1, 2, 3).value(), 0x010203);
        assert_eq!(Rgb::new(0x1FF_FFFF).value(), 0xFF_FFFF);
    }

    #[test]
    fn field_rejects_blank_name() {
        let err = Field::new("  ", "value", true).unwrap_err();
        assert_eq!(err, ValidationError::MissingText { facet: "field name" });
    }

    #[test]
    fn field_rejects_long_value() {
        let err = Field::new("name", "x".repeat(FIELD_VALUE_LIMIT + 1), false).unwrap_err();
        assert!(matches!(err, ValidationError::TextTooLong { limit: FIELD_VALUE_LIMIT, .. }));
    }

    #[test]
    fn starter_has_title_and_description() {
        let draft = EmbedDraft::starter(Rgb::new(0x123456));
        assert_eq!(draft.title.as_deref(), Some("Embed Tool"));
        assert!(draft.description.is_some());
        assert!(draft.fields.is_empty());
        assert!(!draft.has_author());
    }

    #[test]
    fn total_text_limit_is_enforced() {
        let mut draft = EmbedDraft::empty(Rgb::default());
        draft.description = Some("x".repeat(DESCRIPTION_LIMIT));
        draft.title = Some("y".repeat(TITLE_LIMIT));
        assert!(draft.check_limits().is_ok());
        for _ in 0..2 {
            draft.fields.push(Field::new("n".repeat(200), "v".repeat(FIELD_VALUE_LIMIT), false).unwrap());
        }
        assert!(matches!(
            draft.check_limits(),
            Err(ValidationError::TextTooLong { facet: "embed", .. })
        ));
    }

    #[test]
    fn draft_serializes_without_empty_facets() {
        let json = serde_json::to_value(EmbedDraft::empty(Rgb::new(0xff))).unwrap();
        assert_eq!(json["color"], 255);
        assert!(json.get("title").is_none());
    }
}
