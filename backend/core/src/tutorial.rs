//! The example embed shown next to the draft while the tutorial is visible.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::draft::{EmbedDraft, Field, Rgb};

/// Image URLs used by the tutorial overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorialImages {
    pub thumbnail_url: String,
    pub image_url: String,
    pub footer_icon_url: String,
    pub author_icon_url: Option<String>,
}

impl Default for TutorialImages {
    fn default() -> Self {
        Self {
            thumbnail_url: "https://cdn.discordapp.com/attachments/751512715872436416/1125132998967304412/t6HnzvR8.png".into(),
            image_url: "https://cdn.discordapp.com/attachments/751512715872436416/1125132939160731799/kJ9NYtR1.png".into(),
            footer_icon_url: "https://cdn.discordapp.com/attachments/751512715872436416/1125701630273261629/13YRA70M.png".into(),
            author_icon_url: None,
        }
    }
}

/// Immutable example embed labelling every facet. Built once and shared by all sessions.
#[derive(Debug, Clone, PartialEq)]
pub struct TutorialOverlay {
    embed: EmbedDraft,
}

impl TutorialOverlay {
    pub fn new(color: Rgb, images: &TutorialImages) -> Self {
        let field = |name: &str, value: &str, inline: bool| Field {
            name: name.to_string(),
            value: value.to_string(),
            inline,
        };
        let embed = EmbedDraft {
            title: Some("Title".into()),
            description: Some("Description".into()),
            color,
            fields: vec![
                field("Inline Field 1", "← Color sets color of the bar on the left!", true),
                field("Inline Field 2", "Value 2", true),
                field("Inline Field 3", "Inline fields will be next to each other!", true),
                field("Non-inline Field", "Value", false),
            ],
            author_name: Some("Author".into()),
            author_icon_url: images.author_icon_url.clone(),
            footer_text: Some("Footer".into()),
            footer_icon_url: Some(images.footer_icon_url.clone()),
            thumbnail_url: Some(images.thumbnail_url.clone()),
            image_url: Some(images.image_url.clone()),
            timestamp: Some(Utc::now()),
        };
        Self { embed }
    }

    pub fn embed(&self) -> &EmbedDraft {
        &self.embed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_labels_every_facet() {
        let overlay = TutorialOverlay::new(Rgb::new(0x5865F2), &TutorialImages::default());
        let embed = overlay.embed();
        assert_eq!(embed.fields.len(), 4);
        assert!(!embed.fields[3].inline);
        assert!(embed.thumbnail_url.is_some());
        assert!(embed.image_url.is_some());
        assert!(embed.has_footer());
        assert!(embed.check_limits().is_ok());
    }
}
