//! Discord Embed Builder
//!
//! Maps embed drafts to serenity embeds and back, and builds the small status
//! cards (errors, delivery outcomes) shown to the editing user.

use chrono::{DateTime, Utc};
use embedtool_core::{EmbedDraft, Field, Rgb};
use embedtool_session::{Rejection, TerminationResult};
use serenity::all::{Colour, CreateEmbed, CreateEmbedAuthor, CreateEmbedFooter, Embed, Timestamp};

const ERROR_COLOUR: u32 = 0xE74C3C;
const SUCCESS_COLOUR: u32 = 0x2ECC71;

pub struct DiscordEmbeds;

impl DiscordEmbeds {
    /// Build the Discord embed for a draft. A footer icon without footer text
    /// is sent with empty text.
    pub fn from_draft(draft: &EmbedDraft) -> CreateEmbed {
        let mut embed = CreateEmbed::new().colour(Colour::new(draft.color.value()));
        if let Some(title) = &draft.title {
            embed = embed.title(title);
        }
        if let Some(description) = &draft.description {
            embed = embed.description(description);
        }
        for field in &draft.fields {
            embed = embed.field(&field.name, &field.value, field.inline);
        }
        if let Some(name) = &draft.author_name {
            let mut author = CreateEmbedAuthor::new(name);
            if let Some(icon) = &draft.author_icon_url {
                author = author.icon_url(icon);
            }
            embed = embed.author(author);
        }
        if draft.has_footer() {
            let mut footer = CreateEmbedFooter::new(draft.footer_text.clone().unwrap_or_default());
            if let Some(icon) = &draft.footer_icon_url {
                footer = footer.icon_url(icon);
            }
            embed = embed.footer(footer);
        }
        if let Some(url) = &draft.thumbnail_url {
            embed = embed.thumbnail(url);
        }
        if let Some(url) = &draft.image_url {
            embed = embed.image(url);
        }
        if let Some(ts) = draft.timestamp.and_then(to_timestamp) {
            embed = embed.timestamp(ts);
        }
        embed
    }

    /// Seed a draft from an embed already posted in a channel.
    pub fn to_draft(embed: &Embed, default_color: Rgb) -> EmbedDraft {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        EmbedDraft {
            title: embed.title.clone(),
            description: embed.description.clone(),
            color: embed.colour.map(|c| Rgb::new(c.0)).unwrap_or(default_color),
            fields: embed
                .fields
                .iter()
                .map(|f| Field { name: f.name.clone(), value: f.value.clone(), inline: f.inline })
                .collect(),
            author_name: embed.author.as_ref().map(|a| a.name.clone()),
            author_icon_url: embed.author.as_ref().and_then(|a| a.icon_url.clone()),
            footer_text: embed.footer.as_ref().and_then(|f| non_empty(&f.text)),
            footer_icon_url: embed.footer.as_ref().and_then(|f| f.icon_url.clone()),
            thumbnail_url: embed.thumbnail.as_ref().map(|t| t.url.clone()),
            image_url: embed.image.as_ref().map(|i| i.url.clone()),
            timestamp: embed.timestamp.and_then(from_timestamp),
        }
    }

    /// Red card for a rejected activation.
    pub fn rejection(rejection: &Rejection) -> CreateEmbed {
        Self::error_card(rejection.heading, &rejection.message)
    }

    pub fn error_card(title: &str, description: &str) -> CreateEmbed {
        CreateEmbed::new()
            .title(title)
            .description(description)
            .colour(Colour::new(ERROR_COLOUR))
            .timestamp(Timestamp::now())
    }

    /// Green card with a jump link to the delivered message.
    pub fn delivered(outcome: &TerminationResult) -> CreateEmbed {
        CreateEmbed::new()
            .title(outcome.heading())
            .description(format!("[Jump to message]({})", outcome.jump_url()))
            .colour(Colour::new(SUCCESS_COLOUR))
            .timestamp(Timestamp::now())
    }

    pub fn notice(title: &str, description: &str) -> CreateEmbed {
        CreateEmbed::new()
            .title(title)
            .description(description)
            .colour(Colour::new(SUCCESS_COLOUR))
            .timestamp(Timestamp::now())
    }
}

fn to_timestamp(at: DateTime<Utc>) -> Option<Timestamp> {
    Timestamp::from_unix_timestamp(at.timestamp()).ok()
}

fn from_timestamp(ts: Timestamp) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts.unix_timestamp(), 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedtool_core::MessageRef;
    use serde_json::Value;

    fn json(embed: &CreateEmbed) -> Value {
        serde_json::to_value(embed).unwrap()
    }

    #[test]
    fn draft_maps_every_facet() {
        let mut draft = EmbedDraft::starter(Rgb::new(0x00FF00));
        draft.fields = vec![Field::new("A", "B", true).unwrap()];
        draft.author_name = Some("Ada".into());
        draft.thumbnail_url = Some("https://example.com/t.png".into());
        draft.footer_text = Some("foot".into());

        let value = json(&DiscordEmbeds::from_draft(&draft));
        assert_eq!(value["title"], "Embed Tool");
        assert_eq!(value["color"], 0x00FF00);
        assert_eq!(value["fields"][0]["name"], "A");
        assert_eq!(value["fields"][0]["inline"], true);
        assert_eq!(value["author"]["name"], "Ada");
        assert_eq!(value["thumbnail"]["url"], "https://example.com/t.png");
        assert_eq!(value["footer"]["text"], "foot");
        assert!(value.get("image").is_none());
    }

    #[test]
    fn footer_icon_without_text_has_empty_text() {
        let mut draft = EmbedDraft::empty(Rgb::new(0));
        draft.footer_icon_url = Some("https://example.com/f.png".into());
        let value = json(&DiscordEmbeds::from_draft(&draft));
        assert_eq!(value["footer"]["text"], "");
        assert_eq!(value["footer"]["icon_url"], "https://example.com/f.png");
    }

    #[test]
    fn delivered_card_links_to_message() {
        let outcome = TerminationResult {
            message: MessageRef { guild_id: Some(1), channel_id: 2, message_id: 3 },
            edited: true,
        };
        let value = json(&DiscordEmbeds::delivered(&outcome));
        assert_eq!(value["title"], "Embed Edited");
        assert_eq!(value["description"], "[Jump to message](https://discord.com/channels/1/2/3)");
    }
}
