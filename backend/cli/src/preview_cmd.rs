//! `embedtool preview`: print what a new editing session shows, as the JSON
//! payloads Discord receives.

use anyhow::Result;
use embedtool_channels::discord_components::panel_rows;
use embedtool_channels::discord_embeds::DiscordEmbeds;
use embedtool_core::{ChannelRef, EmbedDraft, SessionMode, TutorialOverlay, UserIdentity};
use embedtool_session::{ControlActivation, ControlId, Session, SessionContext, SessionId};
use serde_json::{json, Value};

use embedtool_config::EmbedToolConfig;

use crate::config;

pub fn build(cfg: &EmbedToolConfig, tutorial: bool) -> Result<Value> {
    let color = config::default_color(cfg)?;
    let context = SessionContext::new(TutorialOverlay::new(color, &config::tutorial_images(cfg)));
    let id = SessionId::new();
    let mut session = Session::new(
        id,
        SessionMode::NewSend { channel: ChannelRef { guild_id: None, channel_id: 1 } },
        EmbedDraft::starter(color),
        UserIdentity::new(0, "preview"),
        &context,
    );

    if tutorial {
        session.handle_control_activation(ControlActivation::press(ControlId::ToggleTutorial))?;
    }

    let render = session.render();
    let embeds: Vec<_> = render.embeds().into_iter().map(DiscordEmbeds::from_draft).collect();
    Ok(json!({
        "draft": render.primary,
        "embeds": embeds,
        "components": panel_rows(id, &render.controls),
    }))
}

pub fn run(cfg: &EmbedToolConfig, tutorial: bool) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&build(cfg, tutorial)?)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starter_preview() {
        let value = build(&EmbedToolConfig::default(), false).unwrap();
        assert_eq!(value["embeds"].as_array().unwrap().len(), 1);
        assert_eq!(value["components"].as_array().unwrap().len(), 5);
        assert!(value["draft"]["title"].is_string());
    }

    #[test]
    fn tutorial_preview_has_two_embeds() {
        let value = build(&EmbedToolConfig::default(), true).unwrap();
        assert_eq!(value["embeds"].as_array().unwrap().len(), 2);
    }
}
