//! Editor panels shown to the invoking user.
//!
//! A panel is the ephemeral response to the `/embed` command. The command
//! interaction is kept per session so the panel can still be edited when the
//! triggering interaction sits on another message, and disabled on timeout.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use embedtool_session::{PresentationSink, RenderInstruction, SessionId};
use serenity::all::{CommandInteraction, EditInteractionResponse, Http};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::discord_components::panel_rows;
use crate::discord_embeds::DiscordEmbeds;

pub struct DiscordPanels {
    http: Arc<Http>,
    panels: RwLock<HashMap<SessionId, CommandInteraction>>,
}

impl DiscordPanels {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http, panels: RwLock::new(HashMap::new()) }
    }

    pub async fn attach(&self, session: SessionId, command: CommandInteraction) {
        self.panels.write().await.insert(session, command);
    }

    pub async fn detach(&self, session: SessionId) -> Option<CommandInteraction> {
        self.panels.write().await.remove(&session)
    }

    /// Redraw the panel of `session`.
    pub async fn update(&self, session: SessionId, render: &RenderInstruction) -> Result<()> {
        let panels = self.panels.read().await;
        let Some(command) = panels.get(&session) else {
            debug!("[Discord] No panel stored for {}", session);
            return Ok(());
        };
        let embeds = render.embeds().into_iter().map(DiscordEmbeds::from_draft).collect();
        command
            .edit_response(
                &*self.http,
                EditInteractionResponse::new()
                    .embeds(embeds)
                    .components(panel_rows(session, &render.controls)),
            )
            .await
            .context("Failed to redraw editor panel")?;
        Ok(())
    }

    /// Delete the panel once the session is over.
    pub async fn remove(&self, session: SessionId) {
        if let Some(command) = self.detach(session).await {
            if let Err(e) = command.delete_response(&*self.http).await {
                warn!("[Discord] Could not delete panel of {}: {}", session, e);
            }
        }
    }

    /// Keep the panel content but drop its controls.
    pub async fn freeze(&self, session: SessionId) {
        if let Some(command) = self.detach(session).await {
            let edit = EditInteractionResponse::new().components(Vec::new());
            if let Err(e) = command.edit_response(&*self.http, edit).await {
                warn!("[Discord] Could not freeze panel of {}: {}", session, e);
            }
        }
    }
}

#[async_trait]
impl PresentationSink for DiscordPanels {
    async fn controls_expired(&self, session: SessionId, last: &RenderInstruction) -> Result<()> {
        let Some(command) = self.detach(session).await else {
            return Ok(());
        };
        command
            .edit_response(
                &*self.http,
                EditInteractionResponse::new().components(panel_rows(session, &last.controls)),
            )
            .await
            .context("Failed to disable editor panel")?;
        Ok(())
    }
}
