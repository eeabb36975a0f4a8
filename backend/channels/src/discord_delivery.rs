//! Posting, editing and fetching embeds through the Discord REST API.

use std::sync::Arc;

use async_trait::async_trait;
use embedtool_core::{ChannelRef, Delivery, DeliveryError, EmbedDraft, ExistingMessage, MessageRef, Rgb};
use serenity::all::{ChannelId, CreateMessage, EditMessage, Http, MessageId};
use tracing::debug;

use crate::discord_embeds::DiscordEmbeds;

pub struct SerenityDelivery {
    http: Arc<Http>,
    self_id: u64,
    default_color: Rgb,
}

impl SerenityDelivery {
    pub fn new(http: Arc<Http>, self_id: u64, default_color: Rgb) -> Self {
        Self { http, self_id, default_color }
    }
}

#[async_trait]
impl Delivery for SerenityDelivery {
    fn self_id(&self) -> u64 {
        self.self_id
    }

    async fn deliver_new(&self, channel: &ChannelRef, embed: &EmbedDraft) -> Result<MessageRef, DeliveryError> {
        let message = ChannelId::new(channel.channel_id)
            .send_message(&*self.http, CreateMessage::new().embed(DiscordEmbeds::from_draft(embed)))
            .await
            .map_err(delivery_error)?;
        debug!("[Discord] Sent embed as message {}", message.id);
        Ok(MessageRef {
            guild_id: channel.guild_id,
            channel_id: channel.channel_id,
            message_id: message.id.get(),
        })
    }

    async fn deliver_edit(&self, message: &MessageRef, embed: &EmbedDraft) -> Result<MessageRef, DeliveryError> {
        ChannelId::new(message.channel_id)
            .edit_message(
                &*self.http,
                MessageId::new(message.message_id),
                EditMessage::new().embed(DiscordEmbeds::from_draft(embed)),
            )
            .await
            .map_err(delivery_error)?;
        Ok(*message)
    }

    async fn fetch_message(&self, message: &MessageRef) -> Result<ExistingMessage, DeliveryError> {
        let fetched = ChannelId::new(message.channel_id)
            .message(&*self.http, MessageId::new(message.message_id))
            .await
            .map_err(delivery_error)?;
        Ok(ExistingMessage {
            reference: *message,
            author_id: fetched.author.id.get(),
            embed: fetched
                .embeds
                .first()
                .map(|embed| DiscordEmbeds::to_draft(embed, self.default_color)),
        })
    }
}

fn delivery_error(err: serenity::Error) -> DeliveryError {
    if let serenity::Error::Http(http) = &err {
        match http.status_code().map(|s| s.as_u16()) {
            Some(404) => return DeliveryError::NotFound(err.to_string()),
            Some(403) => return DeliveryError::Forbidden(err.to_string()),
            _ => {}
        }
    }
    DeliveryError::Failed(err.to_string())
}
