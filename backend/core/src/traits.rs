use async_trait::async_trait;

use crate::draft::EmbedDraft;
use crate::error::DeliveryError;
use crate::types::{ChannelRef, ExistingMessage, MessageRef};

/// The platform side that actually sends, edits and fetches messages.
///
/// Implementations must not retry on their own; a failure is reported once and
/// the caller decides what happens to the session.
#[async_trait]
pub trait Delivery: Send + Sync {
    /// User id the bot posts as. Only messages authored by it may be edited.
    fn self_id(&self) -> u64;

    /// Post a new message carrying `embed` to `channel`.
    async fn deliver_new(&self, channel: &ChannelRef, embed: &EmbedDraft) -> Result<MessageRef, DeliveryError>;

    /// Replace the embed of an existing message.
    async fn deliver_edit(&self, message: &MessageRef, embed: &EmbedDraft) -> Result<MessageRef, DeliveryError>;

    async fn fetch_message(&self, message: &MessageRef) -> Result<ExistingMessage, DeliveryError>;
}
