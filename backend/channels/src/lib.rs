use async_trait::async_trait;

pub mod discord;
pub mod discord_commands;
pub mod discord_components;
pub mod discord_delivery;
pub mod discord_embeds;
pub mod discord_modals;
pub mod discord_panels;

pub use discord::{DiscordAdapter, DiscordSettings};

/// All channel adapters implement this trait.
#[async_trait]
pub trait ChannelAdapter: Send + Sync {
    /// Human-readable adapter name for logging.
    fn name(&self) -> &str;

    /// Connect and serve until the connection ends.
    async fn start(&self) -> anyhow::Result<()>;
}
