use anyhow::Result;
use async_trait::async_trait;

use crate::render::RenderInstruction;
use crate::types::SessionId;

/// Where the registry pushes updates that are not answers to an activation.
#[async_trait]
pub trait PresentationSink: Send + Sync {
    /// The session timed out. `last` is the last rendered panel with every
    /// control disabled; the content stays as it was.
    async fn controls_expired(&self, session: SessionId, last: &RenderInstruction) -> Result<()>;
}

/// Sink that drops every update.
pub struct NullSink;

#[async_trait]
impl PresentationSink for NullSink {
    async fn controls_expired(&self, _session: SessionId, _last: &RenderInstruction) -> Result<()> {
        Ok(())
    }
}
