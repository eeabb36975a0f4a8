use embedtool_core::{DeliveryError, EmbedError};
use thiserror::Error;

use crate::types::ControlId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Validation or field error; recovered locally, the session stays active.
    #[error(transparent)]
    Embed(#[from] EmbedError),

    #[error("this editing session has ended")]
    Terminated,

    #[error("this editing session timed out")]
    Expired,

    #[error("can't edit this embed as it wasn't sent by me")]
    Permission,

    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error("{control} does not accept this kind of input")]
    UnexpectedPayload { control: ControlId },

    #[error("no handler registered for {control}")]
    Unhandled { control: ControlId },

    #[error("too many editing sessions are open (limit {limit})")]
    TooManySessions { limit: usize },
}

impl SessionError {
    /// Whether the session is gone after this error.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionError::Terminated | SessionError::Expired | SessionError::Delivery(_)
        )
    }
}
