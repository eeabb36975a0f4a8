use thiserror::Error;

/// Raw user input that failed validation. The draft is never touched when one of
/// these is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("inline must be True/False or 1/0, got {input:?}")]
    InvalidBooleanInput { input: String },

    #[error("{input:?} is not a valid color; use a HEX code like #00FF00")]
    InvalidColor { input: String },

    #[error("{input:?} is not a valid http(s) or attachment URL")]
    InvalidUrl { input: String },

    #[error("{facet} is {len} characters long (limit {limit})")]
    TextTooLong {
        facet: &'static str,
        len: usize,
        limit: usize,
    },

    #[error("{facet} cannot be empty")]
    MissingText { facet: &'static str },

    #[error("an embed can hold at most {limit} fields")]
    TooManyFields { limit: usize },
}

/// Errors produced while mutating an embed draft.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmbedError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("there are no fields")]
    NoFields,

    #[error("field {index} does not exist ({len} fields)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Failure reported by the delivery collaborator (send, edit or fetch a message).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    #[error("message not found: {0}")]
    NotFound(String),

    #[error("missing permission: {0}")]
    Forbidden(String),

    #[error("delivery failed: {0}")]
    Failed(String),
}

impl EmbedError {
    /// Short heading used when the error is shown to the user.
    pub fn heading(&self) -> &'static str {
        match self {
            EmbedError::Validation(ValidationError::InvalidBooleanInput { .. }) => "Invalid Inline",
            EmbedError::Validation(ValidationError::InvalidColor { .. }) => "Invalid Color",
            EmbedError::Validation(ValidationError::InvalidUrl { .. }) => "Invalid URL",
            EmbedError::Validation(ValidationError::TextTooLong { .. }) => "Too Long",
            EmbedError::Validation(ValidationError::MissingText { .. }) => "Missing Text",
            EmbedError::Validation(ValidationError::TooManyFields { .. }) => "Too Many Fields",
            EmbedError::NoFields | EmbedError::IndexOutOfRange { .. } => "Error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_convert_into_embed_errors() {
        let err: EmbedError = ValidationError::InvalidColor { input: "#zzz".into() }.into();
        assert_eq!(err.heading(), "Invalid Color");
        assert!(err.to_string().contains("#zzz"));
    }

    #[test]
    fn no_fields_heading_is_generic() {
        assert_eq!(EmbedError::NoFields.heading(), "Error");
    }
}
