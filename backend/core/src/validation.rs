//! Validation of raw text submitted through forms.

use url::Url;

use crate::draft::URL_LIMIT;
use crate::error::ValidationError;

/// Parse a boolean-like answer: `true`/`1` and `false`/`0`, case-insensitive.
pub fn parse_bool(raw: &str) -> Result<bool, ValidationError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ValidationError::InvalidBooleanInput {
            input: raw.to_string(),
        }),
    }
}

/// Optional free text: blank input clears the facet, anything else is kept verbatim.
pub fn optional_text(
    raw: &str,
    facet: &'static str,
    limit: usize,
) -> Result<Option<String>, ValidationError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    let len = raw.chars().count();
    if len > limit {
        return Err(ValidationError::TextTooLong { facet, len, limit });
    }
    Ok(Some(raw.to_string()))
}

/// Optional image URL: blank clears it, otherwise it must be an absolute
/// `http`, `https` or `attachment` URL.
pub fn optional_url(raw: &str, facet: &'static str) -> Result<Option<String>, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let len = trimmed.chars().count();
    if len > URL_LIMIT {
        return Err(ValidationError::TextTooLong {
            facet,
            len,
            limit: URL_LIMIT,
        });
    }
    let invalid = || ValidationError::InvalidUrl {
        input: trimmed.to_string(),
    };
    let url = Url::parse(trimmed).map_err(|_| invalid())?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(Some(trimmed.to_string())),
        "attachment" => Ok(Some(trimmed.to_string())),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_accepts_words_and_digits() {
        assert_eq!(parse_bool("True"), Ok(true));
        assert_eq!(parse_bool("1"), Ok(true));
        assert_eq!(parse_bool("FALSE"), Ok(false));
        assert_eq!(parse_bool("0"), Ok(false));
    }

    #[test]
    fn bool_rejects_everything_else() {
        for raw in ["yes", "no", "", "2", "t"] {
            assert_eq!(
                parse_bool(raw),
                Err(ValidationError::InvalidBooleanInput { input: raw.into() }),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn blank_text_clears() {
        assert_eq!(optional_text("   ", "title", 256), Ok(None));
        assert_eq!(optional_text("Hello", "title", 256), Ok(Some("Hello".into())));
    }

    #[test]
    fn long_text_is_rejected_not_truncated() {
        let err = optional_text(&"x".repeat(257), "title", 256).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TextTooLong { facet: "title", len: 257, limit: 256 }
        );
    }

    #[test]
    fn url_schemes() {
        assert_eq!(
            optional_url(" https://example.com/a.png ", "image"),
            Ok(Some("https://example.com/a.png".into()))
        );
        assert!(optional_url("attachment://a.png", "image").unwrap().is_some());
        assert_eq!(optional_url("", "image"), Ok(None));
        assert!(matches!(
            optional_url("ftp://example.com/a.png", "image"),
            Err(ValidationError::InvalidUrl { .. })
        ));
        assert!(matches!(
            optional_url("not a url", "image"),
            Err(ValidationError::InvalidUrl { .. })
        ));
    }
}
