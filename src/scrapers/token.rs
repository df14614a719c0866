//! Bearer token extraction from the marketplace front page.
//!
//! The site embeds its API token in inline script state. There is no
//! structured source for it, so this is a plain text search: find the
//! marker, then take the second quoted segment after it. Markup changes
//! on the site should only ever require touching this file.

use crate::error::{Result, ScoutError};
use crate::models::Token;

pub const TOKEN_MARKER: &str = "bearerToken";

/// Pull the token out of raw page text.
///
/// `...bearerToken":"abc123"...` yields `abc123`. Fails with
/// [`ScoutError::Extraction`] when the marker is absent, when the quoted
/// value is not closed, or when it is empty.
pub fn extract_bearer_token(html: &str) -> Result<Token> {
    let start = html
        .find(TOKEN_MARKER)
        .ok_or_else(|| ScoutError::Extraction(format!("marker '{}' not found", TOKEN_MARKER)))?;

    let rest = &html[start + TOKEN_MARKER.len()..];
    let segments: Vec<&str> = rest.splitn(4, '"').collect();
    if segments.len() < 4 {
        return Err(ScoutError::Extraction(
            "no quoted value after marker".to_string(),
        ));
    }

    // JSON embedded inside a JS string escapes its quotes
    let value = segments[2].trim_end_matches('\\');
    if value.is_empty() {
        return Err(ScoutError::Extraction("token value is empty".to_string()));
    }

    Ok(Token::new(value))
}
