//! Base64 encoding of file content for the contents API.
//!
//! GitHub returns file content as base64 wrapped at 60 columns with `\n`
//! separators. Uploads are sent unwrapped.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::error::GithubError;

/// Encode raw bytes for an upload body.
pub fn encode_content(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode content returned by the API, ignoring embedded whitespace.
pub fn decode_content(encoded: &str) -> Result<Vec<u8>, GithubError> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| GithubError::Decode(e.to_string()))
}
