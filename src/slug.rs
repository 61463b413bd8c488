//! Slug sanitization and generation.
//!
//! A slug is the path segment of a short URL. Only ASCII letters, digits,
//! `-` and `_` are allowed; anything else is stripped rather than rejected.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Characters used for generated slugs.
const RANDOM_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Length of generated slugs.
pub const RANDOM_SLUG_LEN: usize = 6;

/// Errors from slug parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug is empty after removing unsupported characters: {0:?}")]
    Empty(String),
}

/// A sanitized, non-empty slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Parse user input into a slug, stripping unsupported characters.
    pub fn parse(input: &str) -> Result<Self, SlugError> {
        let clean = sanitize(input.trim());
        if clean.is_empty() {
            return Err(SlugError::Empty(input.to_string()));
        }
        Ok(Self(clean))
    }

    /// Use the requested slug if it survives sanitizing, otherwise generate one.
    pub fn resolve(requested: Option<&str>) -> Self {
        let requested = requested.map(str::trim).unwrap_or_default();
        let clean = sanitize(requested);
        if clean != requested {
            warn!("Slug '{}' sanitized to '{}'", requested, clean);
        }
        if clean.is_empty() {
            Self::random()
        } else {
            Self(clean)
        }
    }

    /// Generate a random lowercase alphanumeric slug.
    pub fn random() -> Self {
        let mut rng = rand::thread_rng();
        let slug = (0..RANDOM_SLUG_LEN)
            .map(|_| RANDOM_CHARSET[rng.gen_range(0..RANDOM_CHARSET.len())] as char)
            .collect();
        Self(slug)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Strip every character outside `[A-Za-z0-9_-]`.
pub fn sanitize(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}
