//! Link registry models.
//!
//! The registry maps slugs to link entries. In the index layout it is the
//! entire content of `database.json`; in the pages layout each entry is
//! stored next to its generated page.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::slug::Slug;

/// Kind of link a slug points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    /// Redirect to an arbitrary URL.
    Url,
    /// PDF hosted in the repository.
    Pdf,
}

impl LinkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::Pdf => "pdf",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "url" => Some(Self::Url),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    /// Short uppercase label for listings.
    pub fn badge(&self) -> &'static str {
        match self {
            Self::Url => "URL",
            Self::Pdf => "PDF",
        }
    }
}

/// A single registry entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkEntry {
    /// Where the short URL leads.
    pub target: String,
    /// Link kind.
    #[serde(rename = "type")]
    pub link_type: LinkType,
    /// Creation time.
    pub created: DateTime<Utc>,
    /// Fields written by other tools, kept through rewrites.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl LinkEntry {
    /// Create an entry stamped with the current time.
    pub fn new(target: impl Into<String>, link_type: LinkType) -> Self {
        Self::with_created(target, link_type, Utc::now())
    }

    pub fn with_created(
        target: impl Into<String>,
        link_type: LinkType,
        created: DateTime<Utc>,
    ) -> Self {
        Self {
            target: target.into(),
            link_type,
            created,
            extra: serde_json::Map::new(),
        }
    }
}

/// Slug to entry mapping, serialized as a JSON object keyed by slug.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
    entries: BTreeMap<String, LinkEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, slug: &Slug) -> bool {
        self.entries.contains_key(slug.as_str())
    }

    pub fn get(&self, slug: &Slug) -> Option<&LinkEntry> {
        self.entries.get(slug.as_str())
    }

    /// Insert an entry for a slug that must not exist yet.
    ///
    /// Returns the entry back when the slug is already taken.
    pub fn insert_new(&mut self, slug: &Slug, entry: LinkEntry) -> Result<(), LinkEntry> {
        if self.contains(slug) {
            return Err(entry);
        }
        self.entries.insert(slug.as_str().to_string(), entry);
        Ok(())
    }

    pub fn remove(&mut self, slug: &Slug) -> Option<LinkEntry> {
        self.entries.remove(slug.as_str())
    }

    /// Entries ordered newest first.
    pub fn newest_first(&self) -> Vec<(&str, &LinkEntry)> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .map(|(slug, entry)| (slug.as_str(), entry))
            .collect();
        entries.sort_by(|a, b| b.1.created.cmp(&a.1.created));
        entries
    }

    /// Serialize as the pretty-printed document stored in the repository.
    pub fn to_document(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_document(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}

impl FromIterator<(Slug, LinkEntry)> for Registry {
    fn from_iter<I: IntoIterator<Item = (Slug, LinkEntry)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(slug, entry)| (slug.as_str().to_string(), entry))
                .collect(),
        }
    }
}
