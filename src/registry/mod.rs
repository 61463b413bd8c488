//! Link registries stored in a GitHub repository.
//!
//! Two layouts implement [`LinkStore`]:
//! - [`IndexStore`]: one `database.json` mapping every slug to its entry
//! - [`PageStore`]: one folder per slug holding static pages
//!
//! Both follow the same cycle: read current state, check the slug, write
//! back. There is no locking beyond the blob sha GitHub checks on writes.

mod index;
mod pages;
mod templates;

pub use index::{IndexStore, INDEX_PATH, PDF_DIR};
pub use pages::{PageStore, META_FILE, PAGE_FILE, PDF_FILE};
pub use templates::{PdfViewerPage, RedirectPage};

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{RegistryLayout, Settings};
use crate::github::{EntryKind, GithubClient, GithubError};
use crate::models::{LinkEntry, LinkType};
use crate::slug::Slug;

/// Errors from registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("\"{0}\" is already in use. Choose a different slug.")]
    DuplicateSlug(String),

    #[error("\"{0}\" does not exist")]
    NotFound(String),

    #[error("Repository not found. Check the owner and repository settings.")]
    RepositoryNotFound,

    #[error("The token is invalid.")]
    InvalidToken,

    #[error(transparent)]
    Github(#[from] GithubError),

    #[error("Invalid registry document: {0}")]
    Document(#[from] serde_json::Error),

    #[error("Failed to render page: {0}")]
    Template(#[from] askama::Error),
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// What a new link points at.
#[derive(Debug, Clone)]
pub enum LinkPayload {
    /// Redirect to this URL.
    Url(String),
    /// Host this PDF.
    Pdf(Vec<u8>),
}

impl LinkPayload {
    pub fn link_type(&self) -> LinkType {
        match self {
            Self::Url(_) => LinkType::Url,
            Self::Pdf(_) => LinkType::Pdf,
        }
    }
}

/// A link to create.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub slug: Slug,
    pub payload: LinkPayload,
}

/// A link as stored in the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredLink {
    pub slug: String,
    pub entry: LinkEntry,
}

/// Storage for slug to target mappings.
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Layout this store implements.
    fn layout(&self) -> RegistryLayout;

    /// All links, newest first.
    async fn list(&self) -> RegistryResult<Vec<StoredLink>>;

    /// Create a link, failing if the slug is taken.
    async fn create(&self, link: NewLink) -> RegistryResult<StoredLink>;

    /// Delete a link. `purge` also removes hosted files where the layout
    /// would otherwise keep them.
    async fn delete(&self, slug: &Slug, purge: bool) -> RegistryResult<StoredLink>;
}

/// Open the store for the configured layout.
pub fn open_store(settings: &Settings) -> RegistryResult<Box<dyn LinkStore>> {
    let client = GithubClient::new(settings)?;
    Ok(match settings.layout {
        RegistryLayout::Index => Box::new(IndexStore::new(client, settings.clone())),
        RegistryLayout::Pages => Box::new(PageStore::new(client, settings.clone())),
    })
}

/// Tell a missing path apart from a missing repository.
///
/// Called after a 404 on registry content: if the repository itself is
/// reachable the registry simply has not been written yet.
async fn ensure_repository(client: &GithubClient) -> RegistryResult<()> {
    match client.get_repository().await {
        Ok(_) => Ok(()),
        Err(GithubError::NotFound) => Err(RegistryError::RepositoryNotFound),
        Err(GithubError::Unauthorized) => Err(RegistryError::InvalidToken),
        Err(e) => Err(e.into()),
    }
}

/// Sha of a file in a directory listing, if present.
async fn existing_file_sha(
    client: &GithubClient,
    dir: &str,
    name: &str,
) -> RegistryResult<Option<String>> {
    let entries = client.list_directory(dir).await?.unwrap_or_default();
    Ok(entries
        .into_iter()
        .find(|e| e.kind == EntryKind::File && e.name == name)
        .map(|e| e.sha))
}

/// Sort newest first.
fn sort_newest_first(links: &mut [StoredLink]) {
    links.sort_by(|a, b| b.entry.created.cmp(&a.entry.created));
}
