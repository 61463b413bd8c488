//! Per-slug pages layout: each link owns a folder of static files.
//!
//! ```text
//! {slug}/index.html    redirect stub, or PDF viewer page
//! {slug}/link.json     the registry entry
//! {slug}/document.pdf  hosted PDF (PDF links only)
//! ```
//!
//! With GitHub Pages enabled, `{base_url}/{slug}` serves `index.html`
//! directly, so no central index is involved.

use askama::Template;
use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::{
    ensure_repository, sort_newest_first, LinkPayload, LinkStore, NewLink, PdfViewerPage,
    RedirectPage, RegistryError, RegistryResult, StoredLink,
};
use crate::config::{RegistryLayout, Settings};
use crate::github::{EntryKind, GithubClient, GithubError};
use crate::models::LinkEntry;
use crate::slug::Slug;

/// Page served for the slug.
pub const PAGE_FILE: &str = "index.html";

/// Entry metadata stored next to the page.
pub const META_FILE: &str = "link.json";

/// Hosted PDF filename.
pub const PDF_FILE: &str = "document.pdf";

/// Registry backed by one folder per slug.
pub struct PageStore {
    client: GithubClient,
    settings: Settings,
}

impl PageStore {
    pub fn new(client: GithubClient, settings: Settings) -> Self {
        Self { client, settings }
    }

    fn file_path(slug: &str, file: &str) -> String {
        format!("{}/{}", slug, file)
    }

    /// Read the entry stored in a slug folder.
    async fn read_entry(&self, slug: &str) -> RegistryResult<Option<LinkEntry>> {
        let Some(file) = self.client.get_file(&Self::file_path(slug, META_FILE)).await? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_slice(&file.content)?))
    }

    async fn put_new(&self, slug: &Slug, file: &str, content: &[u8]) -> RegistryResult<()> {
        self.client
            .put_file(
                &Self::file_path(slug.as_str(), file),
                content,
                &format!("Add short link: {}", slug),
                None,
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl LinkStore for PageStore {
    fn layout(&self) -> RegistryLayout {
        RegistryLayout::Pages
    }

    async fn list(&self) -> RegistryResult<Vec<StoredLink>> {
        // An empty repository has no root listing at all
        let Some(root) = self.client.list_directory("").await? else {
            ensure_repository(&self.client).await?;
            return Ok(Vec::new());
        };

        let mut links = Vec::new();
        for dir in root.into_iter().filter(|e| e.kind == EntryKind::Dir) {
            match self.read_entry(&dir.name).await {
                Ok(Some(entry)) => links.push(StoredLink {
                    slug: dir.name,
                    entry,
                }),
                Ok(None) => debug!("Skipping '{}': no {}", dir.name, META_FILE),
                Err(RegistryError::Document(e)) => {
                    warn!("Skipping '{}': unreadable {}: {}", dir.name, META_FILE, e)
                }
                Err(e) => return Err(e),
            }
        }

        sort_newest_first(&mut links);
        Ok(links)
    }

    async fn create(&self, link: NewLink) -> RegistryResult<StoredLink> {
        let NewLink { slug, payload } = link;

        // Any file or folder at the path takes the slug
        if self.client.path_exists(slug.as_str()).await? {
            return Err(RegistryError::DuplicateSlug(slug.to_string()));
        }

        let link_type = payload.link_type();
        let (entry, page) = match payload {
            LinkPayload::Url(url) => {
                let page = RedirectPage {
                    slug: slug.as_str(),
                    target: &url,
                }
                .render()?;
                (LinkEntry::new(url, link_type), page)
            }
            LinkPayload::Pdf(content) => {
                self.put_new(&slug, PDF_FILE, &content).await?;
                let target = format!("{}/{}/{}", self.settings.base_url(), slug, PDF_FILE);
                let page = PdfViewerPage {
                    title: slug.as_str(),
                    pdf_file: PDF_FILE,
                }
                .render()?;
                (LinkEntry::new(target, link_type), page)
            }
        };

        // The page goes last so the link only resolves once everything exists
        let meta = serde_json::to_string_pretty(&entry)?;
        self.put_new(&slug, META_FILE, meta.as_bytes()).await?;
        self.put_new(&slug, PAGE_FILE, page.as_bytes()).await?;

        info!("Created {} page '{}'", link_type.as_str(), slug);
        Ok(StoredLink {
            slug: slug.to_string(),
            entry,
        })
    }

    async fn delete(&self, slug: &Slug, _purge: bool) -> RegistryResult<StoredLink> {
        let not_found = || RegistryError::NotFound(slug.to_string());

        // A plain file at the slug path is not one of our links either
        let files = match self.client.list_directory(slug.as_str()).await {
            Ok(files) => files.ok_or_else(not_found)?,
            Err(GithubError::Decode(_)) => return Err(not_found()),
            Err(e) => return Err(e.into()),
        };
        // Folders without metadata were not created by us
        let entry = self.read_entry(slug.as_str()).await?.ok_or_else(not_found)?;

        let message = format!("Remove short link: {}", slug);
        for file in files.iter().filter(|f| f.kind == EntryKind::File) {
            self.client
                .delete_file(&file.path, &message, &file.sha)
                .await?;
        }

        info!("Deleted page '{}' ({} files)", slug, files.len());
        Ok(StoredLink {
            slug: slug.to_string(),
            entry,
        })
    }
}
