//! Central index layout: every link lives in `database.json`.
//!
//! PDFs are uploaded to `pdfs/{slug}.pdf` and linked through their raw
//! download URL.

use async_trait::async_trait;
use tracing::{info, warn};

use super::{
    ensure_repository, existing_file_sha, LinkPayload, LinkStore, NewLink, RegistryError,
    RegistryResult, StoredLink,
};
use crate::config::{RegistryLayout, Settings};
use crate::github::GithubClient;
use crate::models::{LinkEntry, LinkType, Registry};
use crate::slug::Slug;

/// Path of the index document.
pub const INDEX_PATH: &str = "database.json";

/// Directory uploaded PDFs are stored in.
pub const PDF_DIR: &str = "pdfs";

/// Registry backed by a single JSON document.
pub struct IndexStore {
    client: GithubClient,
    settings: Settings,
}

impl IndexStore {
    pub fn new(client: GithubClient, settings: Settings) -> Self {
        Self { client, settings }
    }

    fn pdf_name(slug: &Slug) -> String {
        format!("{}.pdf", slug)
    }

    fn pdf_path(slug: &Slug) -> String {
        format!("{}/{}", PDF_DIR, Self::pdf_name(slug))
    }

    /// Fetch the registry and the sha it was read at.
    ///
    /// A missing document means first use, as long as the repository itself
    /// exists: the registry is empty and there is no sha yet.
    pub async fn fetch(&self) -> RegistryResult<(Registry, Option<String>)> {
        if let Some(file) = self.client.get_file(INDEX_PATH).await? {
            let registry = Registry::from_document(&file.content)?;
            return Ok((registry, Some(file.sha)));
        }

        ensure_repository(&self.client).await?;
        info!(
            "{} not found in {}, starting empty",
            INDEX_PATH,
            self.client.full_name()
        );
        Ok((Registry::new(), None))
    }

    /// Write the registry back, passing the sha it was read at.
    pub async fn save(
        &self,
        registry: &Registry,
        sha: Option<&str>,
        message: &str,
    ) -> RegistryResult<()> {
        let document = registry.to_document()?;
        self.client
            .put_file(INDEX_PATH, document.as_bytes(), message, sha)
            .await?;
        Ok(())
    }

    /// Upload a PDF, overwriting a leftover file from a deleted link.
    async fn upload_pdf(&self, slug: &Slug, content: &[u8]) -> RegistryResult<String> {
        let path = Self::pdf_path(slug);
        let existing = existing_file_sha(&self.client, PDF_DIR, &Self::pdf_name(slug)).await?;
        if existing.is_some() {
            warn!("Overwriting unreferenced {}", path);
        }

        self.client
            .put_file(
                &path,
                content,
                &format!("Add PDF: {}", slug),
                existing.as_deref(),
            )
            .await?;
        Ok(self.settings.raw_file_url(&path))
    }

    async fn purge_pdf(&self, slug: &Slug) -> RegistryResult<()> {
        let path = Self::pdf_path(slug);
        match existing_file_sha(&self.client, PDF_DIR, &Self::pdf_name(slug)).await? {
            Some(sha) => {
                self.client
                    .delete_file(&path, &format!("Remove PDF: {}", slug), &sha)
                    .await?
            }
            None => warn!("{} already gone", path),
        }
        Ok(())
    }
}

#[async_trait]
impl LinkStore for IndexStore {
    fn layout(&self) -> RegistryLayout {
        RegistryLayout::Index
    }

    async fn list(&self) -> RegistryResult<Vec<StoredLink>> {
        let (registry, _) = self.fetch().await?;
        let links = registry
            .newest_first()
            .into_iter()
            .map(|(slug, entry)| StoredLink {
                slug: slug.to_string(),
                entry: entry.clone(),
            })
            .collect();
        Ok(links)
    }

    async fn create(&self, link: NewLink) -> RegistryResult<StoredLink> {
        let NewLink { slug, payload } = link;
        let (mut registry, sha) = self.fetch().await?;

        if registry.contains(&slug) {
            return Err(RegistryError::DuplicateSlug(slug.to_string()));
        }

        let link_type = payload.link_type();
        let target = match payload {
            LinkPayload::Url(url) => url,
            LinkPayload::Pdf(content) => self.upload_pdf(&slug, &content).await?,
        };

        let entry = LinkEntry::new(target, link_type);
        registry
            .insert_new(&slug, entry.clone())
            .map_err(|_| RegistryError::DuplicateSlug(slug.to_string()))?;
        self.save(&registry, sha.as_deref(), &format!("Add short link: {}", slug))
            .await?;

        info!("Created {} link '{}'", link_type.as_str(), slug);
        Ok(StoredLink {
            slug: slug.to_string(),
            entry,
        })
    }

    async fn delete(&self, slug: &Slug, purge: bool) -> RegistryResult<StoredLink> {
        let (mut registry, sha) = self.fetch().await?;
        let entry = registry
            .remove(slug)
            .ok_or_else(|| RegistryError::NotFound(slug.to_string()))?;

        self.save(
            &registry,
            sha.as_deref(),
            &format!("Remove short link: {}", slug),
        )
        .await?;

        if purge && entry.link_type == LinkType::Pdf {
            self.purge_pdf(slug).await?;
        }

        info!("Deleted link '{}'", slug);
        Ok(StoredLink {
            slug: slug.to_string(),
            entry,
        })
    }
}
