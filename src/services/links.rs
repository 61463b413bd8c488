//! Link creation, listing and deletion.
//!
//! Without credentials the service runs in manual mode: URL links are
//! turned into a snippet the user appends to `database.json` by hand,
//! and everything that needs the repository fails with
//! [`InputError::CredentialsRequired`].

use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::config::Settings;
use crate::models::{LinkEntry, LinkType};
use crate::registry::{open_store, LinkPayload, LinkStore, NewLink, RegistryError, StoredLink};
use crate::slug::Slug;
use crate::utils::format_size;

/// Largest PDF accepted for upload (25 MiB).
pub const MAX_PDF_SIZE: u64 = 25 * 1024 * 1024;

const PDF_MIME: &str = "application/pdf";

/// Rejected user input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Enter a URL")]
    EmptyUrl,

    #[error("Invalid URL '{0}'")]
    InvalidUrl(String),

    #[error("Unsupported URL scheme '{0}' (use http or https)")]
    UnsupportedScheme(String),

    #[error("File is too large ({size}); the limit is {limit}", size = format_size(*.0), limit = format_size(MAX_PDF_SIZE))]
    PdfTooLarge(u64),

    #[error("Only PDF files can be uploaded (detected {0})")]
    NotPdf(String),

    #[error("A token, owner and repository are required. Set them with 'ghlink config set'.")]
    CredentialsRequired,
}

/// Errors from link operations.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Failed to read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to build snippet: {0}")]
    Snippet(#[from] serde_json::Error),
}

/// Result of creating a link.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum CreateOutcome {
    /// Written to the repository.
    Created {
        slug: String,
        short_url: String,
        entry: LinkEntry,
    },
    /// No credentials: the user appends `snippet` to `database.json`.
    Manual {
        slug: String,
        short_url: String,
        snippet: String,
    },
}

impl CreateOutcome {
    pub fn short_url(&self) -> &str {
        match self {
            Self::Created { short_url, .. } | Self::Manual { short_url, .. } => short_url,
        }
    }

    pub fn slug(&self) -> &str {
        match self {
            Self::Created { slug, .. } | Self::Manual { slug, .. } => slug,
        }
    }
}

/// Schemes a redirect may point at. Targets end up in generated pages,
/// so `javascript:` and `data:` must never get through.
const ALLOWED_SCHEMES: &[&str] = &["http", "https"];

/// Check a redirect target: non-empty, a parseable absolute URL, and
/// http or https.
pub fn validate_url(input: &str) -> Result<String, InputError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(InputError::EmptyUrl);
    }
    let url = Url::parse(trimmed).map_err(|_| InputError::InvalidUrl(trimmed.to_string()))?;
    if !ALLOWED_SCHEMES.contains(&url.scheme()) {
        return Err(InputError::UnsupportedScheme(url.scheme().to_string()));
    }
    Ok(trimmed.to_string())
}

/// Check PDF content: size limit first, then content sniffing.
pub fn validate_pdf(content: &[u8]) -> Result<(), InputError> {
    let size = content.len() as u64;
    if size > MAX_PDF_SIZE {
        return Err(InputError::PdfTooLarge(size));
    }
    match infer::get(content).map(|kind| kind.mime_type()) {
        Some(PDF_MIME) => Ok(()),
        Some(other) => Err(InputError::NotPdf(other.to_string())),
        None => Err(InputError::NotPdf("unknown type".to_string())),
    }
}

/// Snippet for hand-appending an entry to `database.json`.
///
/// Formatted as one object member with a trailing comma, the way it would
/// sit in the middle of the document.
pub fn manual_snippet(slug: &Slug, entry: &LinkEntry) -> serde_json::Result<String> {
    Ok(format!(
        "{}: {},",
        serde_json::to_string(slug.as_str())?,
        serde_json::to_string_pretty(entry)?
    ))
}

/// Front end to the configured link store.
pub struct LinkService {
    settings: Settings,
    store: Option<Box<dyn LinkStore>>,
}

impl LinkService {
    /// Create a service, opening the store when credentials are set.
    pub fn new(settings: Settings) -> Result<Self, LinkError> {
        let store = if settings.has_credentials() {
            Some(open_store(&settings)?)
        } else {
            debug!("No credentials configured, running in manual mode");
            None
        };
        Ok(Self { settings, store })
    }

    /// Create a service around an existing store.
    pub fn with_store(settings: Settings, store: Box<dyn LinkStore>) -> Self {
        Self {
            settings,
            store: Some(store),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Whether links are written to the repository.
    pub fn is_connected(&self) -> bool {
        self.store.is_some()
    }

    fn store(&self) -> Result<&dyn LinkStore, InputError> {
        self.store.as_deref().ok_or(InputError::CredentialsRequired)
    }

    /// Create a redirect link.
    pub async fn shorten(&self, url: &str, slug: Option<&str>) -> Result<CreateOutcome, LinkError> {
        let target = validate_url(url)?;
        let slug = Slug::resolve(slug);
        let short_url = self.settings.short_url(&slug);

        let Some(store) = self.store.as_deref() else {
            let entry = LinkEntry::new(target, LinkType::Url);
            let snippet = manual_snippet(&slug, &entry)?;
            return Ok(CreateOutcome::Manual {
                slug: slug.to_string(),
                short_url,
                snippet,
            });
        };

        let link = store
            .create(NewLink {
                slug,
                payload: LinkPayload::Url(target),
            })
            .await?;
        Ok(self.created(link))
    }

    /// Upload PDF content as a hosted link.
    pub async fn upload_pdf(
        &self,
        content: Vec<u8>,
        slug: Option<&str>,
    ) -> Result<CreateOutcome, LinkError> {
        let store = self.store()?;
        validate_pdf(&content)?;
        let slug = Slug::resolve(slug);

        info!("Uploading {} PDF as '{}'", format_size(content.len() as u64), slug);
        let link = store
            .create(NewLink {
                slug,
                payload: LinkPayload::Pdf(content),
            })
            .await?;
        Ok(self.created(link))
    }

    /// Read a PDF from disk and upload it.
    pub async fn upload_pdf_file(
        &self,
        path: &Path,
        slug: Option<&str>,
    ) -> Result<CreateOutcome, LinkError> {
        self.store()?;
        let read_error = |source| LinkError::Read {
            path: path.display().to_string(),
            source,
        };

        // Check the size before reading the whole file
        let size = tokio::fs::metadata(path).await.map_err(read_error)?.len();
        if size > MAX_PDF_SIZE {
            return Err(InputError::PdfTooLarge(size).into());
        }
        let content = tokio::fs::read(path).await.map_err(read_error)?;
        self.upload_pdf(content, slug).await
    }

    /// All links, newest first.
    pub async fn list(&self) -> Result<Vec<StoredLink>, LinkError> {
        Ok(self.store()?.list().await?)
    }

    /// Delete a link by slug.
    pub async fn delete(&self, slug: &Slug, purge: bool) -> Result<StoredLink, LinkError> {
        Ok(self.store()?.delete(slug, purge).await?)
    }

    fn created(&self, link: StoredLink) -> CreateOutcome {
        CreateOutcome::Created {
            short_url: self.settings.short_url(&link.slug),
            slug: link.slug,
            entry: link.entry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PDF_HEADER: &[u8] = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3\n1 0 obj\n<<>>\nendobj\n";

    #[test]
    fn test_validate_url() {
        assert_eq!(
            validate_url("  https://example.com/a?b=c  ").unwrap(),
            "https://example.com/a?b=c"
        );
        assert_eq!(validate_url("   "), Err(InputError::EmptyUrl));
        assert!(matches!(
            validate_url("example.com"),
            Err(InputError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_validate_url_rejects_script_schemes() {
        assert_eq!(
            validate_url("javascript:alert(document.cookie)"),
            Err(InputError::UnsupportedScheme("javascript".to_string()))
        );
        assert_eq!(
            validate_url("data:text/html,<script>alert(1)</script>"),
            Err(InputError::UnsupportedScheme("data".to_string()))
        );
        assert_eq!(
            validate_url("HTTP://Example.com/").unwrap(),
            "HTTP://Example.com/"
        );
    }

    #[test]
    fn test_validate_pdf_accepts_pdf() {
        assert!(validate_pdf(PDF_HEADER).is_ok());
    }

    #[test]
    fn test_validate_pdf_rejects_other_types() {
        let png = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
        assert_eq!(
            validate_pdf(png),
            Err(InputError::NotPdf("image/png".to_string()))
        );
        assert!(matches!(
            validate_pdf(b"plain text"),
            Err(InputError::NotPdf(_))
        ));
    }

    #[test]
    fn test_validate_pdf_rejects_oversized() {
        let mut content = PDF_HEADER.to_vec();
        content.resize(MAX_PDF_SIZE as usize + 1, 0);
        assert_eq!(
            validate_pdf(&content),
            Err(InputError::PdfTooLarge(MAX_PDF_SIZE + 1))
        );
    }

    #[test]
    fn test_manual_snippet_format() {
        let created = "2024-01-02T03:04:05Z".parse().unwrap();
        let entry = LinkEntry::with_created("https://example.com", LinkType::Url, created);
        let slug = Slug::parse("promo").unwrap();

        let snippet = manual_snippet(&slug, &entry).unwrap();
        assert!(snippet.starts_with("\"promo\": {\n"));
        assert!(snippet.contains("\"target\": \"https://example.com\""));
        assert!(snippet.contains("\"type\": \"url\""));
        assert!(snippet.ends_with("},"));

        // Parses back once wrapped into a document
        let doc = format!("{{{}}}", snippet.trim_end_matches(','));
        let parsed: serde_json::Value = serde_json::from_str(&doc).unwrap();
        assert_eq!(parsed["promo"]["type"], "url");
    }

    #[tokio::test]
    async fn test_manual_mode_without_credentials() {
        let service = LinkService::new(Settings::default()).unwrap();
        assert!(!service.is_connected());

        let outcome = service
            .shorten("https://example.com", Some("promo"))
            .await
            .unwrap();
        assert!(matches!(outcome, CreateOutcome::Manual { .. }));
        assert_eq!(outcome.slug(), "promo");

        let err = service.upload_pdf(PDF_HEADER.to_vec(), None).await;
        assert!(matches!(
            err,
            Err(LinkError::Input(InputError::CredentialsRequired))
        ));
        assert!(matches!(
            service.list().await,
            Err(LinkError::Input(InputError::CredentialsRequired))
        ));
    }
}
