//! GitHub REST client for the repository contents API.
//!
//! Only the endpoints the link registry needs are wrapped:
//! - `GET /repos/{owner}/{repo}` for the connection check
//! - `GET/PUT/DELETE /repos/{owner}/{repo}/contents/{path}`
//!
//! Writes are optimistic-locked by blob sha: updating or deleting a file
//! requires the sha it was read with, and GitHub rejects stale ones.

mod content;
mod error;
mod types;

pub use content::{decode_content, encode_content};
pub use error::{GithubError, GithubResult};
pub use types::{
    CommitInfo, DirEntry, EntryKind, Permissions, RemoteFile, Repository, WriteResponse,
    WrittenContent,
};

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::Settings;
use crate::models::ConnectionStatus;
use types::{ContentsResponse, DeleteFileRequest, PutFileRequest};

/// Media type requested from the API.
const ACCEPT: &str = "application/vnd.github.v3+json";

/// User agent sent with every request (GitHub rejects requests without one).
const USER_AGENT: &str = concat!("ghlink/", env!("CARGO_PKG_VERSION"));

/// Client bound to one repository.
#[derive(Clone)]
pub struct GithubClient {
    client: Client,
    api_url: String,
    token: String,
    owner: String,
    repo: String,
    branch: Option<String>,
}

impl GithubClient {
    /// Create a client for the repository named in the settings.
    pub fn new(settings: &Settings) -> GithubResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(settings.request_timeout))
            .build()?;

        Ok(Self {
            client,
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            token: settings.token.clone(),
            owner: settings.owner.clone(),
            repo: settings.repo.clone(),
            branch: settings.branch.clone(),
        })
    }

    /// `owner/repo`.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    fn repo_url(&self) -> String {
        format!("{}/repos/{}/{}", self.api_url, self.owner, self.repo)
    }

    fn contents_url(&self, path: &str) -> String {
        let path = path.trim_matches('/');
        if path.is_empty() {
            format!("{}/contents", self.repo_url())
        } else {
            format!("{}/contents/{}", self.repo_url(), path)
        }
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, ACCEPT)
    }

    /// Attach `?ref=` when a branch is configured.
    fn with_ref(&self, request: RequestBuilder) -> RequestBuilder {
        match self.branch.as_deref() {
            Some(branch) => request.query(&[("ref", branch)]),
            None => request,
        }
    }

    /// Turn a non-success response into a classified error.
    async fn check(response: Response) -> GithubResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        debug!("GitHub API returned {}: {}", status, body);
        Err(GithubError::from_status(status, &body))
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> GithubResult<T> {
        let response = Self::check(request.send().await?).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Fetch repository metadata, including the token's permissions.
    pub async fn get_repository(&self) -> GithubResult<Repository> {
        let url = self.repo_url();
        debug!("GET {}", url);
        Self::send_json(self.request(Method::GET, &url)).await
    }

    /// Check that the repository is reachable and writable with the token.
    pub async fn check_connection(&self) -> ConnectionStatus {
        match self.get_repository().await {
            Ok(repo) if repo.can_write() => {
                info!("Connected to {} with write access", repo.full_name);
                ConnectionStatus::Connected
            }
            Ok(_) => ConnectionStatus::ReadOnly,
            Err(GithubError::NotFound) => ConnectionStatus::RepositoryNotFound,
            Err(GithubError::Unauthorized) => ConnectionStatus::InvalidToken,
            Err(GithubError::Api { status, .. }) => ConnectionStatus::HttpError(status),
            Err(e) => ConnectionStatus::Unreachable(e.to_string()),
        }
    }

    async fn get_contents(&self, path: &str) -> GithubResult<Option<ContentsResponse>> {
        let url = self.contents_url(path);
        debug!("GET {}", url);
        match Self::send_json(self.with_ref(self.request(Method::GET, &url))).await {
            Ok(contents) => Ok(Some(contents)),
            Err(GithubError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Fetch and decode a file. Returns `None` when it does not exist.
    pub async fn get_file(&self, path: &str) -> GithubResult<Option<RemoteFile>> {
        let file = match self.get_contents(path).await? {
            None => return Ok(None),
            Some(ContentsResponse::File(file)) => file,
            Some(ContentsResponse::Directory(_)) => {
                return Err(GithubError::Decode(format!("'{}' is a directory", path)))
            }
        };

        if let Some(encoding) = file.encoding.as_deref().filter(|e| *e != "base64") {
            return Err(GithubError::Decode(format!(
                "'{}' has unsupported encoding '{}'",
                path, encoding
            )));
        }

        Ok(Some(RemoteFile {
            content: decode_content(&file.content)?,
            path: file.path,
            sha: file.sha,
        }))
    }

    /// Whether anything (file or directory) exists at `path`.
    pub async fn path_exists(&self, path: &str) -> GithubResult<bool> {
        Ok(self.get_contents(path).await?.is_some())
    }

    /// List a directory (`""` for the repository root). Returns `None` when
    /// it does not exist.
    pub async fn list_directory(&self, path: &str) -> GithubResult<Option<Vec<DirEntry>>> {
        match self.get_contents(path).await? {
            None => Ok(None),
            Some(ContentsResponse::Directory(entries)) => Ok(Some(entries)),
            Some(ContentsResponse::File(_)) => {
                Err(GithubError::Decode(format!("'{}' is not a directory", path)))
            }
        }
    }

    /// Create or update a file. `sha` must be the current blob sha when the
    /// file already exists.
    pub async fn put_file(
        &self,
        path: &str,
        content: &[u8],
        message: &str,
        sha: Option<&str>,
    ) -> GithubResult<WriteResponse> {
        let url = self.contents_url(path);
        let body = PutFileRequest {
            message,
            content: encode_content(content),
            sha,
            branch: self.branch.as_deref(),
        };

        debug!("PUT {} ({} bytes, sha {:?})", url, content.len(), sha);
        let response: WriteResponse =
            Self::send_json(self.request(Method::PUT, &url).json(&body)).await?;
        info!("Wrote {} in commit {}", path, response.commit.sha);
        Ok(response)
    }

    /// Delete a file at its current blob sha.
    pub async fn delete_file(&self, path: &str, message: &str, sha: &str) -> GithubResult<()> {
        let url = self.contents_url(path);
        let body = DeleteFileRequest {
            message,
            sha,
            branch: self.branch.as_deref(),
        };

        debug!("DELETE {}", url);
        Self::check(self.request(Method::DELETE, &url).json(&body).send().await?).await?;
        info!("Deleted {}", path);
        Ok(())
    }
}
