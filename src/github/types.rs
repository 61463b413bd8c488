//! GitHub REST API request and response formats.

use serde::{Deserialize, Serialize};

/// Repository permissions granted to the token.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Permissions {
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub push: bool,
    #[serde(default)]
    pub pull: bool,
}

impl Permissions {
    pub fn can_write(&self) -> bool {
        self.push || self.admin
    }
}

/// Subset of `GET /repos/{owner}/{repo}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub full_name: String,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub permissions: Option<Permissions>,
}

impl Repository {
    pub fn can_write(&self) -> bool {
        self.permissions.as_ref().is_some_and(Permissions::can_write)
    }
}

/// Kind of a directory listing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    Submodule,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, Deserialize)]
pub struct DirEntry {
    pub name: String,
    pub path: String,
    pub sha: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

/// A file fetched from the repository, content already decoded.
#[derive(Debug, Clone)]
pub struct RemoteFile {
    pub path: String,
    /// Blob sha, required to update or delete the file.
    pub sha: String,
    pub content: Vec<u8>,
}

/// Raw `GET contents/{path}` response for a file.
#[derive(Debug, Deserialize)]
pub(crate) struct FileResponse {
    pub path: String,
    pub sha: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub encoding: Option<String>,
}

/// `GET contents/{path}` answers with an object for files and an array
/// for directories.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ContentsResponse {
    Directory(Vec<DirEntry>),
    File(FileResponse),
}

/// `PUT contents/{path}` body.
#[derive(Debug, Serialize)]
pub(crate) struct PutFileRequest<'a> {
    pub message: &'a str,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<&'a str>,
}

/// `DELETE contents/{path}` body.
#[derive(Debug, Serialize)]
pub(crate) struct DeleteFileRequest<'a> {
    pub message: &'a str,
    pub sha: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<&'a str>,
}

/// Blob written by a PUT.
#[derive(Debug, Clone, Deserialize)]
pub struct WrittenContent {
    pub path: String,
    pub sha: String,
}

/// Commit created by a write.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitInfo {
    pub sha: String,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// `PUT contents/{path}` response.
#[derive(Debug, Clone, Deserialize)]
pub struct WriteResponse {
    pub content: Option<WrittenContent>,
    pub commit: CommitInfo,
}
