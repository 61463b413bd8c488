//! Shared fixtures for tests against a mock GitHub API.

#![allow(dead_code)]

use ghlink::config::{RegistryLayout, Settings};
use ghlink::github::{encode_content, GithubClient};
use serde_json::{json, Value};

pub const OWNER: &str = "alice";
pub const REPO: &str = "links";
pub const TOKEN: &str = "ghp_test_token";

/// Minimal bytes recognized as a PDF.
pub const PDF_BYTES: &[u8] = b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog >>\nendobj\ntrailer\n%%EOF\n";

pub fn settings(api_url: &str, layout: RegistryLayout) -> Settings {
    Settings {
        token: TOKEN.to_string(),
        owner: OWNER.to_string(),
        repo: REPO.to_string(),
        api_url: api_url.to_string(),
        layout,
        ..Default::default()
    }
}

pub fn client(api_url: &str) -> GithubClient {
    GithubClient::new(&settings(api_url, RegistryLayout::Index)).unwrap()
}

pub fn repo_path() -> String {
    format!("/repos/{}/{}", OWNER, REPO)
}

pub fn contents_path(path: &str) -> String {
    if path.is_empty() {
        format!("{}/contents", repo_path())
    } else {
        format!("{}/contents/{}", repo_path(), path)
    }
}

/// `GET contents/{path}` body for a file, base64-wrapped the way GitHub
/// sends it.
pub fn file_body(path: &str, sha: &str, content: &[u8]) -> String {
    let encoded = encode_content(content);
    let wrapped = encoded
        .as_bytes()
        .chunks(60)
        .map(|c| String::from_utf8_lossy(c).into_owned())
        .collect::<Vec<_>>()
        .join("\n");
    json!({
        "type": "file",
        "name": path.rsplit('/').next().unwrap_or(path),
        "path": path,
        "sha": sha,
        "encoding": "base64",
        "content": format!("{}\n", wrapped),
    })
    .to_string()
}

/// Directory listing entry.
pub fn dir_entry(path: &str, sha: &str, kind: &str) -> Value {
    json!({
        "name": path.rsplit('/').next().unwrap_or(path),
        "path": path,
        "sha": sha,
        "type": kind,
    })
}

/// `PUT contents/{path}` response.
pub fn write_body(path: &str, sha: &str) -> String {
    json!({
        "content": { "path": path, "sha": sha },
        "commit": { "sha": "c0ffee", "html_url": "https://github.com/alice/links/commit/c0ffee" },
    })
    .to_string()
}

pub fn repo_body(push: bool) -> String {
    json!({
        "full_name": format!("{}/{}", OWNER, REPO),
        "default_branch": "main",
        "permissions": { "admin": false, "push": push, "pull": true },
    })
    .to_string()
}

pub fn not_found_body() -> &'static str {
    r#"{"message":"Not Found","documentation_url":"https://docs.github.com/rest"}"#
}
