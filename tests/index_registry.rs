//! `database.json` registry against a mock API server.

mod common;

use common::*;
use ghlink::config::RegistryLayout;
use ghlink::github::GithubClient;
use ghlink::models::LinkType;
use ghlink::registry::{IndexStore, LinkPayload, LinkStore, NewLink, RegistryError};
use ghlink::services::{CreateOutcome, LinkError, LinkService};
use ghlink::slug::Slug;
use mockito::{Matcher, Server};
use pretty_assertions::assert_eq;
use serde_json::json;

const DATABASE: &str = r#"{
  "older": {
    "target": "https://example.com/old",
    "type": "url",
    "created": "2023-05-01T10:00:00Z"
  },
  "promo": {
    "target": "https://example.com/promo",
    "type": "url",
    "created": "2024-01-15T09:30:00Z",
    "note": "kept"
  }
}"#;

fn store(server: &Server) -> IndexStore {
    let settings = settings(&server.url(), RegistryLayout::Index);
    IndexStore::new(GithubClient::new(&settings).unwrap(), settings)
}

fn new_url_link(slug: &str, url: &str) -> NewLink {
    NewLink {
        slug: Slug::parse(slug).unwrap(),
        payload: LinkPayload::Url(url.to_string()),
    }
}

async fn serve_database(server: &mut Server) -> mockito::Mock {
    server
        .mock("GET", contents_path("database.json").as_str())
        .with_status(200)
        .with_body(file_body("database.json", "db-sha", DATABASE.as_bytes()))
        .create_async()
        .await
}

#[tokio::test]
async fn test_list_newest_first() {
    let mut server = Server::new_async().await;
    let _db = serve_database(&mut server).await;

    let links = store(&server).list().await.unwrap();
    let slugs: Vec<&str> = links.iter().map(|l| l.slug.as_str()).collect();
    assert_eq!(slugs, vec!["promo", "older"]);
    assert_eq!(links[0].entry.extra["note"], "kept");
}

#[tokio::test]
async fn test_create_writes_back_with_sha() {
    let mut server = Server::new_async().await;
    let _db = serve_database(&mut server).await;
    let put = server
        .mock("PUT", contents_path("database.json").as_str())
        .match_body(Matcher::PartialJson(json!({
            "message": "Add short link: launch",
            "sha": "db-sha",
        })))
        .with_status(200)
        .with_body(write_body("database.json", "db-sha-2"))
        .create_async()
        .await;

    let link = store(&server)
        .create(new_url_link("launch", "https://example.com/launch"))
        .await
        .unwrap();

    assert_eq!(link.slug, "launch");
    assert_eq!(link.entry.target, "https://example.com/launch");
    assert_eq!(link.entry.link_type, LinkType::Url);
    put.assert_async().await;
}

#[tokio::test]
async fn test_create_rejects_duplicate_slug() {
    let mut server = Server::new_async().await;
    let _db = serve_database(&mut server).await;
    let put = server
        .mock("PUT", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let err = store(&server)
        .create(new_url_link("promo", "https://example.com/other"))
        .await
        .unwrap_err();

    assert!(matches!(err, RegistryError::DuplicateSlug(ref s) if s == "promo"));
    assert_eq!(
        err.to_string(),
        "\"promo\" is already in use. Choose a different slug."
    );
    put.assert_async().await;
}

#[tokio::test]
async fn test_first_use_starts_empty() {
    let mut server = Server::new_async().await;
    let _missing = server
        .mock("GET", contents_path("database.json").as_str())
        .with_status(404)
        .with_body(not_found_body())
        .create_async()
        .await;
    let _repo = server
        .mock("GET", repo_path().as_str())
        .with_status(200)
        .with_body(repo_body(true))
        .create_async()
        .await;
    let put = server
        .mock("PUT", contents_path("database.json").as_str())
        .match_body(Matcher::PartialJson(json!({
            "message": "Add short link: first",
        })))
        .with_status(201)
        .with_body(write_body("database.json", "db-sha"))
        .create_async()
        .await;

    let store = store(&server);
    assert!(store.list().await.unwrap().is_empty());

    let link = store
        .create(new_url_link("first", "https://example.com"))
        .await
        .unwrap();
    assert_eq!(link.slug, "first");
    put.assert_async().await;
}

#[tokio::test]
async fn test_missing_repository_is_reported() {
    let mut server = Server::new_async().await;
    let _missing = server
        .mock("GET", contents_path("database.json").as_str())
        .with_status(404)
        .create_async()
        .await;
    let _repo = server
        .mock("GET", repo_path().as_str())
        .with_status(404)
        .with_body(not_found_body())
        .create_async()
        .await;

    let err = store(&server).list().await.unwrap_err();
    assert!(matches!(err, RegistryError::RepositoryNotFound));
}

#[tokio::test]
async fn test_invalid_token_is_reported() {
    let mut server = Server::new_async().await;
    let _missing = server
        .mock("GET", contents_path("database.json").as_str())
        .with_status(404)
        .create_async()
        .await;
    let _repo = server
        .mock("GET", repo_path().as_str())
        .with_status(401)
        .create_async()
        .await;

    let err = store(&server).list().await.unwrap_err();
    assert!(matches!(err, RegistryError::InvalidToken));
}

#[tokio::test]
async fn test_upload_pdf_links_raw_url() {
    let mut server = Server::new_async().await;
    let _db = serve_database(&mut server).await;
    let _pdf_dir = server
        .mock("GET", contents_path("pdfs").as_str())
        .with_status(404)
        .create_async()
        .await;
    let pdf = server
        .mock("PUT", contents_path("pdfs/flyer.pdf").as_str())
        .match_body(Matcher::PartialJson(json!({
            "message": "Add PDF: flyer",
        })))
        .with_status(201)
        .with_body(write_body("pdfs/flyer.pdf", "pdf-sha"))
        .create_async()
        .await;
    let db = server
        .mock("PUT", contents_path("database.json").as_str())
        .match_body(Matcher::PartialJson(json!({ "sha": "db-sha" })))
        .with_status(200)
        .with_body(write_body("database.json", "db-sha-2"))
        .create_async()
        .await;

    let link = store(&server)
        .create(NewLink {
            slug: Slug::parse("flyer").unwrap(),
            payload: LinkPayload::Pdf(PDF_BYTES.to_vec()),
        })
        .await
        .unwrap();

    assert_eq!(link.entry.link_type, LinkType::Pdf);
    assert_eq!(
        link.entry.target,
        "https://raw.githubusercontent.com/alice/links/main/pdfs/flyer.pdf"
    );
    pdf.assert_async().await;
    db.assert_async().await;
}

#[tokio::test]
async fn test_delete_url_link_touches_no_files() {
    let mut server = Server::new_async().await;
    let _db = serve_database(&mut server).await;
    let put = server
        .mock("PUT", contents_path("database.json").as_str())
        .match_body(Matcher::PartialJson(json!({
            "message": "Remove short link: promo",
            "sha": "db-sha",
        })))
        .with_status(200)
        .with_body(write_body("database.json", "db-sha-2"))
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let removed = store(&server)
        .delete(&Slug::parse("promo").unwrap(), true)
        .await
        .unwrap();

    // A URL link has no file to purge
    assert_eq!(removed.entry.target, "https://example.com/promo");
    put.assert_async().await;
    delete.assert_async().await;
}

#[tokio::test]
async fn test_delete_pdf_with_purge_removes_file() {
    let mut server = Server::new_async().await;
    let database = json!({
        "flyer": {
            "target": "https://raw.githubusercontent.com/alice/links/main/pdfs/flyer.pdf",
            "type": "pdf",
            "created": "2024-02-01T00:00:00Z",
        }
    });
    let _db = server
        .mock("GET", contents_path("database.json").as_str())
        .with_status(200)
        .with_body(file_body(
            "database.json",
            "db-sha",
            database.to_string().as_bytes(),
        ))
        .create_async()
        .await;
    let put = server
        .mock("PUT", contents_path("database.json").as_str())
        .match_body(Matcher::PartialJson(json!({ "content": "e30=" })))
        .with_status(200)
        .with_body(write_body("database.json", "db-sha-2"))
        .create_async()
        .await;
    let _listing = server
        .mock("GET", contents_path("pdfs").as_str())
        .with_status(200)
        .with_body(json!([dir_entry("pdfs/flyer.pdf", "pdf-sha", "file")]).to_string())
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", contents_path("pdfs/flyer.pdf").as_str())
        .match_body(Matcher::PartialJson(json!({
            "message": "Remove PDF: flyer",
            "sha": "pdf-sha",
        })))
        .with_status(200)
        .with_body(json!({ "commit": { "sha": "c2" } }).to_string())
        .create_async()
        .await;

    let removed = store(&server)
        .delete(&Slug::parse("flyer").unwrap(), true)
        .await
        .unwrap();

    assert_eq!(removed.entry.link_type, LinkType::Pdf);
    put.assert_async().await;
    delete.assert_async().await;
}

#[tokio::test]
async fn test_delete_unknown_slug() {
    let mut server = Server::new_async().await;
    let _db = serve_database(&mut server).await;

    let err = store(&server)
        .delete(&Slug::parse("nope").unwrap(), false)
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::NotFound(ref s) if s == "nope"));
}

#[tokio::test]
async fn test_service_returns_short_url() {
    let mut server = Server::new_async().await;
    let _db = serve_database(&mut server).await;
    let _put = server
        .mock("PUT", contents_path("database.json").as_str())
        .with_status(200)
        .with_body(write_body("database.json", "db-sha-2"))
        .create_async()
        .await;

    let mut settings = settings(&server.url(), RegistryLayout::Index);
    settings.custom_domain = Some("go.example.com".to_string());
    let service = LinkService::new(settings).unwrap();

    let outcome = service
        .shorten("https://example.com/sale", Some("sale!"))
        .await
        .unwrap();
    assert!(matches!(outcome, CreateOutcome::Created { .. }));
    assert_eq!(outcome.slug(), "sale");
    assert_eq!(outcome.short_url(), "https://go.example.com/sale");

    let err = service.shorten("not a url", None).await.unwrap_err();
    assert!(matches!(err, LinkError::Input(_)));
}
