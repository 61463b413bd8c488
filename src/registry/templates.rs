//! Askama templates for generated pages.
//!
//! Each struct corresponds to an HTML template in the templates/ directory.
//! Interpolated values are HTML-escaped by askama.

use askama::Template;

/// Redirect stub served at `{slug}/index.html`.
#[derive(Template)]
#[template(path = "redirect.html")]
pub struct RedirectPage<'a> {
    pub slug: &'a str,
    pub target: &'a str,
}

/// Viewer page for a hosted PDF, served at `{slug}/index.html`.
#[derive(Template)]
#[template(path = "pdf_viewer.html")]
pub struct PdfViewerPage<'a> {
    pub title: &'a str,
    /// PDF location relative to the page.
    pub pdf_file: &'a str,
}
