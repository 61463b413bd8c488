//! ghlink - short links and hosted PDFs backed by a GitHub repository.
//!
//! Every link lives in the user's own repository and is written through the
//! GitHub contents API. Two storage layouts are supported: a central
//! `database.json` index, or one folder of static pages per slug.

pub mod config;
pub mod github;
pub mod models;
pub mod registry;
pub mod services;
pub mod slug;
pub mod utils;
