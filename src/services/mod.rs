//! Service layer for ghlink business logic.
//!
//! Input validation and link creation live here, separated from CLI
//! concerns so the registry layer only ever sees checked input.

pub mod links;

pub use links::{
    manual_snippet, validate_pdf, validate_url, CreateOutcome, InputError, LinkError, LinkService,
    MAX_PDF_SIZE,
};
