//! Link creation commands.

use std::path::Path;

use console::style;

use crate::cli::icons::{dim_arrow, info, success, warn};
use ghlink::config::Settings;
use ghlink::services::{CreateOutcome, LinkService};

/// Create a redirect link, or print a manual snippet without credentials.
pub async fn cmd_shorten(settings: Settings, url: &str, slug: Option<&str>) -> anyhow::Result<()> {
    let service = LinkService::new(settings)?;
    let outcome = service.shorten(url, slug).await?;
    print_outcome(&outcome);
    Ok(())
}

/// Upload a PDF and link to it.
pub async fn cmd_upload(settings: Settings, file: &Path, slug: Option<&str>) -> anyhow::Result<()> {
    let service = LinkService::new(settings)?;
    println!("{} Uploading {}", info(), file.display());
    let outcome = service.upload_pdf_file(file, slug).await?;
    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &CreateOutcome) {
    match outcome {
        CreateOutcome::Created {
            short_url, entry, ..
        } => {
            println!("{} Created {}", success(), style(short_url).green().bold());
            println!("  {} {}", dim_arrow(), entry.target);
        }
        CreateOutcome::Manual {
            short_url, snippet, ..
        } => {
            println!(
                "{} No token configured. Add this entry to database.json:",
                warn()
            );
            println!("\n{}\n", snippet);
            println!("  Short URL: {}", style(short_url).bold());
        }
    }
}
