//! Link deletion command.

use console::style;

use crate::cli::helpers::confirm;
use crate::cli::icons::{dim_arrow, success, warn};
use ghlink::config::{RegistryLayout, Settings};
use ghlink::models::LinkType;
use ghlink::services::LinkService;
use ghlink::slug::Slug;

/// Delete a link after confirmation.
pub async fn cmd_delete(
    settings: Settings,
    slug: &str,
    yes: bool,
    purge: bool,
) -> anyhow::Result<()> {
    let slug = Slug::parse(slug)?;
    let service = LinkService::new(settings)?;

    if !yes && !confirm(&format!("Delete \"{}\"?", style(&slug).yellow()))? {
        println!("{} Cancelled", warn());
        return Ok(());
    }

    let deleted = service.delete(&slug, purge).await?;
    println!("{} Deleted \"{}\"", success(), deleted.slug);

    let keeps_pdf = service.settings().layout == RegistryLayout::Index && !purge;
    if keeps_pdf && deleted.entry.link_type == LinkType::Pdf {
        println!(
            "  {} The PDF file was kept; rerun with --purge or remove it manually",
            dim_arrow()
        );
    }
    Ok(())
}
