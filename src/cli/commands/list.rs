//! Link history listing.

use console::style;
use serde::Serialize;

use super::ListFormat;
use crate::cli::icons::warn;
use ghlink::config::Settings;
use ghlink::models::LinkType;
use ghlink::registry::StoredLink;
use ghlink::services::LinkService;
use ghlink::utils::{format_date, truncate};

#[derive(Serialize)]
struct LinkRow<'a> {
    slug: &'a str,
    short_url: String,
    target: &'a str,
    #[serde(rename = "type")]
    link_type: LinkType,
    created: String,
}

/// List links, newest first.
pub async fn cmd_list(settings: Settings, format: ListFormat) -> anyhow::Result<()> {
    let service = LinkService::new(settings)?;
    let links = service.list().await?;

    match format {
        ListFormat::Json => {
            let rows: Vec<LinkRow> = links
                .iter()
                .map(|link| LinkRow {
                    slug: &link.slug,
                    short_url: service.settings().short_url(&link.slug),
                    target: &link.entry.target,
                    link_type: link.entry.link_type,
                    created: link.entry.created.to_rfc3339(),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        ListFormat::Table => print_table(&service, &links),
    }
    Ok(())
}

fn print_table(service: &LinkService, links: &[StoredLink]) {
    if links.is_empty() {
        println!("{} No links yet", warn());
        return;
    }

    println!("\n{}", style("Links").bold());
    println!("{}", "-".repeat(80));
    println!("{:<5} {:<20} {:<11} Short URL", "Type", "Slug", "Created");
    println!("{}", "-".repeat(80));

    for link in links {
        let badge = match link.entry.link_type {
            LinkType::Url => style(link.entry.link_type.badge()).cyan(),
            LinkType::Pdf => style(link.entry.link_type.badge()).magenta(),
        };
        println!(
            "{:<5} {:<20} {:<11} {}",
            badge,
            truncate(&link.slug, 20),
            format_date(&link.entry.created),
            service.settings().short_url(&link.slug)
        );
    }

    println!("\n{} link(s)", links.len());
}
