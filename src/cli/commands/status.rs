//! Connection status command.

use console::style;

use crate::cli::icons::{dim_arrow, error, success, warn};
use ghlink::config::Settings;
use ghlink::github::GithubClient;
use ghlink::models::ConnectionStatus;

/// Check the configured repository and report what the token can do.
pub async fn cmd_status(settings: &Settings) -> anyhow::Result<()> {
    let status = if settings.has_credentials() {
        GithubClient::new(settings)?.check_connection().await
    } else {
        ConnectionStatus::NotConfigured
    };

    println!("\n{}", style("ghlink status").bold());
    println!("{}", "-".repeat(40));
    if settings.owner.is_empty() || settings.repo.is_empty() {
        println!("  Repository:  {}", style("(not set)").dim());
    } else {
        println!("  Repository:  {}/{}", settings.owner, settings.repo);
        println!("  Short URLs:  {}", settings.slug_prefix());
    }
    println!("  Layout:      {}", settings.layout.as_str());

    let icon = match status {
        ConnectionStatus::Connected => success(),
        ConnectionStatus::NotConfigured | ConnectionStatus::ReadOnly => warn(),
        _ => error(),
    };
    println!("  Connection:  {} {}", icon, status.label());
    if let Some(hint) = status.hint() {
        println!("  {} {}", dim_arrow(), hint);
    }

    if !status.is_connected() && settings.has_credentials() {
        anyhow::bail!("Repository check failed: {}", status.label());
    }
    Ok(())
}
