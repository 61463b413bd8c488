//! Configuration management commands.

use console::style;

use crate::cli::helpers::mask_secret;
use crate::cli::icons::{dim_arrow, success, warn};
use ghlink::config::{Config, LoadOptions, Settings};

/// Show effective settings with the token masked.
pub fn cmd_config_show(settings: &Settings, config: &Config) -> anyhow::Result<()> {
    let or_unset = |value: &str| {
        if value.is_empty() {
            style("(not set)".to_string()).dim()
        } else {
            style(value.to_string())
        }
    };

    println!("\n{}", style("Settings").bold());
    println!("{}", "-".repeat(40));
    println!("  token:           {}", mask_secret(&settings.token));
    println!("  owner:           {}", or_unset(&settings.owner));
    println!("  repo:            {}", or_unset(&settings.repo));
    println!(
        "  custom_domain:   {}",
        or_unset(settings.custom_domain.as_deref().unwrap_or_default())
    );
    println!(
        "  branch:          {}",
        or_unset(settings.branch.as_deref().unwrap_or_default())
    );
    println!("  layout:          {}", settings.layout.as_str());
    println!("  api_url:         {}", settings.api_url);
    println!("  request_timeout: {}s", settings.request_timeout);

    match config.source_path {
        Some(ref path) => println!("\n  {} Loaded from {}", dim_arrow(), path.display()),
        None => println!("\n  {} No config file loaded", dim_arrow()),
    }
    if settings.has_credentials() {
        println!("  {} Short URLs: {}", dim_arrow(), settings.slug_prefix());
    } else {
        println!(
            "  {} Token, owner and repo are required to write links",
            warn()
        );
    }
    Ok(())
}

/// Print the path `config set` writes to.
pub fn cmd_config_path(options: &LoadOptions, config: &Config) -> anyhow::Result<()> {
    let path = options.write_path(config)?;
    println!("{}", path.display());
    Ok(())
}

/// Set a value and save the config file.
pub async fn cmd_config_set(
    options: &LoadOptions,
    mut config: Config,
    key: &str,
    value: &str,
) -> anyhow::Result<()> {
    let path = options.write_path(&config)?;
    config.set(key, value)?;
    config.save_to_path(&path).await?;

    let value = value.trim();
    if value.is_empty() {
        println!("{} Cleared {}", success(), key);
    } else if key == "token" {
        println!("{} Set {} = {}", success(), key, mask_secret(value));
    } else {
        println!("{} Set {} = {}", success(), key, value);
    }
    println!("  {} Saved to {}", dim_arrow(), path.display());
    Ok(())
}
