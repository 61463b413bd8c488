//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod config_cmd;
mod create;
mod delete;
mod list;
mod slug;
mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use ghlink::config::{load_settings_with_options, LoadOptions, RegistryLayout};

/// Output format for `list`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ListFormat {
    /// Aligned columns with type badges
    #[default]
    Table,
    /// JSON array of links
    Json,
}

#[derive(Parser)]
#[command(name = "ghlink")]
#[command(about = "Short links and hosted PDFs backed by a GitHub repository")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Storage layout in the repository (overrides config)
    #[arg(long, value_enum, global = true)]
    layout: Option<RegistryLayout>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Check the repository connection and token permissions
    Status,

    /// Create a short link that redirects to a URL
    Shorten {
        /// Target URL
        url: String,
        /// Custom slug (random if omitted)
        #[arg(short, long)]
        slug: Option<String>,
    },

    /// Upload a PDF and create a short link to it
    Upload {
        /// PDF file to upload (25 MB max)
        file: PathBuf,
        /// Custom slug (random if omitted)
        #[arg(short, long)]
        slug: Option<String>,
    },

    /// List existing links, newest first
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: ListFormat,
    },

    /// Delete a link
    Delete {
        /// Slug to delete
        slug: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
        /// Also delete the hosted PDF
        #[arg(long)]
        purge: bool,
    },

    /// Sanitize a slug, or generate a random one
    Slug {
        /// Slug to sanitize
        input: Option<String>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show effective settings (token masked)
    Show,

    /// Print the config file path used for writes
    Path,

    /// Set a config value (empty value clears it)
    Set {
        /// Setting name (token, owner, repo, custom_domain, branch, layout, api_url, request_timeout)
        key: String,
        /// New value
        value: String,
    },
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config,
        layout: cli.layout,
    };
    let (settings, config) = load_settings_with_options(&options).await?;

    match cli.command {
        Commands::Status => status::cmd_status(&settings).await,
        Commands::Shorten { url, slug } => {
            create::cmd_shorten(settings, &url, slug.as_deref()).await
        }
        Commands::Upload { file, slug } => {
            create::cmd_upload(settings, &file, slug.as_deref()).await
        }
        Commands::List { format } => list::cmd_list(settings, format).await,
        Commands::Delete { slug, yes, purge } => {
            delete::cmd_delete(settings, &slug, yes, purge).await
        }
        Commands::Slug { input } => slug::cmd_slug(input.as_deref()),
        Commands::Config { command } => match command {
            ConfigCommands::Show => config_cmd::cmd_config_show(&settings, &config),
            ConfigCommands::Path => config_cmd::cmd_config_path(&options, &config),
            ConfigCommands::Set { key, value } => {
                config_cmd::cmd_config_set(&options, config, &key, &value).await
            }
        },
    }
}
