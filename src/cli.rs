//! # devjourney CLI
//!
//! Command parsing and the async [`run`] entrypoint shared by `main` and the
//! integration tests. All pipeline logic lives in [`crate::publish`]; this
//! module only wires flags into a [`crate::config::ClientConfig`] and prints
//! user-facing results.
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::load_config::load_config;
use crate::publish::{publish_document, PublishOptions};
use crate::upload::DevJourneyClient;

/// DevJourney CLI: upload markdown entries and their content.
#[derive(Parser)]
#[clap(
    name = "devjourney",
    version,
    about = "Upload markdown journal entries and their linked media to DevJourney"
)]
pub struct Cli {
    /// Your API key (required)
    #[clap(long, global = true)]
    pub api_key: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload a markdown entry and all linked resources
    Upload {
        /// Path to the markdown document
        file: PathBuf,

        /// Base URL of the DevJourney API [env: DEVJOURNEY_API_ROOT]
        #[clap(long)]
        api_root: Option<String>,

        /// Fail when the front matter names a project the key cannot access
        #[clap(long)]
        require_project: bool,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    // clap cannot mark a global flag as required.
    let Some(api_key) = cli.api_key else {
        tracing::error!("No API key supplied");
        anyhow::bail!("required flag --api-key not set");
    };

    match cli.command {
        Commands::Upload {
            file,
            api_root,
            require_project,
        } => {
            if !file.is_file() {
                tracing::error!(path = %file.display(), "Document does not exist");
                anyhow::bail!("file does not exist: {}", file.display());
            }
            let config = load_config(&api_key, api_root.as_deref())?;
            let client = DevJourneyClient::new(config)?;
            let options = PublishOptions { require_project };

            println!("Processing file: {}", file.display());
            match publish_document(&file, &client, &options).await {
                Ok(report) => {
                    tracing::info!(command = "upload", ?report, "Upload complete");
                    for asset in &report.uploaded {
                        println!("Uploaded {} -> {}", asset.reference.path, asset.remote_uri);
                    }
                    for reference in &report.skipped {
                        println!("File not found, left unchanged: {}", reference.path);
                    }
                    println!("Entry created successfully with ID: {}", report.entry_id);
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "upload", error = %e, "Upload failed");
                    Err(anyhow::Error::new(e))
                }
            }
        }
    }
}
