use crate::config::GalleryConfig;
use crate::utils::error::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "picsum-gallery")]
#[command(about = "Browse the Picsum photo catalogue from the terminal")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override source.api_base
    #[arg(long)]
    pub api_base: Option<String>,

    /// Override source.page_size
    #[arg(long)]
    pub page_size: Option<u32>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List gallery pages, starting from page 1
    List {
        /// Number of pages to load (the first page plus N-1 more)
        #[arg(long, default_value = "1")]
        pages: u32,

        /// Print photos as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one photo's details
    Show {
        id: String,

        #[arg(long)]
        json: bool,
    },
}

impl CliConfig {
    /// File configuration (or defaults) with command line overrides applied.
    pub fn load_config(&self) -> Result<GalleryConfig> {
        let mut config = match &self.config {
            Some(path) => GalleryConfig::from_file(path)?,
            None => GalleryConfig::default(),
        };

        if let Some(api_base) = &self.api_base {
            config.source.api_base = api_base.clone();
        }
        if let Some(page_size) = self.page_size {
            config.source.page_size = page_size;
        }

        Ok(config)
    }
}
