use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "headlines")]
#[command(about = "A terminal news reader with infinite scroll", long_about = None)]
pub struct Cli {
    /// Search term sent to the article backend
    #[arg(short, long)]
    pub query: Option<String>,

    /// Base URL of the backend proxy (default: http://localhost:8000)
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Session cookie for signed-in features, e.g. "session=abc123"
    #[arg(long, value_name = "COOKIE")]
    pub session: Option<String>,

    /// Custom config directory (default: ~/.config/headlines)
    #[arg(long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Enable verbose logging (prints log path, sets DEBUG level)
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a single page of articles and print it
    Page {
        /// Zero-based page number
        #[arg(default_value_t = 0)]
        page: u32,

        /// Output format (text or json)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
    /// Show the settings file path
    Config {
        /// Write a default settings file if none exists
        #[arg(long)]
        init: bool,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {s}. Use 'text' or 'json'")),
        }
    }
}
