//! CLI interface for the resume screener

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resume-screener")]
#[command(about = "Rank job roles against a resume using semantic embeddings")]
#[command(long_about = "Extract text from PDF, Word or plain-text resumes, embed it with a Model2Vec model and rank a catalog of job roles by cosine similarity")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank job roles for a resume
    Rank {
        /// Path to resume file (PDF, DOCX, DOC, TXT)
        #[arg(short, long)]
        resume: PathBuf,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Number of roles to show
        #[arg(short, long)]
        top: Option<usize>,

        /// Role catalog JSON file (overrides configuration)
        #[arg(long)]
        roles: Option<PathBuf>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Include a preview of the extracted text
        #[arg(short, long)]
        detailed: bool,
    },

    /// Print the text extracted from a document
    Extract {
        /// Path to the document
        file: PathBuf,
    },

    /// Role catalog commands
    Roles {
        #[command(subcommand)]
        action: RoleAction,
    },

    /// Embedding model management commands
    Models {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Run the HTTP upload service
    Serve {
        /// Address to bind (overrides configuration)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides configuration)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum RoleAction {
    /// List the roles resumes are ranked against
    List {
        /// Role catalog JSON file (overrides configuration)
        #[arg(long)]
        roles: Option<PathBuf>,
    },

    /// Write the built-in roles to a catalog file for editing
    Init {
        /// Destination file
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum ModelAction {
    /// List known and downloaded embedding models
    List,

    /// Download an embedding model
    Download {
        /// Model name or HuggingFace repo ID (defaults to the configured model)
        model: Option<String>,

        /// Force re-download if model exists
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        "markdown" | "md" => Ok(crate::config::OutputFormat::Markdown),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown", format)),
    }
}
