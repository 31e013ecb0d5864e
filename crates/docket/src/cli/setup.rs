use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "docket", bin_name = "docket", version)]
#[command(about = "A small document store with prefix, author, content and date search", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Store directory (defaults to the user data directory)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub root: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true, help_heading = "Options")]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Save a new document
    #[command(alias = "add")]
    Save(SaveArgs),

    /// Show a document by id
    #[command(alias = "view")]
    Get {
        /// Document id
        id: String,
    },

    /// Search documents
    #[command(alias = "s")]
    Search(SearchArgs),

    /// List all documents
    #[command(alias = "ls")]
    List,

    /// Check metadata and content files against each other
    Check,
}

#[derive(Args, Debug)]
pub struct SaveArgs {
    /// Document title
    #[arg(short, long)]
    pub title: String,

    /// Author id
    #[arg(long, value_name = "ID")]
    pub author_id: String,

    /// Author display name (defaults to the author id)
    #[arg(long, value_name = "NAME")]
    pub author_name: Option<String>,

    /// Requested document id; a new one is generated if it is taken
    #[arg(long)]
    pub id: Option<String>,

    /// Document content (read from stdin when omitted and stdin is piped)
    pub content: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct SearchArgs {
    /// Title prefix (repeatable, any may match)
    #[arg(short, long = "prefix", value_name = "PREFIX")]
    pub prefixes: Vec<String>,

    /// Author id (repeatable, any may match)
    #[arg(short, long = "author", value_name = "ID")]
    pub authors: Vec<String>,

    /// Word the content must contain (repeatable, all must match)
    #[arg(short, long = "contains", value_name = "TEXT")]
    pub contains: Vec<String>,

    /// Only documents created strictly after this time
    #[arg(long, value_name = "TIME", value_parser = parse_time)]
    pub from: Option<DateTime<Utc>>,

    /// Only documents created strictly before this time
    #[arg(long, value_name = "TIME", value_parser = parse_time)]
    pub to: Option<DateTime<Utc>>,
}

/// Accepts `YYYY-MM-DD HH:MM:SS` (UTC) or RFC 3339.
fn parse_time(raw: &str) -> Result<DateTime<Utc>, String> {
    docketapp::model::parse_timestamp(raw)
        .map_err(|_| format!("expected 'YYYY-MM-DD HH:MM:SS' or RFC 3339, got '{}'", raw))
}
