//! CLI argument definitions

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "manna")]
#[command(about = "Manage devotions from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List devotions, newest first
    List {
        /// Number of devotions per page
        #[arg(short, long, default_value = "9")]
        limit: usize,
        /// Zero-based page to show
        #[arg(short, long, default_value = "0")]
        page: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one devotion in full
    Show {
        /// Devotion ID or unique ID prefix
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Publish a new devotion
    #[command(alias = "new")]
    Add {
        /// Devotion title
        #[arg(long)]
        title: String,
        /// Verse reference, e.g. "John 6:35"
        #[arg(long)]
        reference: String,
        /// Full verse text
        #[arg(long = "verse", value_name = "TEXT")]
        text: String,
        /// Publication date (YYYY-MM-DD, today when omitted)
        #[arg(long, value_name = "DATE")]
        date: Option<String>,
        /// Rich-text body (HTML); read from piped stdin when omitted
        #[arg(long)]
        content: Option<String>,
    },
    /// Edit an existing devotion
    Edit {
        /// Devotion ID or unique ID prefix
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New verse reference
        #[arg(long)]
        reference: Option<String>,
        /// New verse text
        #[arg(long = "verse", value_name = "TEXT")]
        text: Option<String>,
        /// New publication date (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        date: Option<String>,
        /// New rich-text body (HTML)
        #[arg(long)]
        content: Option<String>,
    },
    /// Delete a devotion
    Delete {
        /// Devotion ID or unique ID prefix
        id: String,
    },
}
