use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "notely")]
#[command(about = "Manage notes on a Notely service from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Notes service base URL (overrides NOTELY_API_URL and the profile)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// CLI profile name
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List notes
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        view: ViewArgs,
        /// Only notes tagged with this category (id, id prefix, or name)
        #[arg(short, long, value_name = "CATEGORY")]
        category: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a single note
    Show {
        /// Note ID or unique ID prefix
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new note
    #[command(alias = "new")]
    Add {
        /// Note title
        #[arg(short, long)]
        title: String,
        /// Note content (read from stdin or $EDITOR when omitted)
        content: Vec<String>,
        /// Attach categories (id, id prefix, or name); repeatable
        #[arg(short, long = "category", value_name = "CATEGORY")]
        categories: Vec<String>,
    },
    /// Edit an existing note
    Edit {
        /// Note ID or unique ID prefix
        id: String,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New content; opens $EDITOR when neither --title nor --content is given
        #[arg(short, long)]
        content: Option<String>,
    },
    /// Delete a note permanently
    Delete {
        /// Note ID or unique ID prefix
        id: String,
    },
    /// Move an active note to the archive
    Archive {
        /// Note ID or unique ID prefix
        id: String,
    },
    /// Restore an archived note
    Unarchive {
        /// Note ID or unique ID prefix
        id: String,
    },
    /// Attach a category to a note
    Tag {
        /// Note ID or unique ID prefix
        note: String,
        /// Category id, id prefix, or name
        category: String,
    },
    /// Detach a category from a note
    Untag {
        /// Note ID or unique ID prefix
        note: String,
        /// Category id, id prefix, or name
        category: String,
    },
    /// Manage categories
    #[command(alias = "cat")]
    Categories {
        #[command(subcommand)]
        command: CategoryCommands,
    },
    /// Configure CLI profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

/// Which archive state a listing covers.
#[derive(Args, Clone, Copy, Debug, Default)]
#[group(multiple = false)]
pub struct ViewArgs {
    /// Show archived notes instead of active ones
    #[arg(long)]
    pub archived: bool,
    /// Show active and archived notes together
    #[arg(long)]
    pub all: bool,
}

impl ViewArgs {
    pub const fn archived_filter(self) -> Option<bool> {
        if self.all {
            None
        } else {
            Some(self.archived)
        }
    }
}

#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List categories
    #[command(alias = "ls")]
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a category
    Add {
        /// Category name
        name: String,
        /// Display color as #RRGGBB
        #[arg(long)]
        color: Option<String>,
    },
    /// Rename or recolor a category
    Edit {
        /// Category id, id prefix, or name
        category: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New display color as #RRGGBB
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a category
    Delete {
        /// Category id, id prefix, or name
        category: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update a profile
    Init {
        /// Notes service base URL to store in the profile
        #[arg(long = "url", value_name = "URL")]
        api_base_url: Option<String>,
        /// Request timeout in seconds
        #[arg(long, value_name = "SECS")]
        timeout_secs: Option<u64>,
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
    /// Print the resolved connection settings
    Show,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
