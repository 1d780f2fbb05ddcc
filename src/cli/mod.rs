//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// navcat - bookmark catalog with portable export/import
#[derive(Parser, Debug)]
#[command(name = "navcat", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database path (default: ~/.navcat/data/navcat.db)
    #[arg(long, global = true, env = "NAVCAT_DB")]
    pub db: Option<PathBuf>,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// SQLite busy timeout in milliseconds
    #[arg(long, global = true, env = "NAVCAT_BUSY_TIMEOUT")]
    pub busy_timeout: Option<u64>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the database and mark it initialized
    Init,

    /// Show database location and record counts
    Status,

    /// Print version information
    Version,

    /// Group management
    Group {
        #[command(subcommand)]
        command: GroupCommands,
    },

    /// Site (bookmark) management
    Site {
        #[command(subcommand)]
        command: SiteCommands,
    },

    /// Key/value configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Export the whole catalog as a JSON envelope
    Export {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Merge an exported envelope into this database
    Import {
        /// Envelope file to read
        file: PathBuf,
    },

    /// Check credentials and print a token
    Login(LoginArgs),

    /// Verify a token
    Verify {
        /// Token returned by `login`
        token: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ============================================================================
// Group Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum GroupCommands {
    /// List groups in display order
    List,

    /// Show one group
    Show {
        /// Group ID
        id: i64,
    },

    /// Create a group
    Add {
        /// Group name (must be unique)
        name: String,

        /// Display position
        #[arg(long, default_value_t = 0)]
        order: i64,
    },

    /// Rename a group
    Rename {
        /// Group ID
        id: i64,

        /// New name
        name: String,
    },

    /// Change a group's display position
    Move {
        /// Group ID
        id: i64,

        /// New position
        order: i64,
    },

    /// Delete a group and all of its sites
    Delete {
        /// Group ID
        id: i64,
    },

    /// Set several positions at once (all or nothing)
    Reorder {
        /// Pairs of ID=ORDER
        #[arg(required = true, value_name = "ID=ORDER")]
        pairs: Vec<String>,
    },
}

// ============================================================================
// Site Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum SiteCommands {
    /// List sites in display order
    List {
        /// Only sites in this group
        #[arg(long)]
        group: Option<i64>,
    },

    /// Show one site
    Show {
        /// Site ID
        id: i64,
    },

    /// Create a site
    Add(SiteAddArgs),

    /// Update fields of a site
    Update(SiteUpdateArgs),

    /// Delete a site
    Delete {
        /// Site ID
        id: i64,
    },

    /// Set several positions at once (all or nothing)
    Reorder {
        /// Pairs of ID=ORDER
        #[arg(required = true, value_name = "ID=ORDER")]
        pairs: Vec<String>,
    },
}

#[derive(Args, Debug)]
pub struct SiteAddArgs {
    /// Owning group ID
    pub group_id: i64,

    /// Display name
    pub name: String,

    /// Target URL (unique within the group)
    pub url: String,

    /// Icon URL or identifier
    #[arg(long, default_value = "")]
    pub icon: String,

    /// Short description
    #[arg(long, default_value = "")]
    pub description: String,

    /// Free-form notes
    #[arg(long, default_value = "")]
    pub notes: String,

    /// Display position
    #[arg(long, default_value_t = 0)]
    pub order: i64,
}

#[derive(Args, Debug)]
pub struct SiteUpdateArgs {
    /// Site ID
    pub id: i64,

    /// Move to another group
    #[arg(long)]
    pub group: Option<i64>,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub url: Option<String>,

    #[arg(long)]
    pub icon: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Display position
    #[arg(long)]
    pub order: Option<i64>,
}

// ============================================================================
// Config Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// List all entries
    List,

    /// Print one value
    Get {
        key: String,
    },

    /// Create or overwrite a value
    Set {
        key: String,
        value: String,
    },

    /// Remove an entry
    Delete {
        key: String,
    },
}

// ============================================================================
// Auth
// ============================================================================

#[derive(Args, Debug)]
pub struct LoginArgs {
    #[arg(long, short)]
    pub username: String,

    #[arg(long, short, env = "NAVCAT_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Issue a 30-day token instead of 24 hours
    #[arg(long)]
    pub remember_me: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_site_add() {
        let cli = Cli::try_parse_from([
            "navcat", "site", "add", "3", "Docs", "https://docs.rs", "--notes", "daily",
        ])
        .unwrap();
        let Commands::Site {
            command: SiteCommands::Add(args),
        } = cli.command
        else {
            panic!("expected site add");
        };
        assert_eq!(args.group_id, 3);
        assert_eq!(args.notes, "daily");
        assert_eq!(args.icon, "");
    }

    #[test]
    fn test_reorder_requires_pairs() {
        assert!(Cli::try_parse_from(["navcat", "group", "reorder"]).is_err());
    }
}
