#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::doc_markdown,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::needless_pass_by_value,
    clippy::redundant_closure_for_method_calls,
    clippy::return_self_not_must_use,
    clippy::similar_names,
    clippy::single_match_else,
    clippy::struct_field_names,
    clippy::too_many_lines,
    clippy::uninlined_format_args,
    clippy::cast_precision_loss,
    clippy::unnecessary_wraps
)]

use clap::Subcommand;
use serde::{Deserialize, Serialize};

pub mod classifier;
pub mod config;
pub mod conversation;
pub mod engine;
pub mod mood;
pub mod profile;
pub mod sessions;
pub mod store;
pub(crate) mod util;

pub use config::Config;
pub use engine::Engine;

/// Session history subcommands
#[derive(Subcommand, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum SessionCommands {
    /// List stored sessions, newest first
    List {
        /// Maximum number of sessions to display
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Show the full transcript of one session
    Show {
        /// Session ID (as printed by `sessions list`)
        id: String,
    },
    /// Delete one session from history
    Delete {
        /// Session ID to delete
        id: String,
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Mood history subcommands
#[derive(Subcommand, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum MoodCommands {
    /// Dominant sentiment for each of the last seven days
    Trend {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Count of every recorded sentiment across all history
    Distribution {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Totals across sessions and mood entries
    Summary,
}

/// Display name subcommands
#[derive(Subcommand, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum NameCommands {
    /// Print the stored display name
    Get,
    /// Store a display name used in greetings and replies
    Set {
        /// Name to store (trimmed; blank names are rejected)
        name: String,
    },
}
