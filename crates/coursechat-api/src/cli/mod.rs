//! CLI command definitions for the `cchat` binary.
//!
//! Uses clap derive macros for argument parsing. Running `cchat` with no
//! subcommand starts the interactive chat.

pub mod ask;
pub mod chat;
pub mod courses;
pub mod session;
pub mod theme;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Ask questions about your course materials.
#[derive(Parser)]
#[command(name = "cchat", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Backend base URL (overrides config.toml and COURSECHAT_BASE_URL).
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat (default).
    Chat,

    /// Ask a single question.
    Ask {
        /// The question.
        query: String,

        /// Continue an existing backend session.
        #[arg(long)]
        session: Option<String>,
    },

    /// List the courses the backend knows about.
    Courses,

    /// Show or toggle the color theme.
    Theme {
        #[command(subcommand)]
        action: Option<theme::ThemeCommand>,
    },

    /// Tell the backend to forget a session.
    #[command(name = "clear-session")]
    ClearSession {
        /// Session id returned by an earlier answer.
        session_id: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
