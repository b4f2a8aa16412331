//! coursechat CLI entry point.
//!
//! Binary name: `cchat`
//!
//! Parses CLI arguments, sets up tracing, wires the application state and
//! dispatches to the command handler. With no subcommand it starts the
//! interactive chat.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use coursechat_infra::filesystem::{log_file_path, resolve_data_dir};
use coursechat_observe::tracing_setup::{
    LogTarget, TracingOptions, init_tracing, level_for_verbosity, shutdown_tracing,
};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need app state
    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "cchat", &mut std::io::stdout());
        return Ok(());
    }

    let data_dir = resolve_data_dir();
    let command = cli.command.unwrap_or(Commands::Chat);

    // The chat loop owns the terminal, so its logs go to a file.
    let level = if cli.quiet && cli.verbose == 0 {
        "error"
    } else {
        level_for_verbosity(cli.verbose)
    };
    let target = match command {
        Commands::Chat => LogTarget::File(log_file_path(&data_dir)),
        _ => LogTarget::Stderr,
    };
    init_tracing(
        TracingOptions::new(level)
            .with_target(target)
            .with_otel(cli.otel),
    )
    .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    let state = AppState::init(data_dir, cli.base_url).await?;

    let result = match command {
        Commands::Chat => cli::chat::loop_runner::run_chat_loop(&state).await,
        Commands::Ask { query, session } => cli::ask::ask(&state, &query, session, cli.json).await,
        Commands::Courses => cli::courses::list_courses(&state, cli.json).await,
        Commands::Theme { action } => {
            cli::theme::run(&state, action.unwrap_or_default(), cli.json).await
        }
        Commands::ClearSession { session_id } => {
            cli::session::clear_session(&state, &session_id, cli.json).await
        }
        Commands::Completions { .. } => unreachable!("handled above"),
    };

    shutdown_tracing();
    result
}
