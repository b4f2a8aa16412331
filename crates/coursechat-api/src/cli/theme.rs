//! Theme preference command.

use anyhow::Result;
use clap::Subcommand;
use console::style;

use crate::state::AppState;

#[derive(Subcommand, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemeCommand {
    /// Show the applied theme.
    #[default]
    Show,
    /// Switch between light and dark and remember the choice.
    Toggle,
}

pub async fn run(state: &AppState, action: ThemeCommand, json: bool) -> Result<()> {
    let theme = match action {
        ThemeCommand::Show => state.theme.current(),
        ThemeCommand::Toggle => state.theme.toggle().await,
    };

    if json {
        println!("{}", serde_json::json!({ "theme": theme.to_string() }));
    } else {
        println!("  {} {}", style("Theme:").bold(), style(theme).cyan());
    }
    Ok(())
}
