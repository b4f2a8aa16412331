//! Slash command parsing and help for the chat loop.
//!
//! Commands start with `/` and control the session, the theme and the screen.
//! They are handled locally and never reach the backend.

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Start a new session (cancels any pending question).
    New,
    /// Expand the sources of the last answer.
    Sources,
    /// Toggle between the light and dark theme.
    Theme,
    /// Show the course catalog.
    Courses,
    /// Clear the terminal screen.
    Clear,
    /// Exit the chat.
    Exit,
    /// Unknown command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let cmd = trimmed
        .split_whitespace()
        .next()
        .unwrap_or(trimmed)
        .to_lowercase();

    Some(match cmd.as_str() {
        "/help" | "/h" | "/?" => ChatCommand::Help,
        "/new" | "/reset" => ChatCommand::New,
        "/sources" | "/src" => ChatCommand::Sources,
        "/theme" => ChatCommand::Theme,
        "/courses" => ChatCommand::Courses,
        "/clear" | "/cls" => ChatCommand::Clear,
        "/exit" | "/quit" | "/q" => ChatCommand::Exit,
        other => ChatCommand::Unknown(other.to_string()),
    })
}

/// Print the help text listing all available commands.
pub fn print_help() {
    let commands = [
        ("/help", "Show this help message"),
        ("/new", "Start a new session"),
        ("/sources", "List the sources of the last answer"),
        ("/theme", "Toggle light/dark theme"),
        ("/courses", "Show available courses"),
        ("/clear", "Clear the screen"),
        ("/exit", "End the chat"),
    ];

    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    for (name, description) in commands {
        println!("  {:<10} {}", style(name).cyan(), description);
    }
    println!();
    println!(
        "  {}",
        style("Ctrl+D to exit. While an answer is pending only /new starts over.").dim()
    );
    println!();
}
