//! Main chat loop orchestration.
//!
//! Wires the session controller to the terminal: welcome banner, a
//! `ConversationView` task printing conversation events, and an input loop
//! dispatching slash commands and questions. The controller owns all
//! conversation state; this loop only submits input and reacts to the gate.

use std::sync::Arc;

use console::style;
use tracing::{debug, info};

use coursechat_core::catalog::load_course_summary;
use coursechat_core::chat::ChatController;
use coursechat_core::render::MessageRenderer;
use coursechat_infra::http::HttpChatBackend;

use crate::state::AppState;

use super::banner::{print_course_titles, print_welcome_banner};
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::TerminalFormatter;
use super::view::{ConversationView, format_sources};

/// The controller as wired for the terminal.
pub type TerminalController = ChatController<HttpChatBackend, TerminalFormatter>;

fn prompt(input_enabled: bool) -> String {
    if input_enabled {
        format!("  {} ", style("You >").green().bold())
    } else {
        format!("  {} ", style("... >").dim())
    }
}

/// Run the interactive chat loop until `/exit` or Ctrl+D.
pub async fn run_chat_loop(state: &AppState) -> anyhow::Result<()> {
    let summary = load_course_summary(state.backend.as_ref()).await;
    print_welcome_banner(&state.config.base_url, &summary);

    let formatter = TerminalFormatter::new(state.theme.subscribe());
    let controller: TerminalController = ChatController::new(
        Arc::clone(&state.backend),
        MessageRenderer::new(formatter),
        state.config.welcome_message.clone(),
    );

    let (mut chat_input, writer) = ChatInput::new(prompt(true))
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    // Subscribe before replaying so no event falls between the two.
    let events = controller.subscribe();
    let mut view = ConversationView::new(writer.clone(), state.config.show_sources_expanded);
    view.replay(&controller.rendered_messages());
    let view_task = tokio::spawn(view.run(events));

    let mut gate = controller.input_watch();
    info!(base_url = %state.config.base_url, "Chat started");

    loop {
        let event = tokio::select! {
            event = chat_input.read_line() => event,
            changed = gate.changed() => {
                if changed.is_ok() {
                    let enabled = *gate.borrow_and_update();
                    chat_input.update_prompt(&prompt(enabled));
                }
                continue;
            }
        };

        match event {
            InputEvent::Eof => break,
            InputEvent::Interrupted => {
                println!("  {}", style("Press Ctrl+D to exit, or /new to start over.").dim());
                continue;
            }
            InputEvent::Message(text) => {
                if text.is_empty() {
                    continue;
                }

                if let Some(cmd) = commands::parse(&text) {
                    match cmd {
                        ChatCommand::Help => commands::print_help(),
                        ChatCommand::New => controller.start_new_session(),
                        ChatCommand::Sources => print_last_sources(&controller),
                        ChatCommand::Theme => {
                            let theme = state.theme.toggle().await;
                            println!("\n  {} Theme: {}\n", style("*").cyan().bold(), style(theme).bold());
                        }
                        ChatCommand::Courses => {
                            let summary = load_course_summary(state.backend.as_ref()).await;
                            println!("\n  {}  {}", style("Courses:").bold(), summary.total);
                            print_course_titles(&summary);
                            println!();
                        }
                        ChatCommand::Clear => chat_input.clear(),
                        ChatCommand::Exit => break,
                        ChatCommand::Unknown(cmd_name) => {
                            println!(
                                "\n  {} Unknown command: {}. Type /help for available commands.\n",
                                style("?").yellow().bold(),
                                style(cmd_name).dim()
                            );
                        }
                    }
                    continue;
                }

                if !controller.input_enabled() {
                    println!(
                        "  {} Still waiting for the previous answer. Use /new to start over.",
                        style("!").yellow().bold()
                    );
                    continue;
                }

                // The turn runs on its own task; the view prints the outcome.
                if controller.send_turn(&text).is_none() {
                    debug!("Ignored blank question");
                }
            }
        }
    }

    controller.dispose();
    chat_input.flush();
    drop(controller);
    view_task.abort();
    println!("\n  {}", style("Session ended.").dim());
    Ok(())
}

fn print_last_sources(controller: &TerminalController) {
    match controller
        .last_answer()
        .and_then(|answer| answer.content.sources)
    {
        Some(sources) => println!("\n{}\n", format_sources(&sources, true)),
        None => println!("\n  {}\n", style("No sources for the last answer.").dim()),
    }
}
