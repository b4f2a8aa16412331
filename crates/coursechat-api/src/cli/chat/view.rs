//! Terminal projection of the conversation.
//!
//! `ConversationView` never owns messages. It replays the controller's
//! snapshot once, then prints each `ConversationEvent` as it arrives.

use std::io::Write;
use std::time::Duration;

use console::style;
use coursechat_core::event::ConversationEvent;
use coursechat_core::render::{RenderedMessage, SourcesBlock};
use coursechat_types::chat::{MessageKind, MessageRole};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::renderer::hyperlink;

/// Format a sources block: a summary line, plus one line per entry if expanded.
pub fn format_sources(block: &SourcesBlock, expanded: bool) -> String {
    let mut output = format!(
        "  {}",
        style(format!("Sources ({})", block.count())).dim().bold()
    );
    if expanded {
        for entry in &block.entries {
            let label = match &entry.link {
                Some(url) => hyperlink(&entry.label, url),
                None => entry.label.clone(),
            };
            output.push_str(&format!("\n    {} {label}", style("-").dim()));
        }
    } else if block.count() > 0 {
        output.push_str(&format!(" {}", style("/sources to expand").dim()));
    }
    output
}

/// Format a rendered message for the transcript, or `None` if it has no
/// transcript line (user echoes and loading placeholders).
pub fn format_message(message: &RenderedMessage, expand_sources: bool) -> Option<String> {
    match (message.kind, message.content.role) {
        (MessageKind::Loading, _) | (_, MessageRole::User) => None,
        (MessageKind::Welcome, _) => Some(format!("\n  {}\n", style(&message.content.body).dim())),
        (MessageKind::Standard, MessageRole::Assistant) => {
            let mut output = format!(
                "\n  {}\n{}",
                style("Assistant").cyan().bold(),
                message.content.body.trim_end()
            );
            if let Some(sources) = &message.content.sources {
                output.push('\n');
                output.push_str(&format_sources(sources, expand_sources));
            }
            output.push('\n');
            Some(output)
        }
    }
}

/// Prints conversation events through the readline-safe writer.
pub struct ConversationView<W: Write> {
    writer: W,
    expand_sources: bool,
    spinner: Option<ProgressBar>,
}

impl<W: Write> ConversationView<W> {
    pub fn new(writer: W, expand_sources: bool) -> Self {
        Self {
            writer,
            expand_sources,
            spinner: None,
        }
    }

    /// Print the messages that existed before the view subscribed.
    pub fn replay(&mut self, messages: &[RenderedMessage]) {
        for message in messages {
            self.print_message(message);
        }
    }

    /// Consume events until the bus closes.
    pub async fn run(mut self, mut events: broadcast::Receiver<ConversationEvent>) {
        loop {
            match events.recv().await {
                Ok(event) => self.apply(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Conversation view lagged behind events");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        self.stop_spinner();
    }

    fn apply(&mut self, event: ConversationEvent) {
        match event {
            ConversationEvent::MessageAppended(message) if message.kind == MessageKind::Loading => {
                self.start_spinner();
            }
            ConversationEvent::MessageAppended(message) => self.print_message(&message),
            ConversationEvent::MessageRemoved(_) => self.stop_spinner(),
            ConversationEvent::Cleared => {
                self.stop_spinner();
                self.print(&format!("\n  {}", style("--- new session ---").dim()));
            }
            ConversationEvent::SessionAdopted(session_id) => {
                debug!(session_id = %session_id, "View saw session adoption");
            }
            // The prompt never loses focus in a line-based terminal.
            ConversationEvent::FocusRequested => {}
        }
    }

    fn print_message(&mut self, message: &RenderedMessage) {
        if let Some(text) = format_message(message, self.expand_sources) {
            self.print(&text);
        }
    }

    fn print(&mut self, text: &str) {
        if let Err(err) = writeln!(self.writer, "{text}") {
            warn!(error = %err, "Failed to write to terminal");
        }
    }

    fn start_spinner(&mut self) {
        self.stop_spinner();
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("  {spinner:.cyan} {msg}")
                .expect("spinner template is valid"),
        );
        spinner.set_message("thinking...");
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}
