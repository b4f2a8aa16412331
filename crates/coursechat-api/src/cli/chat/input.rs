//! Async readline input handling for the chat loop.
//!
//! Wraps `rustyline_async::Readline` to provide async line reading with
//! proper handling of EOF (Ctrl+D) and interrupt (Ctrl+C) signals.

use rustyline_async::{Readline, ReadlineError, ReadlineEvent, SharedWriter};

/// Events produced by the input handler.
#[derive(Debug)]
pub enum InputEvent {
    /// User submitted a line (trimmed).
    Message(String),
    /// End of file (Ctrl+D).
    Eof,
    /// Interrupt signal (Ctrl+C).
    Interrupted,
}

/// Async input handler wrapping rustyline_async.
pub struct ChatInput {
    rl: Readline,
}

impl ChatInput {
    /// Create a new chat input handler with the given initial prompt.
    ///
    /// Returns the input handler and a `SharedWriter` that can be used to
    /// print output without interfering with the readline prompt.
    pub fn new(prompt: String) -> Result<(Self, SharedWriter), ReadlineError> {
        let (rl, stdout) = Readline::new(prompt)?;
        Ok((Self { rl }, stdout))
    }

    /// Update the prompt displayed to the user.
    pub fn update_prompt(&mut self, prompt: &str) {
        let _ = self.rl.update_prompt(prompt);
    }

    /// Read a line of input.
    pub async fn read_line(&mut self) -> InputEvent {
        match self.rl.readline().await {
            Ok(ReadlineEvent::Line(line)) => {
                let trimmed = line.trim().to_string();
                if !trimmed.is_empty() {
                    self.rl.add_history_entry(trimmed.clone());
                }
                InputEvent::Message(trimmed)
            }
            Ok(ReadlineEvent::Eof) => InputEvent::Eof,
            Ok(ReadlineEvent::Interrupted) => InputEvent::Interrupted,
            Err(_) => InputEvent::Eof,
        }
    }

    /// Clear the terminal screen.
    pub fn clear(&mut self) {
        let _ = self.rl.clear();
    }

    /// Restore the terminal before exit.
    pub fn flush(&mut self) {
        let _ = self.rl.flush();
    }
}
