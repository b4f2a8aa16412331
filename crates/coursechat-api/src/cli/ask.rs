//! One-shot question command.

use std::sync::Arc;

use anyhow::{Result, bail};
use console::style;

use coursechat_core::chat::{InputGate, IssueOutcome, RequestLifecycle};
use coursechat_core::render::MessageRenderer;
use coursechat_types::chat::MessageRole;

use crate::cli::chat::renderer::TerminalFormatter;
use crate::cli::chat::view::format_sources;
use crate::state::AppState;

/// Ask a single question and print the answer, its sources and the session id.
pub async fn ask(state: &AppState, query: &str, session: Option<String>, json: bool) -> Result<()> {
    let query = query.trim();
    if query.is_empty() {
        bail!("question must not be empty");
    }

    let lifecycle = RequestLifecycle::new(Arc::clone(&state.backend), InputGate::new());
    let response = match lifecycle.issue(query, session, |result| result).await {
        IssueOutcome::Settled(result) => result?,
        IssueOutcome::Cancelled => bail!("query was cancelled"),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    let renderer = MessageRenderer::new(TerminalFormatter::new(state.theme.subscribe()));
    let rendered = renderer.render(
        &response.answer,
        MessageRole::Assistant,
        Some(response.sources.as_slice()),
        Some(response.source_links.as_slice()),
    );

    println!();
    println!("{}", rendered.body.trim_end());
    if let Some(sources) = &rendered.sources {
        println!();
        println!("{}", format_sources(sources, true));
    }
    println!();
    println!(
        "  {} {}",
        style("Session:").bold(),
        style(&response.session_id).dim()
    );
    println!();
    Ok(())
}
