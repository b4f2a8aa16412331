//! Backend session management command.

use anyhow::Result;
use console::style;

use coursechat_core::backend::ChatBackend;

use crate::state::AppState;

/// Ask the backend to forget a session and wait for the answer.
pub async fn clear_session(state: &AppState, session_id: &str, json: bool) -> Result<()> {
    state.backend.clear_session(session_id).await?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "status": "success", "session_id": session_id })
        );
    } else {
        println!("  {} Session {} cleared", style("✓").green(), style(session_id).dim());
    }
    Ok(())
}
