//! Course catalog command.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use coursechat_core::backend::ChatBackend;

use crate::state::AppState;

/// Print the course statistics as a table, or JSON.
pub async fn list_courses(state: &AppState, json: bool) -> Result<()> {
    let stats = state.backend.course_stats().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    if stats.course_titles.is_empty() {
        println!();
        println!("  {} No courses loaded on {}", style("i").blue().bold(), state.config.base_url);
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("#").fg(Color::White),
        Cell::new("Course").fg(Color::White),
    ]);
    for (index, title) in stats.course_titles.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1).fg(Color::DarkGrey),
            Cell::new(title).fg(Color::Cyan),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!("  {} {} course(s)", style("Total:").bold(), stats.total_courses);
    println!();
    Ok(())
}
