//! Welcome banner display for chat sessions.
//!
//! Prints a styled banner when the chat starts: the backend address and the
//! course catalog summary.

use console::style;
use coursechat_core::catalog::CourseSummary;

/// Print the welcome banner at the start of a chat.
pub fn print_welcome_banner(base_url: &str, summary: &CourseSummary) {
    println!();
    println!("  {} {}", style("*").cyan(), style("Course Materials Assistant").cyan().bold());
    println!("  {}", style(base_url).dim());
    println!();
    println!("  {}  {}", style("Courses:").bold(), summary.total);
    print_course_titles(summary);
    println!();
    println!("  {}", style("Type /help for commands, Ctrl+D to exit").dim());
    println!("  {}", style("---").dim());
}

/// Print the titles line of a summary, or its failure placeholder.
pub fn print_course_titles(summary: &CourseSummary) {
    match &summary.titles {
        Ok(titles) if titles.is_empty() => {
            println!("  {}", style("No courses available").dim());
        }
        Ok(titles) => {
            for title in titles {
                println!("    {} {}", style("-").dim(), title);
            }
        }
        Err(placeholder) => println!("  {}", style(placeholder).yellow()),
    }
}
