//! Course catalog summary shown on the welcome banner.

use tracing::{debug, warn};

use crate::backend::ChatBackend;

/// Placeholder shown instead of course titles when the stats call fails.
pub const LOAD_FAILED: &str = "Failed to load courses";

/// Course count and titles, or the reason they could not be listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseSummary {
    pub total: u32,
    pub titles: Result<Vec<String>, String>,
}

/// Fetch the course statistics, degrading to an empty summary on failure.
pub async fn load_course_summary<B: ChatBackend>(backend: &B) -> CourseSummary {
    match backend.course_stats().await {
        Ok(stats) => {
            debug!(total = stats.total_courses, "Loaded course stats");
            CourseSummary {
                total: stats.total_courses,
                titles: Ok(stats.course_titles),
            }
        }
        Err(err) => {
            warn!(error = %err, "Failed to load course stats");
            CourseSummary {
                total: 0,
                titles: Err(LOAD_FAILED.to_string()),
            }
        }
    }
}
