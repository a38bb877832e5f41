use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::schedule::ScheduledTask;

/// A stored project: descriptive fields plus the dated task schedule computed
/// from its start date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub difficulty: Option<String>,
    /// Overall duration as free text (e.g. "2 weeks"); distinct from the
    /// per-task durations that drive the schedule.
    pub duration: Option<String>,
    pub start_date: NaiveDate,
    pub tasks: Vec<ScheduledTask>,
    pub created_at: String,
}
