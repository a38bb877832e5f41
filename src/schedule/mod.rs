//! Task-date scheduling.
//!
//! Maps an ordered task list and a project start date to concrete start/end
//! dates per task: strictly back-to-back, no gaps, no overlap. Pure
//! computation with no I/O; the CLI owns when to recompute and where the
//! start date comes from.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Upper bound on a single task's normalized duration, roughly 100 years.
/// Keeps the computed ranges far inside what `NaiveDate` can represent.
pub const MAX_DURATION_DAYS: i64 = 36_500;

/// Fields owned by the scheduler; stripped from the pass-through map so a
/// previously scheduled task fed back in cannot carry stale values past the
/// freshly computed ones.
const RESERVED_FIELDS: [&str; 4] = ["name", "duration", "start_date", "end_date"];

/// Raw task input. `duration` stays a raw JSON value so malformed input
/// never fails deserialization; it is normalized at scheduling time.
/// Every field other than `name` and `duration` is carried through to the
/// output unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskSpec {
    pub name: String,
    #[serde(default)]
    pub duration: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A task with its computed date range. `end_date` is inclusive: a one-day
/// task starts and ends on the same day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub name: String,
    pub duration: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Coerce a raw duration value to a positive whole number of days.
///
/// This is the single sanitation rule for task durations: positive numbers
/// are floored to an integer (minimum 1, capped at [`MAX_DURATION_DAYS`]),
/// numeric strings are parsed the same way, and anything else (missing,
/// null, zero, negative, non-numeric) falls back to 1. It never fails, so
/// the scheduler can never produce a zero-length, negative, or
/// unrepresentable date range.
pub fn normalize_duration(raw: &Value) -> i64 {
    let days = match raw {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if days >= 1.0 {
        days.floor().min(MAX_DURATION_DAYS as f64) as i64
    } else {
        1
    }
}

/// Assign start/end dates to `tasks` in order, starting at `start_date`.
///
/// Each task occupies `duration` consecutive days and the next task begins
/// the day after the previous one ends. Output order and length match the
/// input; an empty input yields an empty output. Deterministic for a given
/// input, and inputs are never mutated.
pub fn schedule_tasks(tasks: &[TaskSpec], start_date: NaiveDate) -> Vec<ScheduledTask> {
    let mut cursor = start_date;
    tasks
        .iter()
        .map(|task| {
            let duration = normalize_duration(&task.duration);
            let start = cursor;
            // Saturate at the calendar limit rather than panic; durations are
            // already capped so this only triggers on absurd task counts.
            let end = start
                .checked_add_days(Days::new(duration as u64 - 1))
                .unwrap_or(NaiveDate::MAX);
            cursor = end.checked_add_days(Days::new(1)).unwrap_or(NaiveDate::MAX);
            let mut extra = task.extra.clone();
            for field in RESERVED_FIELDS {
                extra.remove(field);
            }
            ScheduledTask {
                name: task.name.clone(),
                duration,
                start_date: start,
                end_date: end,
                extra,
            }
        })
        .collect()
}
