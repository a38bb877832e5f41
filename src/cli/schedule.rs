use std::io::{self, Read};

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::ProjassignError;
use crate::output;
use crate::schedule::{schedule_tasks, TaskSpec};

#[derive(Deserialize)]
struct ScheduleInput {
    start_date: Option<String>,
    #[serde(default)]
    tasks: Vec<TaskSpec>,
}

pub fn run(start_date_flag: Option<&str>, json_output: bool) -> i32 {
    let result = run_inner(start_date_flag, json_output);
    match result {
        Ok(code) => code,
        Err(e) => {
            if json_output {
                println!("{}", serde_json::to_string_pretty(&output::json::error(&e)).unwrap());
            } else {
                eprintln!("Error: {}", e.message);
            }
            1
        }
    }
}

fn run_inner(start_date_flag: Option<&str>, json_output: bool) -> Result<i32, ProjassignError> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .map_err(|e| ProjassignError::validation(e.to_string()))?;

    let schedule_input: ScheduleInput = serde_json::from_str(&input)
        .map_err(|e| ProjassignError::validation(format!("Invalid JSON: {e}")))?;

    let start_date = resolve_start_date(start_date_flag, schedule_input.start_date.as_deref())?;
    let scheduled = schedule_tasks(&schedule_input.tasks, start_date);

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(
                output::json::schedule_json(&scheduled)
            ))
            .unwrap()
        );
    } else {
        println!("Schedule from {}:", start_date.format("%Y-%m-%d"));
        output::text::print_schedule(&scheduled);
    }
    Ok(0)
}

/// Pick the project start date: CLI flag wins over the input field; neither
/// present means today. An unparseable date is rejected here, before the
/// scheduler runs.
pub fn resolve_start_date(
    flag: Option<&str>,
    field: Option<&str>,
) -> Result<NaiveDate, ProjassignError> {
    match flag.or(field) {
        Some(s) => parse_start_date(s),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

pub fn parse_start_date(s: &str) -> Result<NaiveDate, ProjassignError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
        ProjassignError::validation(format!("Invalid start date '{s}' (expected YYYY-MM-DD)"))
    })
}
