use serde_json::json;

use crate::cli::commands::AssignmentCommands;
use crate::db::{assignment_repo, connection, user_repo};
use crate::error::ProjassignError;
use crate::models::{AssignmentStatus, Role};
use crate::output;

pub fn run(cmd: AssignmentCommands, json_output: bool) -> i32 {
    let result = match cmd {
        AssignmentCommands::List { student } => run_list(student.as_deref(), json_output),
        AssignmentCommands::Start { reference } => run_transition(&reference, "start", json_output),
        AssignmentCommands::Complete { reference } => {
            run_transition(&reference, "complete", json_output)
        }
    };
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

fn run_list(student_ref: Option<&str>, json_output: bool) -> Result<i32, ProjassignError> {
    let conn = connection::open_db()?;
    let student_id = match student_ref {
        Some(reference) => {
            Some(user_repo::resolve_user(&conn, reference, Some(&Role::Student))?.id)
        }
        None => None,
    };
    let assignments = assignment_repo::list_assignments(&conn, student_id.as_deref())?;

    if json_output {
        let assignments_json: Vec<_> =
            assignments.iter().map(output::json::assignment_json).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "assignments": assignments_json
            })))
            .unwrap()
        );
    } else {
        output::text::print_assignment_list(&assignments);
    }
    Ok(0)
}

fn run_transition(reference: &str, action: &str, json_output: bool) -> Result<i32, ProjassignError> {
    let conn = connection::open_db()?;
    let assignment = assignment_repo::resolve_assignment(&conn, reference)?;

    let new_status = validate_transition(&assignment.status, action)?;
    assignment_repo::update_assignment_status(&conn, &assignment.id, &new_status)?;
    let updated = assignment_repo::get_assignment_by_id(&conn, &assignment.id)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "assignment": output::json::assignment_json(&updated)
            })))
            .unwrap()
        );
    } else {
        println!("Assignment {} → {}", updated.id, updated.status.as_str());
    }
    Ok(0)
}

fn validate_transition(
    current: &AssignmentStatus,
    action: &str,
) -> Result<AssignmentStatus, ProjassignError> {
    match (current, action) {
        (AssignmentStatus::Assigned, "start") => Ok(AssignmentStatus::InProgress),
        (AssignmentStatus::Assigned | AssignmentStatus::InProgress, "complete") => {
            Ok(AssignmentStatus::Completed)
        }
        _ => Err(ProjassignError::invalid_transition(current.as_str(), action)),
    }
}
