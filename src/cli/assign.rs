use serde_json::json;

use crate::cli::project::{insert_project, read_project_input};
use crate::cli::user::get_default_teacher_id;
use crate::db::{assignment_repo, connection, user_repo};
use crate::error::ProjassignError;
use crate::models::Role;
use crate::output;

pub fn run(
    student_ref: &str,
    teacher_ref: Option<&str>,
    start_date_flag: Option<&str>,
    json_output: bool,
) -> i32 {
    let result = run_inner(student_ref, teacher_ref, start_date_flag, json_output);
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

fn run_inner(
    student_ref: &str,
    teacher_ref: Option<&str>,
    start_date_flag: Option<&str>,
    json_output: bool,
) -> Result<i32, ProjassignError> {
    let input = read_project_input()?;
    let conn = connection::open_db()?;

    // Resolve both parties before any writes to fail fast.
    let student = user_repo::resolve_user(&conn, student_ref, Some(&Role::Student))?;
    let teacher = match teacher_ref {
        Some(reference) => user_repo::resolve_user(&conn, reference, Some(&Role::Teacher))?,
        None => {
            let id = get_default_teacher_id().ok_or_else(ProjassignError::no_teacher)?;
            user_repo::get_user_by_id(&conn, &id)?
        }
    };

    // Project record first, then the assignment referencing its generated id.
    conn.execute_batch("BEGIN IMMEDIATE")?;
    let result = (|| -> Result<_, ProjassignError> {
        let project = insert_project(&conn, &input, start_date_flag)?;
        let assignment_id = ulid::Ulid::new().to_string();
        let assignment = assignment_repo::create_assignment(
            &conn,
            &assignment_id,
            &project.id,
            &student.id,
            student.display_name(),
            &teacher.id,
        )?;
        Ok((project, assignment))
    })();

    let (project, assignment) = match result {
        Ok(created) => {
            conn.execute_batch("COMMIT")?;
            created
        }
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK");
            return Err(e);
        }
    };

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "project": output::json::project_json(&project),
                "assignment": output::json::assignment_json(&assignment)
            })))
            .unwrap()
        );
    } else {
        println!(
            "Assigned '{}' to {} (assignment {})",
            project.title, assignment.student_name, assignment.id
        );
        println!("\nSchedule:");
        output::text::print_schedule(&project.tasks);
    }
    Ok(0)
}
