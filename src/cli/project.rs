use std::io::{self, Read};

use rusqlite::Connection;
use serde::Deserialize;
use serde_json::json;

use crate::cli::commands::ProjectCommands;
use crate::cli::schedule::resolve_start_date;
use crate::db::{connection, project_repo};
use crate::error::ProjassignError;
use crate::models::Project;
use crate::output;
use crate::schedule::{schedule_tasks, TaskSpec};

pub fn run(cmd: ProjectCommands, json_output: bool) -> i32 {
    let result = match cmd {
        ProjectCommands::Load { start_date } => run_load(start_date.as_deref(), json_output),
        ProjectCommands::List => run_list(json_output),
        ProjectCommands::Show { reference } => run_show(&reference, json_output),
        ProjectCommands::Delete { reference } => run_delete(&reference, json_output),
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

#[derive(Deserialize)]
pub struct ProjectInput {
    pub title: String,
    pub description: Option<String>,
    pub difficulty: Option<String>,
    pub duration: Option<String>,
    pub start_date: Option<String>,
    #[serde(default)]
    pub tasks: Vec<TaskSpec>,
}

pub fn read_project_input() -> Result<ProjectInput, ProjassignError> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .map_err(|e| ProjassignError::validation(e.to_string()))?;

    let project_input: ProjectInput = serde_json::from_str(&input)
        .map_err(|e| ProjassignError::validation(format!("Invalid JSON: {e}")))?;

    if project_input.title.trim().is_empty() {
        return Err(ProjassignError::validation("Project title is required"));
    }
    for task in &project_input.tasks {
        if task.name.trim().is_empty() {
            return Err(ProjassignError::validation("Every task needs a name"));
        }
    }
    Ok(project_input)
}

/// Schedule the input's tasks and insert the project row. Shared with the
/// assign flow, which runs it inside a larger transaction.
pub fn insert_project(
    conn: &Connection,
    input: &ProjectInput,
    start_date_flag: Option<&str>,
) -> Result<Project, ProjassignError> {
    let start_date = resolve_start_date(start_date_flag, input.start_date.as_deref())?;
    let scheduled = schedule_tasks(&input.tasks, start_date);
    let id = ulid::Ulid::new().to_string();
    project_repo::create_project(
        conn,
        &id,
        &input.title,
        input.description.as_deref(),
        input.difficulty.as_deref(),
        input.duration.as_deref(),
        start_date,
        &scheduled,
    )
}

fn run_load(start_date_flag: Option<&str>, json_output: bool) -> Result<i32, ProjassignError> {
    let input = read_project_input()?;
    let conn = connection::open_db()?;
    let project = insert_project(&conn, &input, start_date_flag)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "project": output::json::project_json(&project)
            })))
            .unwrap()
        );
    } else {
        println!("Loaded project: {} ({})", project.title, project.id);
        println!("\nSchedule:");
        output::text::print_schedule(&project.tasks);
    }
    Ok(0)
}

fn run_list(json_output: bool) -> Result<i32, ProjassignError> {
    let conn = connection::open_db()?;
    let projects = project_repo::list_projects(&conn)?;

    if json_output {
        let projects_json: Vec<_> = projects.iter().map(output::json::project_summary).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "projects": projects_json
            })))
            .unwrap()
        );
    } else {
        output::text::print_project_list(&projects);
    }
    Ok(0)
}

fn run_show(reference: &str, json_output: bool) -> Result<i32, ProjassignError> {
    let conn = connection::open_db()?;
    let project = project_repo::resolve_project(&conn, reference)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "project": output::json::project_json(&project)
            })))
            .unwrap()
        );
    } else {
        output::text::print_project(&project);
    }
    Ok(0)
}

fn run_delete(reference: &str, json_output: bool) -> Result<i32, ProjassignError> {
    let conn = connection::open_db()?;
    let project = project_repo::resolve_project(&conn, reference)?;
    project_repo::delete_project(&conn, &project.id)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "deleted": { "id": project.id, "title": project.title }
            })))
            .unwrap()
        );
    } else {
        println!("Deleted project: {} ({})", project.title, project.id);
    }
    Ok(0)
}
