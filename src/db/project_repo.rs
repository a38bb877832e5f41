use chrono::NaiveDate;
use rusqlite::{params, Connection};

use crate::error::ProjassignError;
use crate::models::Project;
use crate::schedule::ScheduledTask;

const PROJECT_COLUMNS: &str =
    "id, title, description, difficulty, duration, start_date, tasks, created_at";

pub fn create_project(
    conn: &Connection,
    id: &str,
    title: &str,
    description: Option<&str>,
    difficulty: Option<&str>,
    duration: Option<&str>,
    start_date: NaiveDate,
    tasks: &[ScheduledTask],
) -> Result<Project, ProjassignError> {
    let tasks_json = serde_json::to_string(tasks)
        .map_err(|e| ProjassignError::database(e.to_string()))?;
    conn.execute(
        "INSERT INTO projects (id, title, description, difficulty, duration, start_date, tasks)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            id,
            title,
            description,
            difficulty,
            duration,
            start_date.format("%Y-%m-%d").to_string(),
            tasks_json
        ],
    )?;
    get_project_by_id(conn, id)
}

pub fn get_project_by_id(conn: &Connection, id: &str) -> Result<Project, ProjassignError> {
    let row = conn
        .query_row(
            &format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1"),
            params![id],
            row_to_raw,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => ProjassignError::project_not_found(id),
            _ => ProjassignError::from(e),
        })?;
    raw_to_project(row)
}

/// Resolve a project reference: exact ID → ID prefix → title substring.
pub fn resolve_project(conn: &Connection, reference: &str) -> Result<Project, ProjassignError> {
    if let Ok(project) = get_project_by_id(conn, reference) {
        return Ok(project);
    }

    let matches = find_projects_like(conn, &format!("{reference}%"), "id")?;
    match matches.len() {
        0 => {}
        1 => return Ok(matches.into_iter().next().unwrap()),
        _ => {
            let candidates: Vec<String> =
                matches.iter().map(|p| format!("{} ({})", p.title, p.id)).collect();
            return Err(ProjassignError::ambiguous_ref(reference, &candidates));
        }
    }

    let matches = find_projects_like(conn, &format!("%{reference}%"), "title")?;
    match matches.len() {
        0 => Err(ProjassignError::project_not_found(reference)),
        1 => Ok(matches.into_iter().next().unwrap()),
        _ => {
            let candidates: Vec<String> =
                matches.iter().map(|p| format!("{} ({})", p.title, p.id)).collect();
            Err(ProjassignError::ambiguous_ref(reference, &candidates))
        }
    }
}

pub fn list_projects(conn: &Connection) -> Result<Vec<Project>, ProjassignError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY created_at DESC"
    ))?;
    let rows = stmt
        .query_map([], row_to_raw)?
        .collect::<Result<Vec<_>, _>>()?;
    rows.into_iter().map(raw_to_project).collect()
}

pub fn delete_project(conn: &Connection, id: &str) -> Result<(), ProjassignError> {
    let changed = conn.execute("DELETE FROM projects WHERE id = ?1", params![id])?;
    if changed == 0 {
        return Err(ProjassignError::project_not_found(id));
    }
    Ok(())
}

fn find_projects_like(
    conn: &Connection,
    pattern: &str,
    column: &str,
) -> Result<Vec<Project>, ProjassignError> {
    let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE {column} LIKE ?1");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![pattern], row_to_raw)?
        .collect::<Result<Vec<_>, _>>()?;
    rows.into_iter().map(raw_to_project).collect()
}

type RawProject = (
    String,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    String,
    String,
    String,
);

fn row_to_raw(row: &rusqlite::Row) -> rusqlite::Result<RawProject> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
    ))
}

fn raw_to_project(raw: RawProject) -> Result<Project, ProjassignError> {
    let (id, title, description, difficulty, duration, start_date, tasks_json, created_at) = raw;
    let start_date = NaiveDate::parse_from_str(&start_date, "%Y-%m-%d")
        .map_err(|e| ProjassignError::database(format!("Corrupt start_date for {id}: {e}")))?;
    let tasks: Vec<ScheduledTask> = serde_json::from_str(&tasks_json)
        .map_err(|e| ProjassignError::database(format!("Corrupt tasks for {id}: {e}")))?;
    Ok(Project {
        id,
        title,
        description,
        difficulty,
        duration,
        start_date,
        tasks,
        created_at,
    })
}
