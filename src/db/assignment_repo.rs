use rusqlite::{params, Connection};

use crate::error::ProjassignError;
use crate::models::{Assignment, AssignmentStatus};

const ASSIGNMENT_COLUMNS: &str =
    "id, project_id, student_id, student_name, teacher_id, status, assigned_at, updated_at";

pub fn create_assignment(
    conn: &Connection,
    id: &str,
    project_id: &str,
    student_id: &str,
    student_name: &str,
    teacher_id: &str,
) -> Result<Assignment, ProjassignError> {
    conn.execute(
        "INSERT INTO assignments (id, project_id, student_id, student_name, teacher_id, status)
         VALUES (?1, ?2, ?3, ?4, ?5, 'assigned')",
        params![id, project_id, student_id, student_name, teacher_id],
    )?;
    get_assignment_by_id(conn, id)
}

pub fn get_assignment_by_id(conn: &Connection, id: &str) -> Result<Assignment, ProjassignError> {
    conn.query_row(
        &format!("SELECT {ASSIGNMENT_COLUMNS} FROM assignments WHERE id = ?1"),
        params![id],
        row_to_assignment,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => ProjassignError::assignment_not_found(id),
        _ => ProjassignError::from(e),
    })
}

/// Resolve an assignment by exact ID or ID prefix.
pub fn resolve_assignment(conn: &Connection, reference: &str) -> Result<Assignment, ProjassignError> {
    if let Ok(assignment) = get_assignment_by_id(conn, reference) {
        return Ok(assignment);
    }

    let mut stmt = conn.prepare(&format!(
        "SELECT {ASSIGNMENT_COLUMNS} FROM assignments WHERE id LIKE ?1"
    ))?;
    let prefix = format!("{reference}%");
    let matches: Vec<Assignment> = stmt
        .query_map(params![prefix], row_to_assignment)?
        .collect::<Result<Vec<_>, _>>()?;

    match matches.len() {
        0 => Err(ProjassignError::assignment_not_found(reference)),
        1 => Ok(matches.into_iter().next().unwrap()),
        _ => {
            let candidates: Vec<String> = matches
                .iter()
                .map(|a| format!("{} ({})", a.student_name, a.id))
                .collect();
            Err(ProjassignError::ambiguous_ref(reference, &candidates))
        }
    }
}

pub fn list_assignments(
    conn: &Connection,
    student_id: Option<&str>,
) -> Result<Vec<Assignment>, ProjassignError> {
    match student_id {
        Some(sid) => {
            let sql = format!(
                "SELECT {ASSIGNMENT_COLUMNS} FROM assignments
                 WHERE student_id = ?1 ORDER BY assigned_at DESC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let assignments = stmt
                .query_map(params![sid], row_to_assignment)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(assignments)
        }
        None => {
            let sql = format!(
                "SELECT {ASSIGNMENT_COLUMNS} FROM assignments ORDER BY assigned_at DESC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let assignments = stmt
                .query_map([], row_to_assignment)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(assignments)
        }
    }
}

pub fn update_assignment_status(
    conn: &Connection,
    id: &str,
    status: &AssignmentStatus,
) -> Result<(), ProjassignError> {
    conn.execute(
        "UPDATE assignments SET status = ?1, updated_at = datetime('now') WHERE id = ?2",
        params![status.as_str(), id],
    )?;
    Ok(())
}

fn row_to_assignment(row: &rusqlite::Row) -> rusqlite::Result<Assignment> {
    Ok(Assignment {
        id: row.get(0)?,
        project_id: row.get(1)?,
        student_id: row.get(2)?,
        student_name: row.get(3)?,
        teacher_id: row.get(4)?,
        status: AssignmentStatus::from_str(&row.get::<_, String>(5)?)
            .unwrap_or(AssignmentStatus::Assigned),
        assigned_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}
