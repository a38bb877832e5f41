use rusqlite::{params, Connection};

use crate::error::ProjassignError;
use crate::models::{Role, User};

const USER_COLUMNS: &str = "id, name, email, role, created_at";

pub fn create_user(
    conn: &Connection,
    id: &str,
    name: &str,
    email: Option<&str>,
    role: &Role,
) -> Result<User, ProjassignError> {
    conn.execute(
        "INSERT INTO users (id, name, email, role) VALUES (?1, ?2, ?3, ?4)",
        params![id, name, email, role.as_str()],
    )?;
    get_user_by_id(conn, id)
}

pub fn get_user_by_id(conn: &Connection, id: &str) -> Result<User, ProjassignError> {
    conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
        params![id],
        row_to_user,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => ProjassignError::user_not_found(id),
        _ => ProjassignError::from(e),
    })
}

/// List users, optionally filtered by role. This is the directory lookup the
/// assignment flow uses to find students.
pub fn list_users(conn: &Connection, role: Option<&Role>) -> Result<Vec<User>, ProjassignError> {
    match role {
        Some(r) => {
            let sql =
                format!("SELECT {USER_COLUMNS} FROM users WHERE role = ?1 ORDER BY name ASC");
            let mut stmt = conn.prepare(&sql)?;
            let users = stmt
                .query_map(params![r.as_str()], row_to_user)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(users)
        }
        None => {
            let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY name ASC");
            let mut stmt = conn.prepare(&sql)?;
            let users = stmt
                .query_map([], row_to_user)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(users)
        }
    }
}

/// Resolve a user reference: exact ID → ID prefix → name substring.
/// An optional role filter narrows every stage.
pub fn resolve_user(
    conn: &Connection,
    reference: &str,
    role: Option<&Role>,
) -> Result<User, ProjassignError> {
    if let Ok(user) = get_user_by_id(conn, reference) {
        if role.is_none() || role == Some(&user.role) {
            return Ok(user);
        }
    }

    let matches = find_users_like(conn, &format!("{reference}%"), "id", role)?;
    match matches.len() {
        0 => {}
        1 => return Ok(matches.into_iter().next().unwrap()),
        _ => {
            let candidates: Vec<String> =
                matches.iter().map(|u| format!("{} ({})", u.name, u.id)).collect();
            return Err(ProjassignError::ambiguous_ref(reference, &candidates));
        }
    }

    let matches = find_users_like(conn, &format!("%{reference}%"), "name", role)?;
    match matches.len() {
        0 => Err(ProjassignError::user_not_found(reference)),
        1 => Ok(matches.into_iter().next().unwrap()),
        _ => {
            let candidates: Vec<String> =
                matches.iter().map(|u| format!("{} ({})", u.name, u.id)).collect();
            Err(ProjassignError::ambiguous_ref(reference, &candidates))
        }
    }
}

fn find_users_like(
    conn: &Connection,
    pattern: &str,
    column: &str,
    role: Option<&Role>,
) -> Result<Vec<User>, ProjassignError> {
    match role {
        Some(r) => {
            let sql = format!(
                "SELECT {USER_COLUMNS} FROM users WHERE {column} LIKE ?1 AND role = ?2"
            );
            let mut stmt = conn.prepare(&sql)?;
            let users = stmt
                .query_map(params![pattern, r.as_str()], row_to_user)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(users)
        }
        None => {
            let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} LIKE ?1");
            let mut stmt = conn.prepare(&sql)?;
            let users = stmt
                .query_map(params![pattern], row_to_user)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(users)
        }
    }
}

fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        role: Role::from_str(&row.get::<_, String>(3)?).unwrap_or(Role::Student),
        created_at: row.get(4)?,
    })
}
