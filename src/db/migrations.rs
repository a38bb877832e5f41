use rusqlite::Connection;

use crate::error::ProjassignError;

pub fn run_migrations(conn: &Connection) -> Result<(), ProjassignError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT,
            role TEXT NOT NULL DEFAULT 'student'
                CHECK (role IN ('student', 'teacher')),
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS projects (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT,
            difficulty TEXT,
            duration TEXT,
            start_date TEXT NOT NULL,
            tasks TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS assignments (
            id TEXT PRIMARY KEY,
            project_id TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
            student_id TEXT NOT NULL REFERENCES users(id),
            student_name TEXT NOT NULL,
            teacher_id TEXT NOT NULL REFERENCES users(id),
            status TEXT NOT NULL DEFAULT 'assigned'
                CHECK (status IN ('assigned', 'in_progress', 'completed')),
            assigned_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_users_role ON users(role);
        CREATE INDEX IF NOT EXISTS idx_assignments_student ON assignments(student_id);
        CREATE INDEX IF NOT EXISTS idx_assignments_project ON assignments(project_id);
        ",
    )?;
    Ok(())
}
