use serde_json::{json, Value};

use crate::error::ProjassignError;
use crate::models::{Assignment, Project, User};
use crate::schedule::ScheduledTask;

pub fn success(data: Value) -> Value {
    json!({
        "success": true,
        "data": data
    })
}

pub fn error(err: &ProjassignError) -> Value {
    json!({
        "success": false,
        "error": {
            "code": err.code.as_str(),
            "message": err.message
        }
    })
}

pub fn user_json(u: &User) -> Value {
    json!({
        "id": u.id,
        "name": u.name,
        "email": u.email,
        "role": u.role.as_str(),
        "created_at": u.created_at
    })
}

pub fn scheduled_task_json(t: &ScheduledTask) -> Value {
    let mut v = json!({
        "name": t.name,
        "duration": t.duration,
        "start_date": t.start_date.format("%Y-%m-%d").to_string(),
        "end_date": t.end_date.format("%Y-%m-%d").to_string()
    });
    for (key, value) in &t.extra {
        v[key] = value.clone();
    }
    v
}

pub fn project_summary(p: &Project) -> Value {
    json!({
        "id": p.id,
        "title": p.title,
        "difficulty": p.difficulty,
        "start_date": p.start_date.format("%Y-%m-%d").to_string(),
        "task_count": p.tasks.len()
    })
}

pub fn project_json(p: &Project) -> Value {
    let tasks: Vec<_> = p.tasks.iter().map(scheduled_task_json).collect();
    json!({
        "id": p.id,
        "title": p.title,
        "description": p.description,
        "difficulty": p.difficulty,
        "duration": p.duration,
        "start_date": p.start_date.format("%Y-%m-%d").to_string(),
        "tasks": tasks,
        "created_at": p.created_at
    })
}

pub fn assignment_json(a: &Assignment) -> Value {
    json!({
        "id": a.id,
        "project_id": a.project_id,
        "student_id": a.student_id,
        "student_name": a.student_name,
        "teacher_id": a.teacher_id,
        "status": a.status.as_str(),
        "assigned_at": a.assigned_at,
        "updated_at": a.updated_at
    })
}

pub fn schedule_json(tasks: &[ScheduledTask]) -> Value {
    let tasks: Vec<_> = tasks.iter().map(scheduled_task_json).collect();
    json!({ "tasks": tasks })
}
