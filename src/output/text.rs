use crate::models::{Assignment, Project, User};
use crate::schedule::ScheduledTask;

pub fn print_user_list(users: &[User]) {
    if users.is_empty() {
        println!("No users found.");
        return;
    }
    for u in users {
        let email = u.email.as_deref().unwrap_or("-");
        println!("  {} ({}) [{}] {}", u.name, &u.id[..8], u.role.as_str(), email);
    }
}

pub fn print_schedule(tasks: &[ScheduledTask]) {
    if tasks.is_empty() {
        println!("No tasks.");
        return;
    }
    for (i, t) in tasks.iter().enumerate() {
        let days = if t.duration == 1 { "day" } else { "days" };
        println!(
            "  {}. {}  {} .. {}  ({} {})",
            i + 1,
            t.name,
            t.start_date.format("%Y-%m-%d"),
            t.end_date.format("%Y-%m-%d"),
            t.duration,
            days
        );
    }
}

pub fn print_project(p: &Project) {
    println!("Project: {} ({})", p.title, p.id);
    if let Some(ref desc) = p.description {
        println!("  Description: {desc}");
    }
    if let Some(ref difficulty) = p.difficulty {
        println!("  Difficulty: {difficulty}");
    }
    if let Some(ref duration) = p.duration {
        println!("  Duration: {duration}");
    }
    println!("  Start date: {}", p.start_date.format("%Y-%m-%d"));
    println!("  Created: {}", p.created_at);
    println!("\nSchedule:");
    print_schedule(&p.tasks);
}

pub fn print_project_list(projects: &[Project]) {
    if projects.is_empty() {
        println!("No projects found.");
        return;
    }
    for p in projects {
        println!(
            "  {} ({}) starts {} - {} tasks",
            p.title,
            &p.id[..8],
            p.start_date.format("%Y-%m-%d"),
            p.tasks.len()
        );
    }
}

pub fn print_assignment_list(assignments: &[Assignment]) {
    if assignments.is_empty() {
        println!("No assignments found.");
        return;
    }
    for a in assignments {
        println!(
            "  [{}] {} -> project {} ({})",
            a.status.as_str(),
            a.student_name,
            &a.project_id[..8],
            &a.id[..8]
        );
    }
}
