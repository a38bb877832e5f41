use serde_json::json;

use crate::cli::commands::UserCommands;
use crate::db::{connection, user_repo};
use crate::error::ProjassignError;
use crate::models::Role;
use crate::output;

pub fn run(cmd: UserCommands, json_output: bool) -> i32 {
    let result = match cmd {
        UserCommands::Add { name, email, role } => {
            run_add(&name, email.as_deref(), &role, json_output)
        }
        UserCommands::List { role } => run_list(role.as_deref(), json_output),
        UserCommands::Use { reference } => run_use(&reference, json_output),
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

fn parse_role(s: &str) -> Result<Role, ProjassignError> {
    Role::from_str(s)
        .ok_or_else(|| ProjassignError::validation(format!("Unknown role '{s}' (student|teacher)")))
}

fn run_add(
    name: &str,
    email: Option<&str>,
    role: &str,
    json_output: bool,
) -> Result<i32, ProjassignError> {
    if name.trim().is_empty() {
        return Err(ProjassignError::validation("User name is required"));
    }
    let role = parse_role(role)?;
    let conn = connection::open_db()?;
    let id = ulid::Ulid::new().to_string();
    let user = user_repo::create_user(&conn, &id, name, email, &role)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "user": output::json::user_json(&user)
            })))
            .unwrap()
        );
    } else {
        println!("Added {}: {} ({})", user.role.as_str(), user.name, user.id);
    }
    Ok(0)
}

fn run_list(role: Option<&str>, json_output: bool) -> Result<i32, ProjassignError> {
    let role = role.map(parse_role).transpose()?;
    let conn = connection::open_db()?;
    let users = user_repo::list_users(&conn, role.as_ref())?;

    if json_output {
        let users_json: Vec<_> = users.iter().map(output::json::user_json).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({ "users": users_json })))
                .unwrap()
        );
    } else {
        output::text::print_user_list(&users);
    }
    Ok(0)
}

fn run_use(reference: &str, json_output: bool) -> Result<i32, ProjassignError> {
    let conn = connection::open_db()?;
    let user = user_repo::resolve_user(&conn, reference, None)?;
    if user.role != Role::Teacher {
        return Err(ProjassignError::validation(format!(
            "{} is not a teacher and cannot assign projects",
            user.name
        )));
    }

    let config_path = connection::config_path()?;
    let config = json!({ "default_teacher_id": user.id });
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ProjassignError::database(e.to_string()))?;
    }
    std::fs::write(&config_path, serde_json::to_string_pretty(&config).unwrap())
        .map_err(|e| ProjassignError::database(e.to_string()))?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "default_teacher": { "id": user.id, "name": user.name }
            })))
            .unwrap()
        );
    } else {
        println!("Default teacher set: {} ({})", user.name, user.id);
    }
    Ok(0)
}

pub fn get_default_teacher_id() -> Option<String> {
    let config_path = connection::config_path().ok()?;
    let content = std::fs::read_to_string(config_path).ok()?;
    let config: serde_json::Value = serde_json::from_str(&content).ok()?;
    config["default_teacher_id"].as_str().map(|s| s.to_string())
}
