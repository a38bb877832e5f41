#[allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

// ─── helpers ───────────────────────────────────────────────────────

struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        let dir = TempDir::new().expect("create tempdir");
        std::process::Command::new("git")
            .args(["init"])
            .current_dir(dir.path())
            .output()
            .expect("git init");
        Self { dir }
    }

    /// A tempdir without `git init`, for commands that need no repository.
    fn bare() -> Self {
        let dir = TempDir::new().expect("create tempdir");
        Self { dir }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("projassign").expect("binary");
        cmd.current_dir(self.dir.path());
        cmd
    }

    fn run_json(&self, args: &[&str]) -> Value {
        let mut a: Vec<&str> = args.to_vec();
        a.push("--json");
        let output = self.cmd().args(&a).output().expect("run");
        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(&stdout)
            .unwrap_or_else(|e| panic!("parse JSON failed: {e}\nstdout: {stdout}"))
    }

    fn run_ok(&self, args: &[&str]) -> Value {
        let v = self.run_json(args);
        assert_eq!(v["success"], true, "expected success=true: {v}");
        v
    }

    fn run_err(&self, args: &[&str]) -> Value {
        let v = self.run_json(args);
        assert_eq!(v["success"], false, "expected success=false: {v}");
        v
    }

    fn run_json_stdin(&self, args: &[&str], content: &str) -> Value {
        let p = self.write_input("_input.json", content);
        let mut a: Vec<&str> = args.to_vec();
        a.push("--json");
        let output = self
            .cmd()
            .args(&a)
            .pipe_stdin(&p)
            .unwrap()
            .output()
            .expect("run with stdin");
        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(&stdout)
            .unwrap_or_else(|e| panic!("parse JSON failed: {e}\nstdout: {stdout}"))
    }

    fn run_ok_stdin(&self, args: &[&str], content: &str) -> Value {
        let v = self.run_json_stdin(args, content);
        assert_eq!(v["success"], true, "expected success=true: {v}");
        v
    }

    fn run_err_stdin(&self, args: &[&str], content: &str) -> Value {
        let v = self.run_json_stdin(args, content);
        assert_eq!(v["success"], false, "expected success=false: {v}");
        v
    }

    fn write_input(&self, filename: &str, content: &str) -> PathBuf {
        let p = self.dir.path().join(filename);
        fs::write(&p, content).expect("write input file");
        p
    }

    fn add_user(&self, name: &str, role: &str) -> String {
        let v = self.run_ok(&["user", "add", name, "--role", role]);
        v["data"]["user"]["id"].as_str().unwrap().to_string()
    }
}

fn project_idea_json() -> String {
    serde_json::json!({
        "title": "Weather Station",
        "description": "Build a small weather station",
        "difficulty": "intermediate",
        "duration": "2 weeks",
        "tasks": [
            {"name": "Research sensors", "duration": 3},
            {"name": "Wire the board", "duration": 4},
            {"name": "Write firmware", "duration": 5},
            {"name": "Present results", "duration": 1}
        ]
    })
    .to_string()
}

// ─── 1. init ───────────────────────────────────────────────────────

#[test]
fn test_init() {
    let env = TestEnv::new();
    let v = env.run_ok(&["init"]);
    let path = v["data"]["path"].as_str().unwrap();
    assert!(path.ends_with(".projassign/projassign.db"));
    assert!(PathBuf::from(path).exists());
}

#[test]
fn test_init_idempotent() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    let v = env.run_ok(&["init"]);
    assert!(v["data"]["path"].as_str().unwrap().contains("projassign.db"));
}

#[test]
fn test_init_required_before_db_commands() {
    let env = TestEnv::new();
    let v = env.run_err(&["user", "list"]);
    assert_eq!(v["error"]["code"], "NOT_INITIALIZED");
}

// ─── 2. user directory ─────────────────────────────────────────────

#[test]
fn test_user_add_and_list() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    env.add_user("Ada Lovelace", "student");
    env.add_user("Charles Babbage", "teacher");

    let v = env.run_ok(&["user", "list"]);
    let users = v["data"]["users"].as_array().unwrap();
    assert_eq!(users.len(), 2);
}

#[test]
fn test_user_list_role_filter() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    env.add_user("Ada", "student");
    env.add_user("Grace", "student");
    env.add_user("Charles", "teacher");

    let v = env.run_ok(&["user", "list", "--role", "student"]);
    let users = v["data"]["users"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    for u in users {
        assert_eq!(u["role"], "student");
    }
}

#[test]
fn test_user_add_rejects_unknown_role() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    let v = env.run_err(&["user", "add", "Ada", "--role", "admin"]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
}

#[test]
fn test_user_use_sets_default_teacher() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    let teacher_id = env.add_user("Charles", "teacher");
    let v = env.run_ok(&["user", "use", "Charles"]);
    assert_eq!(v["data"]["default_teacher"]["id"], Value::String(teacher_id));
}

#[test]
fn test_user_use_rejects_student() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    env.add_user("Ada", "student");
    let v = env.run_err(&["user", "use", "Ada"]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
}

#[test]
fn test_ambiguous_user_reference() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    env.add_user("anna smith", "student");
    env.add_user("annabel jones", "student");
    let v = env.run_err(&["user", "use", "anna"]);
    assert_eq!(v["error"]["code"], "AMBIGUOUS_REF");
}

// ─── 3. schedule (pure preview) ────────────────────────────────────

#[test]
fn test_schedule_worked_example() {
    let env = TestEnv::bare();
    let input = serde_json::json!({
        "tasks": [
            {"name": "A", "duration": 3},
            {"name": "B", "duration": 1},
            {"name": "C", "duration": 0}
        ]
    })
    .to_string();
    let v = env.run_ok_stdin(&["schedule", "--start-date", "2024-01-01"], &input);
    let tasks = v["data"]["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 3);
    assert_eq!(tasks[0]["start_date"], "2024-01-01");
    assert_eq!(tasks[0]["end_date"], "2024-01-03");
    assert_eq!(tasks[1]["start_date"], "2024-01-04");
    assert_eq!(tasks[1]["end_date"], "2024-01-04");
    // duration 0 normalized to 1
    assert_eq!(tasks[2]["start_date"], "2024-01-05");
    assert_eq!(tasks[2]["end_date"], "2024-01-05");
    assert_eq!(tasks[2]["duration"], 1);
}

#[test]
fn test_schedule_empty_tasks() {
    let env = TestEnv::bare();
    let v = env.run_ok_stdin(&["schedule", "--start-date", "2024-01-01"], r#"{"tasks":[]}"#);
    assert_eq!(v["data"]["tasks"].as_array().unwrap().len(), 0);
}

#[test]
fn test_schedule_absent_tasks_treated_as_empty() {
    let env = TestEnv::bare();
    let v = env.run_ok_stdin(&["schedule", "--start-date", "2024-01-01"], "{}");
    assert_eq!(v["data"]["tasks"].as_array().unwrap().len(), 0);
}

#[test]
fn test_schedule_uses_start_date_field() {
    let env = TestEnv::bare();
    let input = serde_json::json!({
        "start_date": "2024-06-10",
        "tasks": [{"name": "A", "duration": 2}]
    })
    .to_string();
    let v = env.run_ok_stdin(&["schedule"], &input);
    assert_eq!(v["data"]["tasks"][0]["start_date"], "2024-06-10");
    assert_eq!(v["data"]["tasks"][0]["end_date"], "2024-06-11");
}

#[test]
fn test_schedule_flag_overrides_field() {
    let env = TestEnv::bare();
    let input = serde_json::json!({
        "start_date": "2024-06-10",
        "tasks": [{"name": "A", "duration": 1}]
    })
    .to_string();
    let v = env.run_ok_stdin(&["schedule", "--start-date", "2024-07-01"], &input);
    assert_eq!(v["data"]["tasks"][0]["start_date"], "2024-07-01");
}

#[test]
fn test_schedule_rejects_invalid_date() {
    let env = TestEnv::bare();
    let v = env.run_err_stdin(
        &["schedule", "--start-date", "not-a-date"],
        r#"{"tasks":[{"name":"A","duration":1}]}"#,
    );
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
}

#[test]
fn test_schedule_passes_extra_fields_through() {
    let env = TestEnv::bare();
    let input = serde_json::json!({
        "tasks": [{"name": "A", "duration": 2, "hint": "read the docs", "weight": 5}]
    })
    .to_string();
    let v = env.run_ok_stdin(&["schedule", "--start-date", "2024-01-01"], &input);
    assert_eq!(v["data"]["tasks"][0]["hint"], "read the docs");
    assert_eq!(v["data"]["tasks"][0]["weight"], 5);
}

#[test]
fn test_schedule_recomputes_previously_dated_tasks() {
    let env = TestEnv::bare();
    let input = serde_json::json!({
        "tasks": [
            {"name": "A", "duration": 3, "start_date": "2024-01-01", "end_date": "2024-01-03"},
            {"name": "B", "duration": 2, "start_date": "2024-01-04", "end_date": "2024-01-05"}
        ]
    })
    .to_string();
    let v = env.run_ok_stdin(&["schedule", "--start-date", "2024-06-01"], &input);
    let tasks = v["data"]["tasks"].as_array().unwrap();
    assert_eq!(tasks[0]["start_date"], "2024-06-01");
    assert_eq!(tasks[0]["end_date"], "2024-06-03");
    assert_eq!(tasks[1]["start_date"], "2024-06-04");
    assert_eq!(tasks[1]["end_date"], "2024-06-05");
}

#[test]
fn test_schedule_normalizes_malformed_durations() {
    let env = TestEnv::bare();
    let input = serde_json::json!({
        "tasks": [
            {"name": "A", "duration": -3},
            {"name": "B", "duration": "abc"},
            {"name": "C"},
            {"name": "D", "duration": null}
        ]
    })
    .to_string();
    let v = env.run_ok_stdin(&["schedule", "--start-date", "2024-01-01"], &input);
    let tasks = v["data"]["tasks"].as_array().unwrap();
    for (i, t) in tasks.iter().enumerate() {
        assert_eq!(t["duration"], 1, "task {i} should normalize to 1 day");
        assert_eq!(t["start_date"], t["end_date"]);
    }
    // Strictly back-to-back: 4 one-day tasks span Jan 1-4.
    assert_eq!(tasks[3]["end_date"], "2024-01-04");
}

#[test]
fn test_schedule_text_output() {
    let env = TestEnv::bare();
    let p = env.write_input(
        "_input.json",
        r#"{"tasks":[{"name":"Research","duration":3}]}"#,
    );
    env.cmd()
        .args(["schedule", "--start-date", "2024-01-01"])
        .pipe_stdin(&p)
        .unwrap()
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-01-01 .. 2024-01-03"));
}

// ─── 4. project store ──────────────────────────────────────────────

#[test]
fn test_project_load_and_show() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    let v = env.run_ok_stdin(
        &["project", "load", "--start-date", "2024-03-01"],
        &project_idea_json(),
    );
    let id = v["data"]["project"]["id"].as_str().unwrap().to_string();

    let v = env.run_ok(&["project", "show", &id]);
    let project = &v["data"]["project"];
    assert_eq!(project["title"], "Weather Station");
    assert_eq!(project["start_date"], "2024-03-01");
    let tasks = project["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 4);
    // 3 + 4 + 5 + 1 days, back-to-back from March 1.
    assert_eq!(tasks[0]["start_date"], "2024-03-01");
    assert_eq!(tasks[0]["end_date"], "2024-03-03");
    assert_eq!(tasks[1]["start_date"], "2024-03-04");
    assert_eq!(tasks[3]["start_date"], "2024-03-13");
    assert_eq!(tasks[3]["end_date"], "2024-03-13");
}

#[test]
fn test_project_load_requires_title() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    let v = env.run_err_stdin(&["project", "load"], r#"{"tasks":[]}"#);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
}

#[test]
fn test_project_list_and_delete() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    env.run_ok_stdin(
        &["project", "load", "--start-date", "2024-03-01"],
        &project_idea_json(),
    );

    let v = env.run_ok(&["project", "list"]);
    assert_eq!(v["data"]["projects"].as_array().unwrap().len(), 1);

    env.run_ok(&["project", "delete", "Weather"]);
    let v = env.run_ok(&["project", "list"]);
    assert_eq!(v["data"]["projects"].as_array().unwrap().len(), 0);
}

#[test]
fn test_project_show_unknown_reference() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    let v = env.run_err(&["project", "show", "nope"]);
    assert_eq!(v["error"]["code"], "PROJECT_NOT_FOUND");
}

// ─── 5. assign workflow ────────────────────────────────────────────

#[test]
fn test_assign_creates_project_and_assignment() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    let student_id = env.add_user("Ada", "student");
    let teacher_id = env.add_user("Charles", "teacher");

    let v = env.run_ok_stdin(
        &[
            "assign",
            "--student",
            "Ada",
            "--teacher",
            "Charles",
            "--start-date",
            "2024-03-01",
        ],
        &project_idea_json(),
    );
    let project_id = v["data"]["project"]["id"].as_str().unwrap();
    let assignment = &v["data"]["assignment"];
    assert_eq!(assignment["project_id"], Value::String(project_id.into()));
    assert_eq!(assignment["student_id"], Value::String(student_id));
    assert_eq!(assignment["student_name"], "Ada");
    assert_eq!(assignment["teacher_id"], Value::String(teacher_id));
    assert_eq!(assignment["status"], "assigned");

    // Both records persisted.
    let v = env.run_ok(&["project", "show", project_id]);
    assert_eq!(v["data"]["project"]["tasks"].as_array().unwrap().len(), 4);
    let v = env.run_ok(&["assignment", "list"]);
    assert_eq!(v["data"]["assignments"].as_array().unwrap().len(), 1);
}

#[test]
fn test_assign_uses_default_teacher() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    env.add_user("Ada", "student");
    let teacher_id = env.add_user("Charles", "teacher");
    env.run_ok(&["user", "use", "Charles"]);

    let v = env.run_ok_stdin(
        &["assign", "--student", "Ada", "--start-date", "2024-03-01"],
        &project_idea_json(),
    );
    assert_eq!(v["data"]["assignment"]["teacher_id"], Value::String(teacher_id));
}

#[test]
fn test_assign_without_teacher_fails() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    env.add_user("Ada", "student");
    let v = env.run_err_stdin(
        &["assign", "--student", "Ada", "--start-date", "2024-03-01"],
        &project_idea_json(),
    );
    assert_eq!(v["error"]["code"], "NO_TEACHER");
}

#[test]
fn test_assign_unknown_student_fails() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    env.add_user("Charles", "teacher");
    let v = env.run_err_stdin(
        &["assign", "--student", "Ada", "--teacher", "Charles"],
        &project_idea_json(),
    );
    assert_eq!(v["error"]["code"], "USER_NOT_FOUND");
    // Failed assignment must not leave a project behind.
    let v = env.run_ok(&["project", "list"]);
    assert_eq!(v["data"]["projects"].as_array().unwrap().len(), 0);
}

#[test]
fn test_assign_rejects_teacher_as_student() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    env.add_user("Charles", "teacher");
    let v = env.run_err_stdin(
        &["assign", "--student", "Charles", "--teacher", "Charles"],
        &project_idea_json(),
    );
    assert_eq!(v["error"]["code"], "USER_NOT_FOUND");
}

// ─── 6. assignment lifecycle ───────────────────────────────────────

fn setup_assignment(env: &TestEnv) -> String {
    env.run_ok(&["init"]);
    env.add_user("Ada", "student");
    env.add_user("Charles", "teacher");
    let v = env.run_ok_stdin(
        &[
            "assign",
            "--student",
            "Ada",
            "--teacher",
            "Charles",
            "--start-date",
            "2024-03-01",
        ],
        &project_idea_json(),
    );
    v["data"]["assignment"]["id"].as_str().unwrap().to_string()
}

#[test]
fn test_assignment_start_and_complete() {
    let env = TestEnv::new();
    let id = setup_assignment(&env);

    let v = env.run_ok(&["assignment", "start", &id]);
    assert_eq!(v["data"]["assignment"]["status"], "in_progress");

    let v = env.run_ok(&["assignment", "complete", &id]);
    assert_eq!(v["data"]["assignment"]["status"], "completed");
}

#[test]
fn test_assignment_invalid_transition() {
    let env = TestEnv::new();
    let id = setup_assignment(&env);

    env.run_ok(&["assignment", "complete", &id]);
    let v = env.run_err(&["assignment", "start", &id]);
    assert_eq!(v["error"]["code"], "INVALID_STATUS_TRANSITION");
}

#[test]
fn test_assignment_list_filtered_by_student() {
    let env = TestEnv::new();
    setup_assignment(&env);
    env.add_user("Grace", "student");

    let v = env.run_ok(&["assignment", "list", "--student", "Ada"]);
    assert_eq!(v["data"]["assignments"].as_array().unwrap().len(), 1);
    let v = env.run_ok(&["assignment", "list", "--student", "Grace"]);
    assert_eq!(v["data"]["assignments"].as_array().unwrap().len(), 0);
}

#[test]
fn test_assignment_not_found() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    let v = env.run_err(&["assignment", "start", "zzzzzz"]);
    assert_eq!(v["error"]["code"], "ASSIGNMENT_NOT_FOUND");
}
