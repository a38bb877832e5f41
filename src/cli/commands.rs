use clap::{Parser, Subcommand};

const VERSION: &str = env!("GIT_VERSION");

#[derive(Parser)]
#[command(
    name = "projassign",
    version = VERSION,
    about = "Project scheduling and student assignment CLI",
    after_help = "\
NOTE:
  Requires a git repository. DB is stored at <git-root>/.projassign/projassign.db
  Run `projassign init` before any command that touches the database.
  `projassign schedule` is pure and works without init.

EXIT CODES:
  0  Success
  1  Error (DB, validation, unknown reference, etc.)

SCHEDULING RULES:
  Tasks run strictly back-to-back from the project start date: each task
  spans `duration` consecutive days (end date inclusive) and the next task
  starts the day after the previous one ends.
  A missing, zero, negative, or non-numeric duration counts as 1 day.
  Without --start-date (or a start_date field in the input), today is used."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize projassign in this repository
    Init,

    /// User directory management
    #[command(subcommand)]
    User(UserCommands),

    /// Compute a task schedule from stdin JSON without persisting anything
    #[command(after_help = "\
STDIN FORMAT:
  {\"start_date\":\"YYYY-MM-DD\", \"tasks\":[{\"name\":\"...\", \"duration\":3, ...}]}

NOTE:
  --start-date overrides the start_date field; if neither is given, today.
  Unknown task fields are passed through to the output unchanged.
  A missing tasks field is treated as an empty list.")]
    Schedule {
        /// Project start date (YYYY-MM-DD)
        #[arg(long)]
        start_date: Option<String>,
    },

    /// Project management
    #[command(subcommand)]
    Project(ProjectCommands),

    /// Assign a project (from stdin JSON) to a student
    #[command(after_help = "\
STDIN FORMAT:
  {\"title\":\"...\", \"description\":\"...\", \"difficulty\":\"...\",
   \"duration\":\"2 weeks\", \"start_date\":\"YYYY-MM-DD\", \"tasks\":[...]}

NOTE:
  Atomic: creates the project record (with the computed schedule embedded)
  and the assignment record in one transaction.
  --teacher falls back to the default set via `user use`.")]
    Assign {
        /// Student reference (ID, ID prefix, or name substring)
        #[arg(long)]
        student: String,

        /// Assigning teacher reference
        #[arg(long)]
        teacher: Option<String>,

        /// Project start date (YYYY-MM-DD); overrides the start_date field
        #[arg(long)]
        start_date: Option<String>,
    },

    /// Assignment management
    #[command(subcommand)]
    Assignment(AssignmentCommands),
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Add a user to the directory
    Add {
        /// Display name
        name: String,
        #[arg(long)]
        email: Option<String>,
        /// Role: student or teacher
        #[arg(long, default_value = "student")]
        role: String,
    },
    /// List users
    List {
        /// Filter by role
        #[arg(long)]
        role: Option<String>,
    },
    /// Set the default assigning teacher
    Use {
        /// User reference (must have the teacher role)
        reference: String,
    },
}

#[derive(Subcommand)]
pub enum ProjectCommands {
    /// Load a project from stdin JSON, computing its task schedule
    Load {
        /// Project start date (YYYY-MM-DD); overrides the start_date field
        #[arg(long)]
        start_date: Option<String>,
    },
    /// List all projects
    List,
    /// Show project details and schedule
    Show {
        /// Project ID, ID prefix, or title substring
        reference: String,
    },
    /// Delete a project (cascades to its assignments)
    Delete {
        reference: String,
    },
}

#[derive(Subcommand)]
pub enum AssignmentCommands {
    /// List assignments
    List {
        /// Filter by student reference
        #[arg(long)]
        student: Option<String>,
    },
    /// Mark an assignment in progress (assigned → in_progress)
    Start {
        /// Assignment ID or prefix
        reference: String,
    },
    /// Mark an assignment completed (assigned|in_progress → completed)
    Complete {
        /// Assignment ID or prefix
        reference: String,
    },
}
