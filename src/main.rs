use clap::Parser;
use std::process;

use projassign::cli;
use projassign::cli::commands::{Cli, Commands};

fn main() {
    let cli_args = Cli::parse();
    let json_output = cli_args.json;

    let exit_code = match cli_args.command {
        Commands::Init => cli::init::run(json_output),
        Commands::User(cmd) => cli::user::run(cmd, json_output),
        Commands::Schedule { start_date } => {
            cli::schedule::run(start_date.as_deref(), json_output)
        }
        Commands::Project(cmd) => cli::project::run(cmd, json_output),
        Commands::Assign {
            student,
            teacher,
            start_date,
        } => cli::assign::run(&student, teacher.as_deref(), start_date.as_deref(), json_output),
        Commands::Assignment(cmd) => cli::assignment::run(cmd, json_output),
    };

    process::exit(exit_code);
}
