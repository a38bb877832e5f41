pub mod assign;
pub mod assignment;
pub mod commands;
pub mod init;
pub mod project;
pub mod schedule;
pub mod user;

pub use commands::*;
