pub mod assignment_repo;
pub mod connection;
pub mod migrations;
pub mod project_repo;
pub mod user_repo;

pub use connection::*;
