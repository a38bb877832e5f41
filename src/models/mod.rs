pub mod assignment;
pub mod project;
pub mod user;

pub use assignment::*;
pub use project::*;
pub use user::*;
