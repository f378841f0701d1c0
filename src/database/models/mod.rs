pub mod project;
pub mod session;
pub mod user;

pub use project::{NewProject, Project, ProjectChanges};
pub use session::Session;
pub use user::{NewUser, ProfileChanges, User};
