pub mod profile;

// Re-export handler functions for use in routing
pub use profile::edit as user_edit;
pub use profile::logged_in_user as user_logged_in;
