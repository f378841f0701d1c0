pub mod session;

// Re-export handler functions for use in routing
pub use session::login as auth_login;
pub use session::me as auth_me;
pub use session::signup as auth_signup;
