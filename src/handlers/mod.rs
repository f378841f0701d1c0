// handlers/mod.rs - request handlers grouped by resource
//
// Public:    GET /api/v1/projects, GET /api/v1/projects/:id,
//            POST /api/v1/auth/signup, POST /api/v1/auth/login
// Protected: everything else under /api/v1 (bearer JWT via jwt_auth_middleware)
pub mod auth;
pub mod projects;
pub mod service;
pub mod user;
