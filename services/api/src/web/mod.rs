pub mod auth;
pub mod books;
pub mod folders;
pub mod middleware;
pub mod profiles;
pub mod progress;
pub mod rest;
pub mod state;

// Re-export the router and auth middleware to make them easily accessible
// to the binary that builds the web server.
pub use middleware::require_auth;
pub use rest::{router, ApiDoc};
