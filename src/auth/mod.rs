//! Authentication module: registration, login and session handling.

pub mod db;
pub mod handlers;
pub mod middleware;
pub mod password;

pub use handlers::*;
pub use middleware::{AuthContext, SESSION_COOKIE_NAME};
