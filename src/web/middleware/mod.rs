//! Middleware for Web API.

pub mod auth;
pub mod cors;
pub mod guard;

pub use auth::{bearer_token, require_auth, AuthUser};
pub use cors::create_cors_layer;
pub use guard::{handle_panic, normalize_method_not_allowed, options_no_content, route_not_found};
