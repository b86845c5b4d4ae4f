//! Authentication module.
//!
//! This module provides password hashing, input rules, token issuing and
//! verification, and the user service.

mod password;
mod service;
pub mod token;
pub mod validation;

pub use password::CredentialHasher;
pub use service::{DatabaseUserService, UserService};
pub use token::{Claims, Identity, JwtTokenService, TokenService};
