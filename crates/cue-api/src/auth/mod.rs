//! Resolving the acting user.
//!
//! Tokens are issued elsewhere (the identity provider in front of the API);
//! this module only verifies them and exposes the caller as [`AuthUser`].

pub mod jwt;
pub mod middleware;

pub use middleware::AuthUser;
