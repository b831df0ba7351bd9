pub mod auth;
pub mod card;
pub mod config;
pub mod deck;
pub mod error;
pub mod jobs;
pub mod metrics;
pub mod middleware;
pub mod review;
pub mod router;
pub mod state;
pub mod study;
pub mod tracing;
pub mod user;
pub mod validation;

#[cfg(test)]
mod test_support;

pub use config::ApiConfig;
pub use state::{ApiState, AuthConfig};
