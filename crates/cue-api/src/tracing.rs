//! Log output setup.
//!
//! Development gets pretty, source-annotated lines; production gets one JSON
//! object per event with the current span flattened in, so `request_id`,
//! `session_id` and `card_id` fields are searchable in the log store.
//!
//! `RUST_LOG` always wins over the defaults below.

use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Environment;

/// Filter used when `RUST_LOG` is not set.
pub const fn default_directives(env: &Environment) -> &'static str {
    match env {
        Environment::Development => "debug,cue_api=debug,tower_http=debug,sqlx=warn",
        Environment::Production => "info,cue_api=info,tower_http=info,sqlx=warn",
    }
}

/// Install the global subscriber for `env`.
///
/// Calling this twice is harmless: the second call logs a warning and keeps
/// the first subscriber.
pub fn init_tracing(env: &Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(env)));

    let fmt_layer = if env.is_development() {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .with_filter(filter)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .flatten_event(true)
            .with_target(true)
            .with_filter(filter)
            .boxed()
    };

    match tracing_subscriber::registry().with(fmt_layer).try_init() {
        Ok(()) => tracing::info!(environment = ?env, "tracing initialized"),
        Err(e) => tracing::warn!(error = %e, "tracing already initialized"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_parse() {
        for env in [Environment::Development, Environment::Production] {
            assert!(EnvFilter::try_new(default_directives(&env)).is_ok());
        }
    }

    #[test]
    fn test_production_is_quieter() {
        assert!(default_directives(&Environment::Production).starts_with("info"));
        assert!(default_directives(&Environment::Development).starts_with("debug"));
    }
}
