use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::{
    ApiConfig,
    config::Environment,
    review::{PgReviewStore, RetryPolicy},
    study::SessionRegistry,
};

/// Token settings needed by the [`AuthUser`](crate::auth::AuthUser) extractor.
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

#[derive(Clone)]
pub struct ApiState {
    pub pool: PgPool,
    pub auth: AuthConfig,
    pub environment: Environment,
    pub review_store: Arc<PgReviewStore>,
    pub retry_policy: RetryPolicy,
    pub sessions: SessionRegistry<PgReviewStore>,
}

impl ApiState {
    pub fn new(config: &ApiConfig, pool: PgPool) -> Self {
        Self {
            review_store: Arc::new(PgReviewStore::new(pool.clone())),
            pool,
            auth: AuthConfig {
                jwt_secret: config.jwt_secret.clone(),
            },
            environment: config.env,
            retry_policy: config.retry_policy(),
            sessions: SessionRegistry::new(),
        }
    }
}

impl FromRef<ApiState> for AuthConfig {
    fn from_ref(state: &ApiState) -> Self {
        state.auth.clone()
    }
}
