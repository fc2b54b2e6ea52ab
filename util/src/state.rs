//! Application state container shared across Axum route handlers and services.
//!
//! This struct holds shared resources such as the database connection and the
//! rate limiter. It is cheap to clone and passed into route handlers via
//! Axum's `State<T>` extractor.

use crate::config;
use crate::rate_limit::RateLimiter;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;

/// Central application state shared across the server.
///
/// This includes:
/// - A cloned, thread-safe database connection for use with SeaORM.
/// - The per-client rate limiter consulted by every ingestion endpoint.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    limiter: Arc<RateLimiter>,
}

impl AppState {
    /// Creates a new `AppState` with the given database connection and a
    /// limiter configured from the environment.
    pub fn new(db: DatabaseConnection) -> Self {
        let limiter = Arc::new(RateLimiter::new(
            config::rate_limit_max_requests(),
            Duration::from_secs(config::rate_limit_window_seconds()),
        ));
        Self { db, limiter }
    }

    /// Creates an `AppState` with an externally constructed limiter.
    ///
    /// Used by tests that need a limiter with a manual clock or a tiny budget.
    pub fn with_limiter(db: DatabaseConnection, limiter: Arc<RateLimiter>) -> Self {
        Self { db, limiter }
    }

    /// Returns a shared reference to the internal `DatabaseConnection`.
    ///
    /// This is ideal when the caller does not need ownership.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Returns a shared reference to the rate limiter.
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }
}

impl AppState {
    /// Returns a cloned copy of the database connection.
    ///
    /// Useful for async contexts or spawning tasks that require ownership.
    pub fn db_clone(&self) -> DatabaseConnection {
        self.db.clone()
    }

    /// Returns a cloned handle to the rate limiter for background tasks.
    pub fn limiter_clone(&self) -> Arc<RateLimiter> {
        self.limiter.clone()
    }
}
