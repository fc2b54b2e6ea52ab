//! In-process services behind the HTTP surface.
//!
//! Provides the alert engine, benchmark rollups, retention sweeping, and the
//! email notifier for critical alerts.

pub mod alert_engine;
pub mod benchmark;
pub mod email;
pub mod retention;
