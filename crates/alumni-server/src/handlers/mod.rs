//! HTTP handlers.

pub mod cache;
pub mod dashboard;
pub mod health;
pub mod metrics;
pub mod students;
pub mod verify;
