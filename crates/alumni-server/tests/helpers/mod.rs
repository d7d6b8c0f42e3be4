//! Test helpers para alumni-server.

#![allow(dead_code, unused_imports)]

pub mod client;
pub mod fixtures;

pub use client::{TestClient, TestResponse, client};
pub use fixtures::{FailingDirectory, seeded_directory, student, test_state};
