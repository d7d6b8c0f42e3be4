//! Metrics for the alumni server.
//!
//! Cache series are described by `alumni_cache::register_cache_metrics`;
//! this module adds the HTTP series and installs the Prometheus recorder.

pub mod http;
pub mod setup;

pub use setup::init_metrics;
