//! bandmark-client — Remote exam API integrations.
//!
//! Implements the `ExamApi` trait over HTTP for the hosted exam service,
//! plus a mock backend for tests, and loads `bandmark.toml` configuration.

pub mod config;
pub mod http;
pub mod mock;

pub use config::{create_api, load_config, ApiConfig, BandmarkConfig};
pub use http::HttpExamApi;
pub use mock::MockExamApi;
