// src/config.rs

use dotenvy::dotenv;
use std::env;

/// Default pass threshold (nivel de exigencia) applied when the caller
/// does not send one with the upload.
pub const DEFAULT_PASS_THRESHOLD: f64 = 60.0;

/// Bounds of the grading scale. Not configurable in this version.
pub const GRADE_MIN: f64 = 1.0;
pub const GRADE_MAX: f64 = 7.0;

/// A grade at or above this value counts as passing (Aprobado).
pub const PASSING_GRADE: f64 = 4.0;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self {
            database_url,
            rust_log,
        }
    }
}
