//! Assessment scoring, progress tracking, and interpretation for the career guidance platform.

pub mod assessment;
pub mod config;
pub mod error;
pub mod telemetry;
