//! Wire types owned by the HTTP surface.
//!
//! The upload envelope itself lives in [`crate::handler`]; these are the
//! shapes for surface-level errors and the health probe.

use serde::Serialize;

use crate::observability::MetricsSnapshot;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub bucket: String,
    pub metrics: MetricsSnapshot,
}
