//! Public API surface for the coverage backend.
//!
//! Consolidates the types that cross the HTTP boundary. All response types
//! derive `Serialize`.

pub use crate::models::CoveragePoint;
pub use crate::models::CoverageReport;
pub use crate::models::CoverageSummary;
pub use crate::models::IngestDiagnostics;
pub use crate::models::IngestStats;
pub use crate::models::SkipReason;
pub use crate::parsing::SourceFormat;

use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: "v1".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_json() {
        let json = serde_json::to_value(HealthResponse::default()).unwrap();
        assert_eq!(json, serde_json::json!({"status": "ok", "version": "v1"}));
    }

    #[test]
    fn test_source_format_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&SourceFormat::Spreadsheet).unwrap(),
            "\"spreadsheet\""
        );
    }
}
