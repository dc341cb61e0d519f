/// Shared data types for the solar-wind forecast service.
///
/// `SolarWindRecord` is the unit the rest of the pipeline operates on:
/// one timestamped observation with both plasma and magnetic-field values
/// already merged and coerced to numbers. Records that fail coercion never
/// exist — the ingest layer drops them whole.

use thiserror::Error;

// ---------------------------------------------------------------------------
// SWPC product column names
// ---------------------------------------------------------------------------

/// Shared timestamp column present in both feeds (the join key).
pub const COL_TIME_TAG: &str = "time_tag";
/// Plasma feed: bulk solar-wind speed, km/s.
pub const COL_SPEED: &str = "speed";
/// Plasma feed: proton density, 1/cm³.
pub const COL_DENSITY: &str = "density";
/// Magnetometer feed: IMF north-south component (GSM frame), nT.
pub const COL_BZ_GSM: &str = "bz_gsm";
/// Magnetometer feed: total IMF magnitude, nT.
pub const COL_BT: &str = "bt";

// ---------------------------------------------------------------------------
// Window sizing
// ---------------------------------------------------------------------------

/// How many trailing records the normalizer keeps after the merge.
/// Margin above `MIN_RECORDS` so one or two dropped rows don't starve
/// the feature engine.
pub const WINDOW_SIZE: usize = 10;

/// Minimum valid records needed to fully determine the most recent
/// feature row: max lag (3) + max rolling window (3).
pub const MIN_RECORDS: usize = 6;

// ---------------------------------------------------------------------------
// Telemetry record
// ---------------------------------------------------------------------------

/// One merged solar-wind observation.
///
/// `time_tag` is kept as the feed's own UTC string
/// (`"2024-05-01 12:00:00.000"`); it sorts lexicographically in time
/// order, which is all the pipeline needs from it.
#[derive(Debug, Clone, PartialEq)]
pub struct SolarWindRecord {
    pub time_tag: String,
    /// Bulk speed V, km/s.
    pub speed: f64,
    /// Proton density Np, 1/cm³.
    pub density: f64,
    /// IMF Bz (GSM), nT. Signed; negative favors geomagnetic coupling.
    pub bz_gsm: f64,
    /// Total IMF magnitude Bt, nT.
    pub bt: f64,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Everything that can go wrong between "request received" and "forecast
/// produced". All variants abort the request — there is no partial result.
#[derive(Debug, Error)]
pub enum SwpcError {
    /// Network error, timeout, or non-success status from a feed.
    #[error("feed fetch failed: {0}")]
    Fetch(String),

    /// Payload structure did not match the header-plus-rows product format.
    #[error("malformed feed payload: {0}")]
    ParseError(String),

    /// Join key or an expected value column is absent from a feed.
    #[error("expected column missing: {0}")]
    MissingColumn(String),

    /// Feeds decoded fine but yielded nothing usable.
    #[error("no data available: {0}")]
    NoDataAvailable(String),

    /// Too few valid records survived the merge and coercion.
    #[error("insufficient telemetry: need {needed} valid records, have {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Feature-engine precondition: the window must be strictly ascending
    /// by timestamp.
    #[error("telemetry window is not strictly ascending by time_tag")]
    UnorderedWindow,

    /// Model artifact load/validation failure or a feature-vector length
    /// mismatch at the invocation boundary.
    #[error("model error: {0}")]
    Model(String),
}

impl SwpcError {
    /// Stable machine-readable tag for error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            SwpcError::Fetch(_) => "fetch",
            SwpcError::ParseError(_) => "parse",
            SwpcError::MissingColumn(_) => "missing_column",
            SwpcError::NoDataAvailable(_) => "no_data",
            SwpcError::InsufficientData { .. } => "insufficient_data",
            SwpcError::UnorderedWindow => "unordered_window",
            SwpcError::Model(_) => "model",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_exceeds_minimum() {
        // The retained window must leave headroom above the minimum the
        // feature engine needs, or a single dropped row starves it.
        assert!(WINDOW_SIZE > MIN_RECORDS);
    }

    #[test]
    fn test_error_kinds_are_distinct() {
        let errors = [
            SwpcError::Fetch("x".into()),
            SwpcError::ParseError("x".into()),
            SwpcError::MissingColumn("x".into()),
            SwpcError::NoDataAvailable("x".into()),
            SwpcError::InsufficientData { needed: 6, got: 2 },
            SwpcError::UnorderedWindow,
            SwpcError::Model("x".into()),
        ];
        let mut kinds: Vec<&str> = errors.iter().map(|e| e.kind()).collect();
        kinds.sort();
        kinds.dedup();
        assert_eq!(kinds.len(), errors.len(), "each variant needs its own kind tag");
    }

    #[test]
    fn test_insufficient_data_message_names_counts() {
        let err = SwpcError::InsufficientData { needed: 6, got: 4 };
        let msg = err.to_string();
        assert!(msg.contains('6'), "message should name the requirement: {}", msg);
        assert!(msg.contains('4'), "message should name the actual count: {}", msg);
    }
}
