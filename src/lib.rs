/// solark_service: Sol-Ark geomagnetic storm forecast service.
///
/// # Module structure
///
/// ```text
/// solark_service
/// ├── model       — shared data types (SolarWindRecord, SwpcError, window sizing)
/// ├── config      — service configuration loader (solark.toml, defaults built in)
/// ├── predictor   — Kp regression model artifact: load once at startup, predict
/// ├── endpoint    — HTTP API for the dashboard frontend
/// ├── ingest
/// │   ├── swpc     — SWPC products API: feed URLs + header-plus-rows parsing,
/// │   │             plasma × magnetometer merge, trailing-window truncation
/// │   └── fixtures (test only) — representative feed payloads
/// └── analysis
///     ├── features — lag/rolling feature derivation, training-order contract
///     └── forecast — hourly extrapolation + storm severity thresholds
/// ```

/// Public modules
pub mod analysis;
pub mod config;
pub mod endpoint;
pub mod ingest;
pub mod model;
pub mod predictor;
