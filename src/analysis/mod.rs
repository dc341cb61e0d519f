/// Feature and forecast derivation for the Kp service.
///
/// Submodules:
/// - `features` — lag/rolling-window feature engineering over the
///   telemetry window, and the training-order feature-vector contract.
/// - `forecast` — hourly Kp extrapolation and storm severity thresholds.

pub mod features;
pub mod forecast;
