/// Short-term Kp extrapolation and storm severity classification.
///
/// The hourly projection is a fixed compounding-growth heuristic seeded
/// by the live estimate — a deterministic placeholder with no physical
/// model behind it. The raw model output is not clamped to the
/// conventional [0, 9] Kp range; the thresholds below are the only
/// interpretation applied to it.

use std::fmt;

use serde::Serialize;

/// Hours projected, hour 0 (now) included.
pub const FORECAST_HOURS: usize = 7;

/// Per-hour compounding growth applied to the live estimate.
const HOURLY_GROWTH: f64 = 0.03;

/// Display rounding, one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Display rounding, two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Hourly Kp projection: hour i = live_kp × (1 + 0.03·i), each value
/// rounded to 2 decimals as published.
pub fn hourly_forecast(live_kp: f64) -> [f64; FORECAST_HOURS] {
    let mut hourly = [0.0; FORECAST_HOURS];
    for (i, slot) in hourly.iter_mut().enumerate() {
        *slot = round2(live_kp * (1.0 + i as f64 * HOURLY_GROWTH));
    }
    hourly
}

/// Mean of forecast hours 1–6, hour 0 excluded.
///
/// Deliberately unrounded: severity classification depends on full
/// precision at the 5 and 7 boundaries, so callers classify first and
/// round only the value they publish.
pub fn six_hour_average(hourly: &[f64; FORECAST_HOURS]) -> f64 {
    hourly[1..].iter().sum::<f64>() / (FORECAST_HOURS - 1) as f64
}

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Coarse storm severity derived from the 6-hour average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StormLevel {
    Severe,
    Moderate,
    Quiet,
}

impl StormLevel {
    /// Threshold classification: ≥7 Severe, ≥5 Moderate, below Quiet.
    /// Must be fed the unrounded average.
    pub fn classify(avg_6h: f64) -> Self {
        if avg_6h >= 7.0 {
            StormLevel::Severe
        } else if avg_6h >= 5.0 {
            StormLevel::Moderate
        } else {
            StormLevel::Quiet
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StormLevel::Severe => "Severe",
            StormLevel::Moderate => "Moderate",
            StormLevel::Quiet => "Quiet",
        }
    }
}

impl fmt::Display for StormLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
