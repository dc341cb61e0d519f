/// Feature engineering for the Kp regression model.
///
/// Transforms the trailing telemetry window into the fixed 22-feature
/// vector the offline-trained model expects. The construction here (lag
/// depth, rolling-window widths, derived fields, column order) must match
/// training bit for bit: a drift does not raise an error, it silently
/// produces a wrong prediction. The order lives in `FEATURE_COLUMNS`,
/// `vector()` is the only way to linearize a row, and the model artifact
/// is validated against the same list at load time.

use crate::model::{MIN_RECORDS, SolarWindRecord, SwpcError};

// ---------------------------------------------------------------------------
// Feature contract
// ---------------------------------------------------------------------------

/// Lag depths, in records before the current one.
pub const LAGS: [usize; 3] = [1, 2, 3];

/// Trailing rolling-window widths.
pub const ROLLING_WINDOWS: [usize; 2] = [2, 3];

pub const FEATURE_COUNT: usize = 22;

/// Feature names in training order. This order is a hard contract with
/// the model artifact; never reorder, rename, or append in the middle.
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
    "V", "Np", "Bz", "Bt",
    "Bz_lag_1", "V_lag_1", "Np_lag_1",
    "Bz_lag_2", "V_lag_2", "Np_lag_2",
    "Bz_lag_3", "V_lag_3", "Np_lag_3",
    "Bz_mean_2", "Bz_std_2",
    "V_mean_2", "Np_mean_2",
    "Bz_mean_3", "Bz_std_3",
    "V_mean_3", "Np_mean_3",
    "Ey",
];

// ---------------------------------------------------------------------------
// Windowed helpers
// ---------------------------------------------------------------------------

/// Value exactly `k` records before `idx` in the ascending-time ordering,
/// or `None` when the window does not reach that far back.
pub fn lag(values: &[f64], idx: usize, k: usize) -> Option<f64> {
    idx.checked_sub(k).and_then(|i| values.get(i)).copied()
}

/// Mean over the trailing window of `width` records ending at `idx`.
/// `None` until the window is fully populated.
pub fn rolling_mean(values: &[f64], idx: usize, width: usize) -> Option<f64> {
    let window = trailing_window(values, idx, width)?;
    Some(window.iter().sum::<f64>() / width as f64)
}

/// Sample standard deviation (n−1 denominator) over the trailing window
/// of `width` records ending at `idx`. Undefined for widths below 2 and
/// until the window is fully populated.
pub fn rolling_std(values: &[f64], idx: usize, width: usize) -> Option<f64> {
    if width < 2 {
        return None;
    }
    let window = trailing_window(values, idx, width)?;
    let mean = window.iter().sum::<f64>() / width as f64;
    let var = window.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / (width - 1) as f64;
    Some(var.sqrt())
}

fn trailing_window(values: &[f64], idx: usize, width: usize) -> Option<&[f64]> {
    if width == 0 || idx >= values.len() {
        return None;
    }
    let start = (idx + 1).checked_sub(width)?;
    Some(&values[start..=idx])
}

// ---------------------------------------------------------------------------
// Feature row
// ---------------------------------------------------------------------------

/// The fully-determined feature row for the most recent observation.
/// Every field is defined; rows with any undefined derived value are
/// rejected during selection, never zero-filled.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    /// Timestamp of the observation the features describe.
    pub time_tag: String,
    pub v: f64,
    pub np: f64,
    pub bz: f64,
    pub bt: f64,
    /// Solar-wind convective electric field proxy, V × |Bz|.
    pub ey: f64,
    /// Bz/V/Np at lags 1, 2, 3 (index 0 = lag 1).
    pub bz_lag: [f64; 3],
    pub v_lag: [f64; 3],
    pub np_lag: [f64; 3],
    pub bz_mean_2: f64,
    pub bz_std_2: f64,
    pub v_mean_2: f64,
    pub np_mean_2: f64,
    pub bz_mean_3: f64,
    pub bz_std_3: f64,
    pub v_mean_3: f64,
    pub np_mean_3: f64,
}

impl FeatureRow {
    /// Linearizes the row in `FEATURE_COLUMNS` order — the only sanctioned
    /// path from features to model input.
    pub fn vector(&self) -> [f64; FEATURE_COUNT] {
        [
            self.v, self.np, self.bz, self.bt,
            self.bz_lag[0], self.v_lag[0], self.np_lag[0],
            self.bz_lag[1], self.v_lag[1], self.np_lag[1],
            self.bz_lag[2], self.v_lag[2], self.np_lag[2],
            self.bz_mean_2, self.bz_std_2,
            self.v_mean_2, self.np_mean_2,
            self.bz_mean_3, self.bz_std_3,
            self.v_mean_3, self.np_mean_3,
            self.ey,
        ]
    }
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

/// Derives the feature row for the most recent fully-determined record in
/// the window.
///
/// Precondition (checked, not assumed): the window is strictly ascending
/// by `time_tag`. The lag and rolling lookups index backwards in time and
/// would silently produce wrong features on an unordered window.
///
/// # Errors
/// - `SwpcError::InsufficientData` — fewer than `MIN_RECORDS` records.
/// - `SwpcError::UnorderedWindow` — ordering precondition violated.
/// - `SwpcError::NoDataAvailable` — no row has every derived field defined.
pub fn build_features(window: &[SolarWindRecord]) -> Result<FeatureRow, SwpcError> {
    if window.len() < MIN_RECORDS {
        return Err(SwpcError::InsufficientData {
            needed: MIN_RECORDS,
            got: window.len(),
        });
    }
    let ascending = window.windows(2).all(|pair| pair[0].time_tag < pair[1].time_tag);
    if !ascending {
        return Err(SwpcError::UnorderedWindow);
    }

    let bz: Vec<f64> = window.iter().map(|r| r.bz_gsm).collect();
    let v: Vec<f64> = window.iter().map(|r| r.speed).collect();
    let np: Vec<f64> = window.iter().map(|r| r.density).collect();

    // Most recent row where every derived column is defined.
    for idx in (0..window.len()).rev() {
        if let Some(row) = feature_row_at(window, &bz, &v, &np, idx) {
            return Ok(row);
        }
    }

    Err(SwpcError::NoDataAvailable(
        "no fully-determined feature row in window".to_string(),
    ))
}

/// Feature row at `idx`, or `None` if any lag or rolling statistic is
/// undefined there.
fn feature_row_at(
    window: &[SolarWindRecord],
    bz: &[f64],
    v: &[f64],
    np: &[f64],
    idx: usize,
) -> Option<FeatureRow> {
    let record = &window[idx];

    let mut bz_lag = [0.0; 3];
    let mut v_lag = [0.0; 3];
    let mut np_lag = [0.0; 3];
    for (slot, &k) in LAGS.iter().enumerate() {
        bz_lag[slot] = lag(bz, idx, k)?;
        v_lag[slot] = lag(v, idx, k)?;
        np_lag[slot] = lag(np, idx, k)?;
    }

    Some(FeatureRow {
        time_tag: record.time_tag.clone(),
        v: record.speed,
        np: record.density,
        bz: record.bz_gsm,
        bt: record.bt,
        ey: record.speed * record.bz_gsm.abs(),
        bz_lag,
        v_lag,
        np_lag,
        bz_mean_2: rolling_mean(bz, idx, 2)?,
        bz_std_2: rolling_std(bz, idx, 2)?,
        v_mean_2: rolling_mean(v, idx, 2)?,
        np_mean_2: rolling_mean(np, idx, 2)?,
        bz_mean_3: rolling_mean(bz, idx, 3)?,
        bz_std_3: rolling_std(bz, idx, 3)?,
        v_mean_3: rolling_mean(v, idx, 3)?,
        np_mean_3: rolling_mean(np, idx, 3)?,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Synthetic ascending window: Bz = 1…n, V = 500 fixed except where a
    /// test overrides it, Np = 10 fixed.
    fn synthetic_window(bz_values: &[f64]) -> Vec<SolarWindRecord> {
        bz_values
            .iter()
            .enumerate()
            .map(|(i, &bz)| SolarWindRecord {
                time_tag: format!("2024-05-01 12:{:02}:00.000", i * 5),
                speed: 500.0,
                density: 10.0,
                bz_gsm: bz,
                bt: 6.0,
            })
            .collect()
    }

    // --- Helper functions ----------------------------------------------------

    #[test]
    fn test_lag_is_bounds_checked() {
        let values = [1.0, 2.0, 3.0];
        assert_eq!(lag(&values, 2, 1), Some(2.0));
        assert_eq!(lag(&values, 2, 2), Some(1.0));
        assert_eq!(lag(&values, 2, 3), None, "lag past the window start is undefined");
        assert_eq!(lag(&values, 0, 1), None);
    }

    #[test]
    fn test_rolling_mean_requires_full_window() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(rolling_mean(&values, 3, 2), Some(3.5));
        assert_eq!(rolling_mean(&values, 3, 3), Some(3.0));
        assert_eq!(rolling_mean(&values, 1, 3), None, "partial windows are undefined");
        assert_eq!(rolling_mean(&values, 0, 1), Some(1.0));
    }

    #[test]
    fn test_rolling_std_uses_sample_formula() {
        // Sample std of [1, 2] is sqrt(0.5), not the population 0.5.
        let values = [1.0, 2.0];
        let std = rolling_std(&values, 1, 2).expect("window is full");
        assert!((std - 0.5f64.sqrt()).abs() < 1e-12, "got {}", std);
    }

    #[test]
    fn test_rolling_std_undefined_below_width_two() {
        let values = [1.0, 2.0, 3.0];
        assert_eq!(rolling_std(&values, 2, 1), None);
        assert_eq!(rolling_std(&values, 0, 2), None);
    }

    // --- P1: feature order invariance ----------------------------------------

    #[test]
    fn test_vector_matches_feature_columns_order() {
        let window = synthetic_window(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let row = build_features(&window).expect("window is sufficient");
        let vector = row.vector();

        assert_eq!(vector.len(), FEATURE_COUNT);
        assert_eq!(FEATURE_COLUMNS.len(), FEATURE_COUNT);

        // Spot-check positions against the named contract.
        assert_eq!(FEATURE_COLUMNS[0], "V");
        assert_eq!(vector[0], row.v);
        assert_eq!(FEATURE_COLUMNS[4], "Bz_lag_1");
        assert_eq!(vector[4], row.bz_lag[0]);
        assert_eq!(FEATURE_COLUMNS[14], "Bz_std_2");
        assert_eq!(vector[14], row.bz_std_2);
        assert_eq!(FEATURE_COLUMNS[21], "Ey");
        assert_eq!(vector[21], row.ey);
    }

    #[test]
    fn test_min_records_covers_lag_and_rolling_depth() {
        // A row is fully determined once the deepest lag and the widest
        // rolling window are both satisfiable.
        let max_lag = LAGS.iter().max().copied().unwrap_or(0);
        let max_window = ROLLING_WINDOWS.iter().max().copied().unwrap_or(0);
        assert_eq!(MIN_RECORDS, max_lag + max_window);
    }

    #[test]
    fn test_feature_columns_are_unique() {
        let mut names = FEATURE_COLUMNS.to_vec();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), FEATURE_COUNT, "duplicate feature name in contract");
    }

    // --- P2: lag correctness -------------------------------------------------

    #[test]
    fn test_lags_at_last_row_of_ascending_bz() {
        let window = synthetic_window(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let row = build_features(&window).expect("window is sufficient");

        assert_eq!(row.bz, 6.0);
        assert_eq!(row.bz_lag, [5.0, 4.0, 3.0]);
    }

    // --- P3: rolling statistics ----------------------------------------------

    #[test]
    fn test_rolling_stats_at_last_row_of_ascending_bz() {
        let window = synthetic_window(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let row = build_features(&window).expect("window is sufficient");

        assert!((row.bz_mean_2 - 5.5).abs() < 1e-12);
        assert!((row.bz_mean_3 - 5.0).abs() < 1e-12);
        assert!((row.bz_std_2 - 0.5f64.sqrt()).abs() < 1e-9, "got {}", row.bz_std_2);
        assert!((row.bz_std_3 - 1.0).abs() < 1e-12, "got {}", row.bz_std_3);
    }

    // --- P4: Ey derivation ---------------------------------------------------

    #[test]
    fn test_ey_uses_absolute_bz() {
        let window = synthetic_window(&[1.0, 2.0, 3.0, 4.0, 5.0, -10.0]);
        let row = build_features(&window).expect("window is sufficient");

        assert_eq!(row.ey, 5000.0, "Ey = V × |Bz| must not go negative");
    }

    // --- P7: insufficient data -----------------------------------------------

    #[test]
    fn test_short_window_is_typed_failure() {
        let window = synthetic_window(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let result = build_features(&window);
        assert!(
            matches!(result, Err(SwpcError::InsufficientData { needed: 6, got: 5 })),
            "5 records must fail explicitly, got {:?}",
            result
        );
    }

    #[test]
    fn test_empty_window_is_typed_failure() {
        let result = build_features(&[]);
        assert!(matches!(result, Err(SwpcError::InsufficientData { got: 0, .. })));
    }

    // --- Ordering precondition -----------------------------------------------

    #[test]
    fn test_unordered_window_is_rejected() {
        let mut window = synthetic_window(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        window.swap(2, 3);
        let result = build_features(&window);
        assert!(
            matches!(result, Err(SwpcError::UnorderedWindow)),
            "descending step must be rejected, got {:?}",
            result
        );
    }

    #[test]
    fn test_duplicate_timestamp_is_rejected() {
        let mut window = synthetic_window(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        window[3].time_tag = window[2].time_tag.clone();
        assert!(matches!(build_features(&window), Err(SwpcError::UnorderedWindow)));
    }

    // --- Row selection -------------------------------------------------------

    #[test]
    fn test_selects_most_recent_record() {
        let window = synthetic_window(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        let row = build_features(&window).expect("window is sufficient");

        assert_eq!(row.time_tag, window.last().unwrap().time_tag);
        assert_eq!(row.bz, 8.0);
    }

    #[test]
    fn test_direct_fields_copy_through() {
        let window = synthetic_window(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let row = build_features(&window).unwrap();

        assert_eq!(row.v, 500.0);
        assert_eq!(row.np, 10.0);
        assert_eq!(row.bt, 6.0);
        assert_eq!(row.v_lag, [500.0, 500.0, 500.0]);
        assert_eq!(row.np_lag, [10.0, 10.0, 10.0]);
        assert_eq!(row.v_mean_2, 500.0);
        assert_eq!(row.np_mean_3, 10.0);
    }
}
