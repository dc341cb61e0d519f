/// NOAA SWPC solar-wind products client.
///
/// Handles payload parsing and the plasma × magnetometer merge for the
/// Space Weather Prediction Center "products" endpoints:
///   https://services.swpc.noaa.gov/products/solar-wind/
///
/// A products payload is a JSON array of arrays: the first row holds the
/// column names, every following row one observation, and every cell is
/// either a string or `null`. See `fixtures.rs` for annotated examples of
/// both feeds.

use std::collections::{HashMap, HashSet};
use std::sync::mpsc;

use threadpool::ThreadPool;

use crate::model::{
    COL_BT, COL_BZ_GSM, COL_DENSITY, COL_SPEED, COL_TIME_TAG, SolarWindRecord, SwpcError,
    WINDOW_SIZE,
};

// ---------------------------------------------------------------------------
// Feed URLs
// ---------------------------------------------------------------------------

/// Plasma feed: time_tag, density, speed, temperature. Most recent day,
/// no query parameters.
pub const PLASMA_URL: &str =
    "https://services.swpc.noaa.gov/products/solar-wind/plasma-1-day.json";

/// Magnetometer feed: time_tag, bx/by/bz (GSM), lon/lat, bt.
pub const MAG_URL: &str = "https://services.swpc.noaa.gov/products/solar-wind/mag-1-day.json";

// ---------------------------------------------------------------------------
// Product table
// ---------------------------------------------------------------------------

/// A parsed header-plus-rows product payload. Cells stay as raw strings
/// until the merge step decides which columns must be numeric.
#[derive(Debug)]
pub struct ProductTable {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl ProductTable {
    /// Position of a named column. Columns are resolved by name, never by
    /// fixed index; the feeds have reordered columns before.
    ///
    /// # Errors
    /// `SwpcError::MissingColumn` when the feed does not carry `name`.
    pub fn column_index(&self, name: &str) -> Result<usize, SwpcError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| SwpcError::MissingColumn(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Parses a products payload into a `ProductTable`.
///
/// # Errors
/// - `SwpcError::ParseError` — body is not the expected array-of-arrays
///   shape, the header row is absent, or a column name is null.
///
/// Data rows whose cell count does not match the header are dropped
/// rather than failing the whole payload; a row missing fields could
/// never survive coercion anyway.
pub fn parse_products_payload(json: &str) -> Result<ProductTable, SwpcError> {
    let raw: Vec<Vec<Option<String>>> = serde_json::from_str(json)
        .map_err(|e| SwpcError::ParseError(format!("JSON deserialization failed: {}", e)))?;

    let mut rows_iter = raw.into_iter();
    let header = rows_iter
        .next()
        .ok_or_else(|| SwpcError::ParseError("payload has no header row".to_string()))?;

    let columns = header
        .into_iter()
        .map(|cell| cell.ok_or_else(|| SwpcError::ParseError("null column name in header".to_string())))
        .collect::<Result<Vec<String>, SwpcError>>()?;

    if columns.is_empty() {
        return Err(SwpcError::ParseError("header row is empty".to_string()));
    }

    let width = columns.len();
    let rows: Vec<Vec<Option<String>>> = rows_iter.filter(|row| row.len() == width).collect();

    Ok(ProductTable { columns, rows })
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Coerce one cell to a float. `None` on a null cell or an unparseable
/// string; the caller drops the whole row in either case.
fn cell_f64(row: &[Option<String>], idx: usize) -> Option<f64> {
    row.get(idx)?.as_ref()?.trim().parse::<f64>().ok()
}

/// Inner-joins the plasma and magnetometer tables on `time_tag` and
/// coerces the four value columns to floats.
///
/// A timestamp absent from either feed yields no record; a row where any
/// of speed / density / bz_gsm / bt is null or unparseable is dropped
/// entirely — no partial records survive. The result is sorted ascending
/// by `time_tag`, deduplicated on the timestamp (first occurrence wins),
/// and truncated to the most recent `WINDOW_SIZE` records.
///
/// # Errors
/// - `SwpcError::MissingColumn` — join key or value column absent.
/// - `SwpcError::NoDataAvailable` — no row survived the join + coercion.
pub fn merge_feeds(
    plasma: &ProductTable,
    mag: &ProductTable,
) -> Result<Vec<SolarWindRecord>, SwpcError> {
    let p_time = plasma.column_index(COL_TIME_TAG)?;
    let p_speed = plasma.column_index(COL_SPEED)?;
    let p_density = plasma.column_index(COL_DENSITY)?;
    let m_time = mag.column_index(COL_TIME_TAG)?;
    let m_bz = mag.column_index(COL_BZ_GSM)?;
    let m_bt = mag.column_index(COL_BT)?;

    // Index magnetometer rows by timestamp for the join.
    let mut mag_by_time: HashMap<&str, &Vec<Option<String>>> = HashMap::new();
    for row in &mag.rows {
        if let Some(Some(time_tag)) = row.get(m_time) {
            mag_by_time.entry(time_tag.as_str()).or_insert(row);
        }
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut records = Vec::new();

    for row in &plasma.rows {
        let Some(Some(time_tag)) = row.get(p_time) else {
            continue;
        };
        if !seen.insert(time_tag.as_str()) {
            continue;
        }
        let Some(mag_row) = mag_by_time.get(time_tag.as_str()).copied() else {
            continue;
        };

        let speed = cell_f64(row, p_speed);
        let density = cell_f64(row, p_density);
        let bz_gsm = cell_f64(mag_row, m_bz);
        let bt = cell_f64(mag_row, m_bt);

        match (speed, density, bz_gsm, bt) {
            (Some(speed), Some(density), Some(bz_gsm), Some(bt)) => {
                records.push(SolarWindRecord {
                    time_tag: time_tag.clone(),
                    speed,
                    density,
                    bz_gsm,
                    bt,
                });
            }
            _ => continue,
        }
    }

    if records.is_empty() {
        return Err(SwpcError::NoDataAvailable(
            "no timestamp present in both feeds survived coercion".to_string(),
        ));
    }

    // The feeds arrive in time order, but the lag and rolling logic
    // downstream depends on it — make the ordering explicit here.
    records.sort_by(|a, b| a.time_tag.cmp(&b.time_tag));

    if records.len() > WINDOW_SIZE {
        records.drain(..records.len() - WINDOW_SIZE);
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// Fetching
// ---------------------------------------------------------------------------

/// Fetches one product feed and parses it.
///
/// # Errors
/// - `SwpcError::Fetch` — network error, timeout, or non-success status.
/// - `SwpcError::ParseError` — body was not a products payload.
pub fn fetch_feed(
    client: &reqwest::blocking::Client,
    url: &str,
) -> Result<ProductTable, SwpcError> {
    let response = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .map_err(|e| SwpcError::Fetch(format!("GET {}: {}", url, e)))?;

    if !response.status().is_success() {
        return Err(SwpcError::Fetch(format!("GET {}: HTTP {}", url, response.status())));
    }

    let body = response
        .text()
        .map_err(|e| SwpcError::Fetch(format!("GET {}: reading body: {}", url, e)))?;

    parse_products_payload(&body)
}

/// Fetches both feeds in parallel, then joins them into the telemetry
/// window. The two fetches are independent, but both must complete before
/// the merge; a failure in either aborts the request. No caching and no
/// retry — every request re-fetches.
pub fn fetch_solar_wind(
    client: &reqwest::blocking::Client,
    plasma_url: &str,
    mag_url: &str,
) -> Result<Vec<SolarWindRecord>, SwpcError> {
    let pool = ThreadPool::new(2);
    let (tx, rx) = mpsc::channel();

    for (slot, url) in [(0usize, plasma_url.to_string()), (1, mag_url.to_string())] {
        let tx = tx.clone();
        let client = client.clone();
        pool.execute(move || {
            // A closed receiver just means the other feed already failed.
            let _ = tx.send((slot, fetch_feed(&client, &url)));
        });
    }
    drop(tx);

    let mut plasma = None;
    let mut mag = None;
    for (slot, result) in rx {
        match slot {
            0 => plasma = Some(result?),
            _ => mag = Some(result?),
        }
    }

    let plasma =
        plasma.ok_or_else(|| SwpcError::Fetch("plasma feed worker died".to_string()))?;
    let mag = mag.ok_or_else(|| SwpcError::Fetch("magnetometer feed worker died".to_string()))?;

    merge_feeds(&plasma, &mag)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
