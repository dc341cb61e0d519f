/// Test fixtures: representative JSON payloads from the SWPC products API.
///
/// These fixtures are structurally complete but truncated to the minimum
/// needed to exercise the parser and the merge. They reflect the real
/// header-plus-rows envelope returned by:
///   https://services.swpc.noaa.gov/products/solar-wind/plasma-1-day.json
///   https://services.swpc.noaa.gov/products/solar-wind/mag-1-day.json
///
/// Products payload shape:
///   [0]  — header row: column names
///   [1…] — observation rows, one per timestamp, cells as STRINGS
///
/// Note: measurement values are always JSON strings in the SWPC response,
/// even though they represent numbers, and individual cells may be `null`
/// where an instrument dropped out. Parsers must handle both.
///
/// The value series are synthetic (Bz climbing 1…12 etc.) so merge and
/// feature tests can assert exact lags and rolling statistics; real Bz is
/// signed and usually small.

/// Plasma feed, 12 rows at 5-minute cadence. Speed climbs 400→510,
/// density 4.0→9.5. The `temperature` column is present (as upstream) but
/// unused by the pipeline.
#[cfg(test)]
pub(crate) fn fixture_plasma_json() -> &'static str {
    r#"[
      ["time_tag","density","speed","temperature"],
      ["2024-05-01 12:00:00.000","4.0","400.0","100000"],
      ["2024-05-01 12:05:00.000","4.5","410.0","101000"],
      ["2024-05-01 12:10:00.000","5.0","420.0","102000"],
      ["2024-05-01 12:15:00.000","5.5","430.0","103000"],
      ["2024-05-01 12:20:00.000","6.0","440.0","104000"],
      ["2024-05-01 12:25:00.000","6.5","450.0","105000"],
      ["2024-05-01 12:30:00.000","7.0","460.0","106000"],
      ["2024-05-01 12:35:00.000","7.5","470.0","107000"],
      ["2024-05-01 12:40:00.000","8.0","480.0","108000"],
      ["2024-05-01 12:45:00.000","8.5","490.0","109000"],
      ["2024-05-01 12:50:00.000","9.0","500.0","110000"],
      ["2024-05-01 12:55:00.000","9.5","510.0","111000"]
    ]"#
}

/// Magnetometer feed matching `fixture_plasma_json` timestamp-for-timestamp.
/// Bz climbs 1→12, Bt 5.0→7.2.
#[cfg(test)]
pub(crate) fn fixture_mag_json() -> &'static str {
    r#"[
      ["time_tag","bx_gsm","by_gsm","bz_gsm","lon_gsm","lat_gsm","bt"],
      ["2024-05-01 12:00:00.000","1.1","-2.0","1.0","120.0","10.0","5.0"],
      ["2024-05-01 12:05:00.000","1.2","-2.1","2.0","121.0","11.0","5.2"],
      ["2024-05-01 12:10:00.000","1.3","-2.2","3.0","122.0","12.0","5.4"],
      ["2024-05-01 12:15:00.000","1.4","-2.3","4.0","123.0","13.0","5.6"],
      ["2024-05-01 12:20:00.000","1.5","-2.4","5.0","124.0","14.0","5.8"],
      ["2024-05-01 12:25:00.000","1.6","-2.5","6.0","125.0","15.0","6.0"],
      ["2024-05-01 12:30:00.000","1.7","-2.6","7.0","126.0","16.0","6.2"],
      ["2024-05-01 12:35:00.000","1.8","-2.7","8.0","127.0","17.0","6.4"],
      ["2024-05-01 12:40:00.000","1.9","-2.8","9.0","128.0","18.0","6.6"],
      ["2024-05-01 12:45:00.000","2.0","-2.9","10.0","129.0","19.0","6.8"],
      ["2024-05-01 12:50:00.000","2.1","-3.0","11.0","130.0","20.0","7.0"],
      ["2024-05-01 12:55:00.000","2.2","-3.1","12.0","131.0","21.0","7.2"]
    ]"#
}

/// Magnetometer feed covering only the first 4 plasma timestamps —
/// simulates one instrument lagging the other. The inner join must shrink
/// to the shared timestamps.
#[cfg(test)]
pub(crate) fn fixture_mag_sparse_json() -> &'static str {
    r#"[
      ["time_tag","bx_gsm","by_gsm","bz_gsm","lon_gsm","lat_gsm","bt"],
      ["2024-05-01 12:00:00.000","1.1","-2.0","1.0","120.0","10.0","5.0"],
      ["2024-05-01 12:05:00.000","1.2","-2.1","2.0","121.0","11.0","5.2"],
      ["2024-05-01 12:10:00.000","1.3","-2.2","3.0","122.0","12.0","5.4"],
      ["2024-05-01 12:15:00.000","1.4","-2.3","4.0","123.0","13.0","5.6"]
    ]"#
}

/// Plasma feed with instrument dropouts: a null density at 12:05 and an
/// unparseable speed at 12:10. Neither row may survive coercion.
#[cfg(test)]
pub(crate) fn fixture_plasma_with_gaps_json() -> &'static str {
    r####"[
      ["time_tag","density","speed","temperature"],
      ["2024-05-01 12:00:00.000","4.0","400.0","100000"],
      ["2024-05-01 12:05:00.000",null,"410.0","101000"],
      ["2024-05-01 12:10:00.000","5.0","###","102000"],
      ["2024-05-01 12:15:00.000","5.5","430.0","103000"],
      ["2024-05-01 12:20:00.000","6.0","440.0","104000"]
    ]"####
}

/// Magnetometer feed with a null Bz at 12:15 — drops that timestamp even
/// though the plasma side is complete there.
#[cfg(test)]
pub(crate) fn fixture_mag_with_gaps_json() -> &'static str {
    r#"[
      ["time_tag","bx_gsm","by_gsm","bz_gsm","lon_gsm","lat_gsm","bt"],
      ["2024-05-01 12:00:00.000","1.1","-2.0","1.0","120.0","10.0","5.0"],
      ["2024-05-01 12:05:00.000","1.2","-2.1","2.0","121.0","11.0","5.2"],
      ["2024-05-01 12:10:00.000","1.3","-2.2","3.0","122.0","12.0","5.4"],
      ["2024-05-01 12:15:00.000","1.4","-2.3",null,"123.0","13.0","5.6"],
      ["2024-05-01 12:20:00.000","1.5","-2.4","5.0","124.0","14.0","5.8"]
    ]"#
}

/// Plasma feed with a repeated timestamp at 12:05 — upstream occasionally
/// re-emits a row after revision. The merge keeps one record per timestamp.
#[cfg(test)]
pub(crate) fn fixture_plasma_duplicate_json() -> &'static str {
    r#"[
      ["time_tag","density","speed","temperature"],
      ["2024-05-01 12:00:00.000","4.0","400.0","100000"],
      ["2024-05-01 12:05:00.000","4.5","410.0","101000"],
      ["2024-05-01 12:05:00.000","4.6","411.0","101500"],
      ["2024-05-01 12:10:00.000","5.0","420.0","102000"]
    ]"#
}

/// Magnetometer feed without the `bt` column — simulates an upstream
/// schema change. Must fail the merge by column name, not by index drift.
#[cfg(test)]
pub(crate) fn fixture_mag_missing_bt_json() -> &'static str {
    r#"[
      ["time_tag","bx_gsm","by_gsm","bz_gsm","lon_gsm","lat_gsm"],
      ["2024-05-01 12:00:00.000","1.1","-2.0","1.0","120.0","10.0"],
      ["2024-05-01 12:05:00.000","1.2","-2.1","2.0","121.0","11.0"]
    ]"#
}

/// Magnetometer feed from a different day — no timestamp overlaps the
/// plasma fixture, so the inner join yields nothing.
#[cfg(test)]
pub(crate) fn fixture_mag_disjoint_json() -> &'static str {
    r#"[
      ["time_tag","bx_gsm","by_gsm","bz_gsm","lon_gsm","lat_gsm","bt"],
      ["2024-05-02 12:00:00.000","1.1","-2.0","1.0","120.0","10.0","5.0"],
      ["2024-05-02 12:05:00.000","1.2","-2.1","2.0","121.0","11.0","5.2"]
    ]"#
}
