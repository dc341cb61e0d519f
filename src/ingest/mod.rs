/// Telemetry ingest for the solar-wind feeds.
///
/// One submodule per upstream source, so a future addition (e.g. the
/// 7-day products or a DSCOVR archive endpoint) gets its own file rather
/// than bloating `swpc.rs`.

pub mod fixtures;
pub mod swpc;
