/// HTTP endpoint for the Kp forecast
///
/// Serves the dashboard frontend, which makes one synchronous call per
/// refresh. Every forecast request runs the full pipeline against freshly
/// fetched telemetry — no caching, no background state.
///
/// Endpoints:
/// - GET / - Service health check (static, no dependency probes)
/// - GET /forecast-kp - Fetch feeds, derive features, predict, extrapolate

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::analysis::features::{FeatureRow, build_features};
use crate::analysis::forecast::{
    StormLevel, hourly_forecast, round1, round2, six_hour_average,
};
use crate::config::ServiceConfig;
use crate::ingest::swpc;
use crate::model::SwpcError;
use crate::predictor::KpModel;

// ---------------------------------------------------------------------------
// Response Types
// ---------------------------------------------------------------------------

/// Full forecast response payload.
#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub observatory: ObservatoryData,
    pub forecast: ForecastData,
    pub storm_level: StormLevel,
}

/// Current observatory conditions from the feature row's source record.
#[derive(Debug, Serialize)]
pub struct ObservatoryData {
    pub bz: f64,
    pub speed: f64,
    pub density: f64,
    pub bt: f64,
    pub ey: f64,
    /// Wall-clock time the response was generated (not the telemetry
    /// timestamp), RFC 3339 UTC.
    pub time_utc: String,
}

/// Live estimate plus the hourly projection.
#[derive(Debug, Serialize)]
pub struct ForecastData {
    pub live_kp: f64,
    pub hourly_kp: Vec<f64>,
    pub avg_6h: f64,
}

// ---------------------------------------------------------------------------
// Request context
// ---------------------------------------------------------------------------

/// Per-process request context: configuration, the HTTP client, and the
/// read-only model handle. Built once in `main`, shared by every request.
pub struct ServiceContext {
    pub config: ServiceConfig,
    pub client: reqwest::blocking::Client,
    pub model: Arc<KpModel>,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Runs the full per-request pipeline: fetch both feeds, normalize and
/// merge, derive the feature row, predict, extrapolate. All-or-nothing —
/// any failure aborts the request with no partial result.
pub fn run_forecast(ctx: &ServiceContext) -> Result<ForecastResponse, SwpcError> {
    let window =
        swpc::fetch_solar_wind(&ctx.client, &ctx.config.plasma_url, &ctx.config.mag_url)?;
    let features = build_features(&window)?;
    let live_kp = ctx.model.predict(&features.vector())?;
    Ok(shape_response(&features, live_kp))
}

/// Assembles the response payload from the feature row and the raw model
/// output. Severity is classified from the unrounded six-hour average;
/// display rounding (speed 1 dp, everything else 2 dp) happens last.
pub fn shape_response(features: &FeatureRow, live_kp: f64) -> ForecastResponse {
    let hourly = hourly_forecast(live_kp);
    let avg_6h = six_hour_average(&hourly);
    let storm_level = StormLevel::classify(avg_6h);

    ForecastResponse {
        observatory: ObservatoryData {
            bz: round2(features.bz),
            speed: round1(features.v),
            density: round2(features.np),
            bt: round2(features.bt),
            ey: round2(features.ey),
            time_utc: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        },
        forecast: ForecastData {
            live_kp: round2(live_kp),
            hourly_kp: hourly.to_vec(),
            avg_6h: round2(avg_6h),
        },
        storm_level,
    }
}

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

/// Start the endpoint server and serve requests until the process exits.
pub fn start_endpoint_server(ctx: ServiceContext) -> Result<(), String> {
    let server = tiny_http::Server::http(format!("0.0.0.0:{}", ctx.config.port))
        .map_err(|e| format!("Failed to start HTTP server: {}", e))?;

    println!("📡 HTTP endpoint listening on http://0.0.0.0:{}", ctx.config.port);
    println!("   GET /            - Service health check");
    println!("   GET /forecast-kp - Live Kp estimate + hourly forecast\n");

    for request in server.incoming_requests() {
        let url = request.url();

        let response = if url == "/" {
            handle_health()
        } else if url == "/forecast-kp" {
            handle_forecast(&ctx)
        } else {
            create_response(
                404,
                serde_json::json!({
                    "error": "Not found",
                    "available_endpoints": ["/", "/forecast-kp"]
                }),
            )
        };

        if let Err(e) = request.respond(response) {
            eprintln!("Failed to send response: {}", e);
        }
    }

    Ok(())
}

/// Handle / endpoint
fn handle_health() -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    create_response(
        200,
        serde_json::json!({
            "status": "Sol-Ark backend running",
            "service": "solark_service",
            "version": "0.1.0"
        }),
    )
}

/// Handle /forecast-kp endpoint
fn handle_forecast(ctx: &ServiceContext) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    match run_forecast(ctx) {
        Ok(payload) => create_response(200, serde_json::to_value(&payload).unwrap()),
        Err(e) => create_response(
            error_status(&e),
            serde_json::json!({
                "error": e.to_string(),
                "kind": e.kind()
            }),
        ),
    }
}

/// Maps pipeline failures onto distinct client-observable statuses.
/// Upstream trouble reports as 502, a window too thin to forecast from
/// as 503, internal faults as 500.
fn error_status(err: &SwpcError) -> u16 {
    match err {
        SwpcError::Fetch(_) | SwpcError::ParseError(_) | SwpcError::MissingColumn(_) => 502,
        SwpcError::NoDataAvailable(_) | SwpcError::InsufficientData { .. } => 503,
        SwpcError::UnorderedWindow | SwpcError::Model(_) => 500,
    }
}

/// Create HTTP response with JSON body. The dashboard is served from a
/// different origin, so every response carries open CORS headers.
fn create_response(status_code: u16, json: serde_json::Value) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let body = serde_json::to_string_pretty(&json).unwrap();
    let bytes = body.into_bytes();

    tiny_http::Response::from_data(bytes)
        .with_status_code(tiny_http::StatusCode::from(status_code))
        .with_header(
            tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap(),
        )
        .with_header(
            tiny_http::Header::from_bytes(&b"Access-Control-Allow-Origin"[..], &b"*"[..]).unwrap(),
        )
        .with_header(
            tiny_http::Header::from_bytes(&b"Access-Control-Allow-Methods"[..], &b"GET"[..])
                .unwrap(),
        )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn feature_row() -> FeatureRow {
        FeatureRow {
            time_tag: "2024-05-01 12:55:00.000".to_string(),
            v: 432.16,
            np: 4.267,
            bz: -3.141,
            bt: 6.057,
            ey: 432.16 * 3.141,
            bz_lag: [-3.0, -2.5, -2.0],
            v_lag: [430.0, 428.0, 425.0],
            np_lag: [4.2, 4.1, 4.0],
            bz_mean_2: -3.07,
            bz_std_2: 0.1,
            v_mean_2: 431.0,
            np_mean_2: 4.23,
            bz_mean_3: -2.88,
            bz_std_3: 0.33,
            v_mean_3: 430.0,
            np_mean_3: 4.19,
        }
    }

    #[test]
    fn test_response_rounds_for_display() {
        let response = shape_response(&feature_row(), 3.456);

        assert_eq!(response.observatory.speed, 432.2, "speed rounds to 1 dp");
        assert_eq!(response.observatory.bz, -3.14);
        assert_eq!(response.observatory.density, 4.27);
        assert_eq!(response.observatory.bt, 6.06);
        assert_eq!(response.observatory.ey, round2(432.16 * 3.141));
        assert_eq!(response.forecast.live_kp, 3.46);
    }

    #[test]
    fn test_response_shape_has_contract_keys() {
        let response = shape_response(&feature_row(), 4.0);
        let json = serde_json::to_value(&response).unwrap();

        for key in ["observatory", "forecast", "storm_level"] {
            assert!(json.get(key).is_some(), "response must carry '{}'", key);
        }
        let observatory = &json["observatory"];
        for key in ["bz", "speed", "density", "bt", "ey", "time_utc"] {
            assert!(observatory.get(key).is_some(), "observatory must carry '{}'", key);
        }
        let forecast = &json["forecast"];
        for key in ["live_kp", "hourly_kp", "avg_6h"] {
            assert!(forecast.get(key).is_some(), "forecast must carry '{}'", key);
        }
        assert_eq!(forecast["hourly_kp"].as_array().unwrap().len(), 7);
    }

    #[test]
    fn test_storm_level_follows_live_kp() {
        // live_kp 4.0 → avg 4.42 → Quiet; 6.0 → avg ≈ 6.63 → Moderate;
        // 7.0 → avg ≈ 7.74 → Severe.
        assert_eq!(shape_response(&feature_row(), 4.0).storm_level, StormLevel::Quiet);
        assert_eq!(shape_response(&feature_row(), 6.0).storm_level, StormLevel::Moderate);
        assert_eq!(shape_response(&feature_row(), 7.0).storm_level, StormLevel::Severe);
    }

    #[test]
    fn test_error_statuses_are_distinct_by_cause() {
        assert_eq!(error_status(&SwpcError::Fetch("timeout".into())), 502);
        assert_eq!(error_status(&SwpcError::ParseError("bad".into())), 502);
        assert_eq!(error_status(&SwpcError::MissingColumn("bt".into())), 502);
        assert_eq!(
            error_status(&SwpcError::InsufficientData { needed: 6, got: 3 }),
            503
        );
        assert_eq!(error_status(&SwpcError::NoDataAvailable("gap".into())), 503);
        assert_eq!(error_status(&SwpcError::UnorderedWindow), 500);
        assert_eq!(error_status(&SwpcError::Model("length".into())), 500);
    }

    #[test]
    fn test_time_utc_is_rfc3339_utc() {
        let response = shape_response(&feature_row(), 4.0);
        assert!(
            response.observatory.time_utc.ends_with('Z'),
            "time_utc should be UTC: {}",
            response.observatory.time_utc
        );
        assert!(response.observatory.time_utc.contains('T'));
    }
}
