//! Sol-Ark Geomagnetic Storm Service - Main Entry Point
//!
//! A backend that, per dashboard request:
//! 1. Fetches the SWPC plasma and magnetometer 1-day products
//! 2. Merges them into a trailing telemetry window
//! 3. Derives the 22-feature vector the trained Kp model expects
//! 4. Predicts the live Kp and extrapolates an hourly forecast
//!
//! Model training and artifact serialization are handled by an external
//! offline pipeline; this service only loads the resulting kp_model.json.
//!
//! Usage:
//!   cargo run --release                # Serve on the configured port (default 8080)
//!   cargo run --release -- --port 9000 # Override the listen port
//!
//! Configuration:
//!   solark.toml in the working directory, all fields optional

use std::env;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use solark_service::config;
use solark_service::endpoint::{self, ServiceContext};
use solark_service::predictor::KpModel;

fn main() {
    println!("🌞 Sol-Ark Geomagnetic Storm Service");
    println!("=====================================\n");

    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();
    let mut port_override: Option<u16> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" => {
                if i + 1 < args.len() {
                    port_override = args[i + 1].parse().ok();
                    i += 2;
                } else {
                    eprintln!("Error: --port requires a port number");
                    std::process::exit(1);
                }
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                eprintln!("Usage: {} [--port PORT]", args[0]);
                std::process::exit(1);
            }
        }
    }

    let mut cfg = config::load_config();
    if let Some(port) = port_override {
        cfg.port = port;
    }

    // Load the trained model once; it is shared read-only afterwards.
    println!("📊 Loading Kp model from {}...", cfg.model_path);
    let model = match KpModel::load(Path::new(&cfg.model_path)) {
        Ok(model) => Arc::new(model),
        Err(e) => {
            eprintln!("\n❌ Model load failed: {}\n", e);
            eprintln!("The service cannot start without a valid model artifact.");
            eprintln!("Expected a kp_model.json produced by the offline training pipeline.\n");
            std::process::exit(1);
        }
    };
    println!("✓ Model ready ({} features)\n", model.feature_count());

    let client = match reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(cfg.fetch_timeout_secs))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            eprintln!("❌ Failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    println!("🚀 Starting HTTP endpoint...");
    println!("   Plasma feed: {}", cfg.plasma_url);
    println!("   Mag feed:    {}", cfg.mag_url);
    println!("   Press Ctrl+C to stop\n");

    let ctx = ServiceContext { config: cfg, client, model };

    if let Err(e) = endpoint::start_endpoint_server(ctx) {
        eprintln!("\n❌ Endpoint server error: {}\n", e);
        std::process::exit(1);
    }
}
