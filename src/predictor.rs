/// Kp regression model: artifact loading and inference.
///
/// The artifact (`kp_model.json`) is produced by the offline training
/// pipeline: the ordered feature-name list the model was fit against,
/// an intercept, and one coefficient per feature. It is loaded once at
/// startup into an immutable handle and shared by reference afterwards;
/// per-request work is a single dot product.
///
/// Feature order is validated twice: the artifact's feature list must
/// match `FEATURE_COLUMNS` exactly at load time, and `predict` re-checks
/// the vector length at the invocation boundary.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::analysis::features::{FEATURE_COLUMNS, FEATURE_COUNT};
use crate::model::SwpcError;

/// On-disk artifact layout.
#[derive(Debug, Deserialize)]
struct ModelArtifact {
    /// Feature names in the order the model was trained on.
    features: Vec<String>,
    intercept: f64,
    coefficients: Vec<f64>,
}

/// Loaded, validated regression model. Read-only after construction.
#[derive(Debug)]
pub struct KpModel {
    intercept: f64,
    coefficients: Vec<f64>,
}

impl KpModel {
    /// Reads and validates the model artifact.
    ///
    /// # Errors
    /// `SwpcError::Model` on unreadable file, undecodable JSON, a feature
    /// list that deviates from `FEATURE_COLUMNS` in length, naming, or
    /// order, or a coefficient count that does not match.
    pub fn load(path: &Path) -> Result<Self, SwpcError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| SwpcError::Model(format!("failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&contents)
            .map_err(|e| SwpcError::Model(format!("{}: {}", path.display(), e)))
    }

    /// Parses and validates an artifact from its JSON text.
    pub fn from_json(json: &str) -> Result<Self, SwpcError> {
        let artifact: ModelArtifact = serde_json::from_str(json)
            .map_err(|e| SwpcError::Model(format!("failed to parse artifact: {}", e)))?;

        if artifact.features.len() != FEATURE_COUNT {
            return Err(SwpcError::Model(format!(
                "artifact trained on {} features, this service derives {}",
                artifact.features.len(),
                FEATURE_COUNT
            )));
        }
        for (position, (got, expected)) in
            artifact.features.iter().zip(FEATURE_COLUMNS.iter()).enumerate()
        {
            if got != expected {
                return Err(SwpcError::Model(format!(
                    "feature order mismatch at position {}: artifact has '{}', service derives '{}'",
                    position, got, expected
                )));
            }
        }
        if artifact.coefficients.len() != artifact.features.len() {
            return Err(SwpcError::Model(format!(
                "{} coefficients for {} features",
                artifact.coefficients.len(),
                artifact.features.len()
            )));
        }

        Ok(Self {
            intercept: artifact.intercept,
            coefficients: artifact.coefficients,
        })
    }

    /// Predicts the live Kp estimate from a feature vector in training
    /// order. The output is a raw regression value — not clamped to the
    /// conventional [0, 9] Kp range.
    ///
    /// # Errors
    /// `SwpcError::Model` when the vector length does not match the
    /// loaded coefficients.
    pub fn predict(&self, features: &[f64]) -> Result<f64, SwpcError> {
        if features.len() != self.coefficients.len() {
            return Err(SwpcError::Model(format!(
                "feature length mismatch: got {}, expected {}",
                features.len(),
                self.coefficients.len()
            )));
        }
        let dot: f64 = self
            .coefficients
            .iter()
            .zip(features)
            .map(|(coefficient, value)| coefficient * value)
            .sum();
        Ok(self.intercept + dot)
    }

    pub fn feature_count(&self) -> usize {
        self.coefficients.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
