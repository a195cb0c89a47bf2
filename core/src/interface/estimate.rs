use crate::prelude::ObjectError;
use serde::{Deserialize, Serialize};

/// One input row for the mass regressor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionRow {
    pub object_id: u32,
    /// Real-world area in cm².
    pub area: f64,
    /// Estimated volume in cm³.
    pub volume: f64,
}

/// Predicted mass for a named object, in the regressor's training unit (grams).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MassEstimate {
    pub name: String,
    pub mass: f64,
}

/// Non-fatal conditions that zeroed part of the estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Degradation {
    CalibrationUnavailable { reason: CalibrationFailure },
    DepthReferenceUnavailable,
    NoValidDepthSamples { name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationFailure {
    ReferenceMissing,
    ReferenceEmpty,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectFailure {
    pub name: String,
    pub error: ObjectError,
}

impl ObjectFailure {
    pub fn new(name: impl Into<String>, error: ObjectError) -> Self {
        Self {
            name: name.into(),
            error,
        }
    }
}

/// Outcome of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EstimationReport {
    pub estimates: Vec<MassEstimate>,
    pub failures: Vec<ObjectFailure>,
    pub degradations: Vec<Degradation>,
    pub scale_factor: Option<f64>,
    pub plane_depth: Option<f64>,
}

impl EstimationReport {
    pub fn is_degraded(&self) -> bool {
        !self.degradations.is_empty()
    }

    pub fn mass_of(&self, name: &str) -> Option<f64> {
        self.estimates
            .iter()
            .find(|estimate| estimate.name == name)
            .map(|estimate| estimate.mass)
    }
}
