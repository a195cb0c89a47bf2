use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Side length, in pixels, of the square grid masks and depth maps are resampled to upstream.
pub const WORKING_RESOLUTION: usize = 640;
pub const DEFAULT_REFERENCE_LABEL: &str = "coin";
/// Radius of the reference object in centimeters; its area `π·r²` is in cm².
pub const DEFAULT_REFERENCE_RADIUS_CM: f64 = 13.0;
/// Vertical distance between the reference object's surface and the supporting plate.
pub const DEFAULT_COIN_TO_PLATE_OFFSET_CM: f64 = 25.0;
/// Depth estimators report meters; everything downstream works in centimeters.
pub const METERS_TO_CENTIMETERS: f64 = 100.0;

/// Shared configuration for every pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub reference_label: String,
    pub reference_radius_cm: f64,
    pub coin_to_plate_offset_cm: f64,
    pub depth_unit_scale: f64,
    pub working_resolution: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            reference_label: DEFAULT_REFERENCE_LABEL.to_string(),
            reference_radius_cm: DEFAULT_REFERENCE_RADIUS_CM,
            coin_to_plate_offset_cm: DEFAULT_COIN_TO_PLATE_OFFSET_CM,
            depth_unit_scale: METERS_TO_CENTIMETERS,
            working_resolution: WORKING_RESOLUTION,
        }
    }
}

impl PipelineConfig {
    /// Known physical area of the reference object in cm².
    pub fn reference_area_cm2(&self) -> f64 {
        PI * self.reference_radius_cm * self.reference_radius_cm
    }

    pub fn validate(&self) -> PipelineResult<()> {
        if self.reference_label.trim().is_empty() {
            return Err(PipelineError::InvalidConfig(
                "reference label must not be empty".into(),
            ));
        }
        if !(self.reference_radius_cm.is_finite() && self.reference_radius_cm > 0.0) {
            return Err(PipelineError::InvalidConfig(format!(
                "reference radius must be positive, got {}",
                self.reference_radius_cm
            )));
        }
        if !(self.coin_to_plate_offset_cm.is_finite() && self.coin_to_plate_offset_cm >= 0.0) {
            return Err(PipelineError::InvalidConfig(format!(
                "plate offset must be non-negative, got {}",
                self.coin_to_plate_offset_cm
            )));
        }
        if !(self.depth_unit_scale.is_finite() && self.depth_unit_scale > 0.0) {
            return Err(PipelineError::InvalidConfig(format!(
                "depth unit scale must be positive, got {}",
                self.depth_unit_scale
            )));
        }
        if self.working_resolution == 0 {
            return Err(PipelineError::InvalidConfig(
                "working resolution must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// Failure reported by one of the external model capabilities.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CapabilityError {
    #[error("capability unavailable: {0}")]
    Unavailable(String),
    #[error("inference failed: {0}")]
    Failed(String),
}

/// Failures that abort a whole pipeline run.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("no objects detected in image")]
    NoDetections,
    #[error("object detector failed")]
    Detector(#[source] CapabilityError),
    #[error("depth estimator failed")]
    DepthEstimator(#[source] CapabilityError),
    #[error("mass regressor unavailable")]
    RegressorUnavailable(#[source] CapabilityError),
    #[error("mass regressor returned {actual} predictions for {expected} rows")]
    RegressorOutputMismatch { expected: usize, actual: usize },
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Failures local to one object; the object is left out of the estimates.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObjectError {
    #[error("no resolved real-world area to feed the regressor")]
    RegressorInputInvalid,
    #[error("mask shape {actual:?} does not match depth grid {expected:?}")]
    MaskMisaligned {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    #[error("segmentation failed: {reason}")]
    SegmentationFailed { reason: String },
}
