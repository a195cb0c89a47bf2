//! Seams to the model-inference collaborators.
//!
//! Implementations own their models and devices; the pipeline only holds
//! them behind `Arc<dyn _>` for the duration of a request.

use crate::interface::detection::{BoundingBox, Detection};
use crate::interface::estimate::RegressionRow;
use crate::interface::frame::{DepthMap, ImageFrame, Mask};
use crate::prelude::CapabilityError;
use async_trait::async_trait;

#[async_trait]
pub trait ObjectDetector: Send + Sync {
    /// Detections in no particular order, confidence in `[0, 1]`.
    async fn detect(&self, image: &ImageFrame) -> Result<Vec<Detection>, CapabilityError>;
}

#[async_trait]
pub trait Segmenter: Send + Sync {
    /// Binary mask at the image's resolution for the object inside `bounding_box`.
    async fn segment(
        &self,
        image: &ImageFrame,
        bounding_box: BoundingBox,
    ) -> Result<Mask, CapabilityError>;
}

#[async_trait]
pub trait DepthEstimator: Send + Sync {
    /// Metric depth in meters, pixel-aligned with the image.
    async fn estimate_depth(&self, image: &ImageFrame) -> Result<DepthMap, CapabilityError>;
}

#[async_trait]
pub trait MassRegressor: Send + Sync {
    /// One prediction per row, in row order.
    async fn predict(&self, rows: &[RegressionRow]) -> Result<Vec<f64>, CapabilityError>;
}
