use crate::interface::capability::{DepthEstimator, ObjectDetector, Segmenter};
use crate::interface::detection::{Detection, SegmentedDetection};
use crate::interface::estimate::{EstimationReport, ObjectFailure};
use crate::interface::frame::{DepthMap, ImageFrame};
use crate::prelude::{ObjectError, PipelineError, PipelineResult};
use crate::processing::pipeline::MassPipeline;
use crate::telemetry::log::LogManager;
use std::sync::Arc;

/// Runs the model capabilities over one image and feeds the mass pipeline.
pub struct ImageAnalyzer {
    pipeline: Arc<MassPipeline>,
    detector: Arc<dyn ObjectDetector>,
    segmenter: Arc<dyn Segmenter>,
    depth: Arc<dyn DepthEstimator>,
    logger: LogManager,
}

impl ImageAnalyzer {
    pub fn new(
        pipeline: Arc<MassPipeline>,
        detector: Arc<dyn ObjectDetector>,
        segmenter: Arc<dyn Segmenter>,
        depth: Arc<dyn DepthEstimator>,
    ) -> Self {
        Self {
            pipeline,
            detector,
            segmenter,
            depth,
            logger: LogManager::new("analyzer"),
        }
    }

    pub fn pipeline(&self) -> &MassPipeline {
        &self.pipeline
    }

    /// Detect, then segment and estimate depth concurrently, then estimate masses.
    pub async fn analyze(&self, image: &ImageFrame) -> PipelineResult<EstimationReport> {
        let side = self.pipeline.config().working_resolution;
        if image.shape() != (side, side) {
            return Err(PipelineError::InvalidInput(format!(
                "image is {}x{}, expected {}x{} working resolution",
                image.width(),
                image.height(),
                side,
                side
            )));
        }

        let detections = self
            .detector
            .detect(image)
            .await
            .map_err(PipelineError::Detector)?;
        if detections.is_empty() {
            return Err(PipelineError::NoDetections);
        }
        self.logger
            .record(&format!("{} detections", detections.len()));

        let segmentation = self.segment_all(image, detections);
        let depth = self.estimate_depth(image);
        let ((segmented, mut failures), depth_map) = tokio::try_join!(segmentation, depth)?;

        if depth_map.shape() != image.shape() {
            return Err(PipelineError::InvalidInput(format!(
                "depth map {:?} not aligned with image {:?}",
                depth_map.shape(),
                image.shape()
            )));
        }

        let mut report = self.pipeline.estimate_masses(segmented, &depth_map).await?;
        failures.append(&mut report.failures);
        report.failures = failures;
        Ok(report)
    }

    /// One segmenter call per detection, in detection order.
    ///
    /// A failed detection is only reported when no other detection with the
    /// same name produced a mask.
    async fn segment_all(
        &self,
        image: &ImageFrame,
        detections: Vec<Detection>,
    ) -> PipelineResult<(Vec<SegmentedDetection>, Vec<ObjectFailure>)> {
        let mut segmented = Vec::with_capacity(detections.len());
        let mut failures = Vec::new();
        for detection in detections {
            match self.segmenter.segment(image, detection.bounding_box).await {
                Ok(mask) => segmented.push(SegmentedDetection::new(detection, mask)),
                Err(err) => {
                    self.logger
                        .degraded(&format!("{}: segmentation failed: {}", detection.name, err));
                    failures.push(ObjectFailure::new(
                        detection.name,
                        ObjectError::SegmentationFailed {
                            reason: err.to_string(),
                        },
                    ));
                }
            }
        }
        failures.retain(|failure: &ObjectFailure| {
            !segmented
                .iter()
                .any(|item| item.detection.name == failure.name)
        });
        Ok((segmented, failures))
    }

    async fn estimate_depth(&self, image: &ImageFrame) -> PipelineResult<DepthMap> {
        self.depth
            .estimate_depth(image)
            .await
            .map_err(PipelineError::DepthEstimator)
    }
}
