//! In-process capabilities that replay a synthetic scene.

use crate::generator::scene::SyntheticScene;
use async_trait::async_trait;
use foodmasscore::interface::{
    BoundingBox, DepthEstimator, DepthMap, Detection, ImageFrame, Mask, ObjectDetector, Segmenter,
};
use foodmasscore::prelude::CapabilityError;
use std::sync::Arc;

pub struct SceneDetector {
    scene: Arc<SyntheticScene>,
}

pub struct SceneSegmenter {
    scene: Arc<SyntheticScene>,
}

pub struct SceneDepthEstimator {
    scene: Arc<SyntheticScene>,
}

impl SceneDetector {
    pub fn new(scene: Arc<SyntheticScene>) -> Self {
        Self { scene }
    }
}

impl SceneSegmenter {
    pub fn new(scene: Arc<SyntheticScene>) -> Self {
        Self { scene }
    }
}

impl SceneDepthEstimator {
    pub fn new(scene: Arc<SyntheticScene>) -> Self {
        Self { scene }
    }
}

#[async_trait]
impl ObjectDetector for SceneDetector {
    async fn detect(&self, _image: &ImageFrame) -> Result<Vec<Detection>, CapabilityError> {
        Ok(self.scene.detections.clone())
    }
}

#[async_trait]
impl Segmenter for SceneSegmenter {
    async fn segment(
        &self,
        _image: &ImageFrame,
        bounding_box: BoundingBox,
    ) -> Result<Mask, CapabilityError> {
        self.scene
            .mask_for(bounding_box)
            .cloned()
            .ok_or_else(|| CapabilityError::Failed(format!("no object in {:?}", bounding_box)))
    }
}

#[async_trait]
impl DepthEstimator for SceneDepthEstimator {
    async fn estimate_depth(&self, _image: &ImageFrame) -> Result<DepthMap, CapabilityError> {
        Ok(self.scene.depth.clone())
    }
}
