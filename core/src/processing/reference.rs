use crate::interface::record::SegmentationRecord;
use crate::math::grid::GridHelper;
use crate::telemetry::log::LogManager;
use ndarray::ArrayView2;

/// Where the reference object sits and how far it is from the camera.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReferenceGeometry {
    /// `(row, col)` of the reference mask centroid.
    pub pixel_centroid: Option<(usize, usize)>,
    /// Camera-to-reference-surface distance in cm.
    pub plane_depth: Option<f64>,
}

impl ReferenceGeometry {
    pub fn unavailable() -> Self {
        Self::default()
    }
}

/// Reads the reference plane depth at the reference mask's centroid.
pub struct DepthReferenceLocator {
    logger: LogManager,
}

impl DepthReferenceLocator {
    pub fn new() -> Self {
        Self {
            logger: LogManager::new("depth-reference"),
        }
    }

    pub fn locate(
        &self,
        reference: Option<&SegmentationRecord>,
        depth_cm: ArrayView2<f64>,
    ) -> ReferenceGeometry {
        let Some(reference) = reference else {
            self.logger
                .degraded("no reference object, plane depth unavailable");
            return ReferenceGeometry::unavailable();
        };

        if reference.mask.shape() != depth_cm.dim() {
            self.logger.degraded(&format!(
                "reference mask {:?} not aligned with depth grid {:?}",
                reference.mask.shape(),
                depth_cm.dim()
            ));
            return ReferenceGeometry::unavailable();
        }

        let Some(centroid) = GridHelper::centroid(reference.mask.view()) else {
            self.logger
                .degraded("reference mask is empty, plane depth unavailable");
            return ReferenceGeometry::unavailable();
        };

        // Zero and non-finite readings are missing depth, not a plane.
        let plane_depth = depth_cm
            .get(centroid)
            .copied()
            .filter(|depth| *depth != 0.0 && depth.is_finite());
        match plane_depth {
            Some(depth) => self.logger.record(&format!(
                "reference centroid {:?} at {:.2} cm",
                centroid, depth
            )),
            None => self.logger.degraded(&format!(
                "no valid depth at reference centroid {:?}, plane depth unavailable",
                centroid
            )),
        }

        ReferenceGeometry {
            pixel_centroid: Some(centroid),
            plane_depth,
        }
    }
}

impl Default for DepthReferenceLocator {
    fn default() -> Self {
        Self::new()
    }
}
