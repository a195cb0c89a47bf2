use crate::interface::record::SegmentationRecord;
use crate::math::grid::GridHelper;
use crate::math::stats::StatsHelper;
use crate::prelude::PipelineConfig;
use crate::processing::reference::ReferenceGeometry;
use crate::telemetry::log::LogManager;
use ndarray::ArrayView2;

/// Why an object could not be integrated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeShortfall {
    MaskMisaligned {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    NoValidDepthSamples,
    NoPlaneDepth,
    Uncalibrated,
}

/// Turns masked depth samples into a volume above the plate.
pub struct VolumeIntegrator {
    plate_offset_cm: f64,
    logger: LogManager,
}

impl VolumeIntegrator {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            plate_offset_cm: config.coin_to_plate_offset_cm,
            logger: LogManager::new("volume"),
        }
    }

    /// Food height above the plate at one pixel; never negative.
    pub fn elevation(plane_depth: f64, sample: f64, plate_offset: f64) -> f64 {
        let above_reference = (plane_depth - sample).max(0.0);
        (above_reference - plate_offset).max(0.0)
    }

    /// Volume in cm³.
    ///
    /// The sum of per-pixel elevations is multiplied by the area scale factor
    /// once, not squared.
    pub fn integrate(
        &self,
        record: &SegmentationRecord,
        depth_cm: ArrayView2<f64>,
        geometry: &ReferenceGeometry,
    ) -> Result<f64, VolumeShortfall> {
        if record.mask.shape() != depth_cm.dim() {
            return Err(VolumeShortfall::MaskMisaligned {
                expected: depth_cm.dim(),
                actual: record.mask.shape(),
            });
        }

        let samples = GridHelper::masked_nonzero(record.mask.view(), depth_cm);
        if samples.is_empty() {
            return Err(VolumeShortfall::NoValidDepthSamples);
        }
        let plane_depth = geometry.plane_depth.ok_or(VolumeShortfall::NoPlaneDepth)?;
        let scale_factor = record.scale_factor.ok_or(VolumeShortfall::Uncalibrated)?;

        let elevations: Vec<f64> = samples
            .iter()
            .map(|&sample| Self::elevation(plane_depth, sample, self.plate_offset_cm))
            .collect();
        let volume = elevations.iter().sum::<f64>() * scale_factor;

        self.logger.trace(&format!(
            "{}: {} samples, peak elevation {:.2} cm, volume {:.2} cm³",
            record.name,
            samples.len(),
            StatsHelper::max(&elevations).unwrap_or(0.0),
            volume
        ));
        Ok(volume)
    }
}
