use crate::interface::estimate::CalibrationFailure;
use crate::interface::record::RecordSet;
use crate::prelude::PipelineConfig;
use crate::processing::area::AreaResolver;
use crate::telemetry::log::LogManager;

/// Derives the pixel-to-cm² scale from the reference object and applies it.
pub struct ScaleCalibrator {
    reference_area_cm2: f64,
    logger: LogManager,
}

impl ScaleCalibrator {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            reference_area_cm2: config.reference_area_cm2(),
            logger: LogManager::new("calibration"),
        }
    }

    /// Stamps `scale_factor` on every record (reference included) and resolves
    /// real areas for the rest. Leaves the set untouched on failure.
    pub fn calibrate(&self, records: &mut RecordSet) -> Result<f64, CalibrationFailure> {
        let reference_pixels = match records.reference() {
            None => {
                self.logger.degraded(&format!(
                    "no '{}' detected, areas and volumes unavailable",
                    records.reference_label()
                ));
                return Err(CalibrationFailure::ReferenceMissing);
            }
            Some(reference) => reference.pixel_area,
        };

        if reference_pixels == 0 {
            self.logger
                .degraded("reference mask is empty, areas and volumes unavailable");
            return Err(CalibrationFailure::ReferenceEmpty);
        }

        let scale_factor = self.reference_area_cm2 / reference_pixels as f64;
        for record in records.iter_mut() {
            record.scale_factor = Some(scale_factor);
        }
        AreaResolver::resolve(records, scale_factor);

        self.logger.record(&format!(
            "scale factor {:.6} cm²/px from {} reference pixels",
            scale_factor, reference_pixels
        ));
        Ok(scale_factor)
    }
}
