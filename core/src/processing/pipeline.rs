use crate::interface::capability::MassRegressor;
use crate::interface::detection::SegmentedDetection;
use crate::interface::estimate::{Degradation, EstimationReport, ObjectFailure};
use crate::interface::frame::DepthMap;
use crate::interface::record::RecordSet;
use crate::prelude::{ObjectError, PipelineConfig, PipelineResult};
use crate::processing::calibration::ScaleCalibrator;
use crate::processing::reference::DepthReferenceLocator;
use crate::processing::regression::{MassPredictorAdapter, PendingObject};
use crate::processing::volume::{VolumeIntegrator, VolumeShortfall};
use crate::telemetry::log::LogManager;
use crate::telemetry::metrics::{MetricsRecorder, MetricsSnapshot};
use std::sync::Arc;

/// Calibrate, reference the depth plane, integrate, predict.
///
/// Holds no per-run state, so one instance can serve concurrent requests.
pub struct MassPipeline {
    config: PipelineConfig,
    calibrator: ScaleCalibrator,
    locator: DepthReferenceLocator,
    integrator: VolumeIntegrator,
    adapter: MassPredictorAdapter,
    metrics: MetricsRecorder,
    logger: LogManager,
}

impl MassPipeline {
    pub fn new(
        config: PipelineConfig,
        regressor: Arc<dyn MassRegressor>,
    ) -> PipelineResult<Self> {
        config.validate()?;
        Ok(Self {
            calibrator: ScaleCalibrator::new(&config),
            locator: DepthReferenceLocator::new(),
            integrator: VolumeIntegrator::new(&config),
            adapter: MassPredictorAdapter::new(regressor),
            metrics: MetricsRecorder::new(),
            logger: LogManager::new("pipeline"),
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Masks and the depth map must share one pixel grid.
    pub async fn estimate_masses(
        &self,
        detections: Vec<SegmentedDetection>,
        depth_map: &DepthMap,
    ) -> PipelineResult<EstimationReport> {
        self.metrics.record_run();
        if detections.is_empty() {
            self.logger.record("no detections, nothing to estimate");
            return Ok(EstimationReport::default());
        }

        let mut report = EstimationReport::default();
        let mut records =
            RecordSet::from_segmented(self.config.reference_label.clone(), detections);

        match self.calibrator.calibrate(&mut records) {
            Ok(scale_factor) => report.scale_factor = Some(scale_factor),
            Err(reason) => report
                .degradations
                .push(Degradation::CalibrationUnavailable { reason }),
        }

        let depth_cm = depth_map.to_centimeters(self.config.depth_unit_scale);
        let geometry = self.locator.locate(records.reference(), depth_cm.view());
        report.plane_depth = geometry.plane_depth;
        if geometry.plane_depth.is_none() {
            report.degradations.push(Degradation::DepthReferenceUnavailable);
        }

        let mut pending = Vec::new();
        for record in records.objects() {
            let volume = match self.integrator.integrate(record, depth_cm.view(), &geometry) {
                Ok(volume) => volume,
                Err(VolumeShortfall::MaskMisaligned { expected, actual }) => {
                    self.logger.degraded(&format!(
                        "{}: mask {:?} not aligned with depth grid {:?}",
                        record.name, actual, expected
                    ));
                    report.failures.push(ObjectFailure::new(
                        record.name.clone(),
                        ObjectError::MaskMisaligned { expected, actual },
                    ));
                    continue;
                }
                Err(VolumeShortfall::NoValidDepthSamples) => {
                    self.logger
                        .degraded(&format!("{}: no valid depth samples", record.name));
                    report.degradations.push(Degradation::NoValidDepthSamples {
                        name: record.name.clone(),
                    });
                    0.0
                }
                // Batch-wide causes, already reported above.
                Err(VolumeShortfall::NoPlaneDepth) | Err(VolumeShortfall::Uncalibrated) => 0.0,
            };

            pending.push(PendingObject {
                name: record.name.clone(),
                object_id: record.object_id,
                real_area: record.real_area,
                volume,
            });
        }

        let (estimates, rejected) = self.adapter.predict(pending).await?;
        report.estimates = estimates;
        report.failures.extend(rejected);

        self.metrics.record_outcome(
            report.estimates.len(),
            report.failures.len(),
            report.degradations.len(),
        );
        self.logger.record(&format!(
            "{} estimated, {} failed, {} degradations",
            report.estimates.len(),
            report.failures.len(),
            report.degradations.len()
        ));
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::detection::{BoundingBox, Detection};
    use crate::interface::estimate::{CalibrationFailure, RegressionRow};
    use crate::interface::frame::Mask;
    use crate::prelude::{CapabilityError, PipelineError};
    use async_trait::async_trait;
    use ndarray::Array2;
    use std::sync::Mutex;

    const SIDE: usize = 40;

    /// Echoes the volume back as the mass and keeps the last batch.
    #[derive(Default)]
    struct VolumeEcho {
        last: Mutex<Vec<RegressionRow>>,
    }

    #[async_trait]
    impl MassRegressor for VolumeEcho {
        async fn predict(&self, rows: &[RegressionRow]) -> Result<Vec<f64>, CapabilityError> {
            *self.last.lock().unwrap() = rows.to_vec();
            Ok(rows.iter().map(|row| row.volume).collect())
        }
    }

    fn square(
        name: &str,
        class_id: u32,
        top: usize,
        left: usize,
        side: usize,
    ) -> SegmentedDetection {
        let mask = Mask::from_fn(SIDE, SIDE, |(r, c)| {
            (top..top + side).contains(&r) && (left..left + side).contains(&c)
        });
        let bbox = BoundingBox::new(
            left as i32,
            top as i32,
            (left + side) as i32,
            (top + side) as i32,
        );
        SegmentedDetection::new(Detection::new(class_id, name, 0.9, bbox), mask)
    }

    /// Table at 0.80 m, food surface at 0.40 m inside rows/cols 20..30.
    fn depth() -> DepthMap {
        DepthMap::new(Array2::from_shape_fn((SIDE, SIDE), |(r, c)| {
            if (20..30).contains(&r) && (20..30).contains(&c) {
                0.4
            } else {
                0.8
            }
        }))
    }

    fn pipeline(regressor: Arc<VolumeEcho>) -> MassPipeline {
        MassPipeline::new(PipelineConfig::default(), regressor).unwrap()
    }

    #[tokio::test]
    async fn calibrated_run_estimates_every_food_item() {
        let regressor = Arc::new(VolumeEcho::default());
        let pipeline = pipeline(regressor.clone());
        let detections = vec![
            square("rice", 1, 20, 20, 10),
            square("coin", 0, 2, 2, 5),
            square("bread", 2, 5, 20, 8),
        ];

        let report = pipeline.estimate_masses(detections, &depth()).await.unwrap();
        assert!(!report.is_degraded());
        assert!(report.failures.is_empty());

        let scale = PipelineConfig::default().reference_area_cm2() / 25.0;
        assert!((report.scale_factor.unwrap() - scale).abs() < 1e-9);
        assert!((report.plane_depth.unwrap() - 80.0).abs() < 1e-4);

        let names: Vec<_> = report.estimates.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["rice", "bread"]);
        // 100 pixels, each (80 - 40) - 25 = 15 cm above the plate
        assert!((report.mass_of("rice").unwrap() - 1500.0 * scale).abs() < 1e-2);
        assert_eq!(report.mass_of("bread"), Some(0.0));

        let rows = regressor.last.lock().unwrap().clone();
        assert_eq!(rows[0].object_id, 1);
        assert!((rows[0].area - 100.0 * scale).abs() < 1e-9);
        assert!((rows[1].area - 64.0 * scale).abs() < 1e-9);
    }

    #[tokio::test]
    async fn missing_reference_excludes_every_object() {
        let pipeline = pipeline(Arc::new(VolumeEcho::default()));
        let detections = vec![square("rice", 1, 20, 20, 10), square("bread", 2, 5, 20, 8)];

        let report = pipeline.estimate_masses(detections, &depth()).await.unwrap();
        assert!(report.estimates.is_empty());
        assert_eq!(report.failures.len(), 2);
        assert!(report
            .failures
            .iter()
            .all(|f| f.error == ObjectError::RegressorInputInvalid));
        assert_eq!(
            report.degradations,
            vec![
                Degradation::CalibrationUnavailable {
                    reason: CalibrationFailure::ReferenceMissing
                },
                Degradation::DepthReferenceUnavailable,
            ]
        );
    }

    #[tokio::test]
    async fn empty_reference_mask_degrades_area_and_depth() {
        let pipeline = pipeline(Arc::new(VolumeEcho::default()));
        let coin = SegmentedDetection::new(
            Detection::new(0, "coin", 0.9, BoundingBox::new(0, 0, 4, 4)),
            Mask::empty(SIDE, SIDE),
        );
        let detections = vec![coin, square("rice", 1, 20, 20, 10)];

        let report = pipeline.estimate_masses(detections, &depth()).await.unwrap();
        assert!(report.estimates.is_empty());
        assert!(report.scale_factor.is_none());
        assert!(report.plane_depth.is_none());
        assert!(report.degradations.contains(&Degradation::CalibrationUnavailable {
            reason: CalibrationFailure::ReferenceEmpty
        }));
    }

    #[tokio::test]
    async fn object_without_depth_degrades_alone() {
        let pipeline = pipeline(Arc::new(VolumeEcho::default()));
        let mut meters = depth().view().to_owned();
        for r in 5..13 {
            for c in 20..28 {
                meters[[r, c]] = 0.0;
            }
        }
        let detections = vec![
            square("coin", 0, 2, 2, 5),
            square("bread", 2, 5, 20, 8),
            square("rice", 1, 20, 20, 10),
        ];

        let report = pipeline
            .estimate_masses(detections, &DepthMap::new(meters))
            .await
            .unwrap();
        assert_eq!(report.estimates.len(), 2);
        assert_eq!(report.mass_of("bread"), Some(0.0));
        assert!(report.mass_of("rice").unwrap() > 0.0);
        assert_eq!(
            report.degradations,
            vec![Degradation::NoValidDepthSamples {
                name: "bread".into()
            }]
        );
    }

    #[tokio::test]
    async fn missing_depth_under_reference_centroid_is_reported() {
        let pipeline = pipeline(Arc::new(VolumeEcho::default()));
        let mut meters = depth().view().to_owned();
        meters[[4, 4]] = 0.0;
        let detections = vec![square("coin", 0, 2, 2, 5), square("rice", 1, 20, 20, 10)];

        let report = pipeline
            .estimate_masses(detections, &DepthMap::new(meters))
            .await
            .unwrap();
        assert!(report.plane_depth.is_none());
        assert!(report.is_degraded());
        assert_eq!(
            report.degradations,
            vec![Degradation::DepthReferenceUnavailable]
        );
        assert_eq!(report.mass_of("rice"), Some(0.0));
    }

    #[tokio::test]
    async fn concurrent_runs_do_not_share_state() {
        let plate = || {
            vec![
                square("coin", 0, 2, 2, 5),
                square("rice", 1, 20, 20, 10),
                square("bread", 2, 5, 20, 8),
            ]
        };
        let bowl = || vec![square("coin", 0, 30, 2, 8), square("soup", 4, 18, 18, 14)];
        let plate_depth = depth();
        let bowl_depth = DepthMap::new(Array2::from_elem((SIDE, SIDE), 0.8_f32));

        let sequential = pipeline(Arc::new(VolumeEcho::default()));
        let expected_plate = sequential
            .estimate_masses(plate(), &plate_depth)
            .await
            .unwrap();
        let expected_bowl = sequential
            .estimate_masses(bowl(), &bowl_depth)
            .await
            .unwrap();

        let shared = Arc::new(pipeline(Arc::new(VolumeEcho::default())));
        let (first, second) = tokio::join!(
            shared.estimate_masses(plate(), &plate_depth),
            shared.estimate_masses(bowl(), &bowl_depth),
        );
        let first = first.unwrap();
        let second = second.unwrap();

        assert_eq!(first, expected_plate);
        assert_eq!(second, expected_bowl);
        assert_ne!(first.scale_factor, second.scale_factor);
        assert_eq!(shared.metrics().runs, 2);
    }

    #[tokio::test]
    async fn misaligned_mask_is_excluded() {
        let pipeline = pipeline(Arc::new(VolumeEcho::default()));
        let odd = SegmentedDetection::new(
            Detection::new(3, "egg", 0.7, BoundingBox::new(0, 0, 4, 4)),
            Mask::from_fn(SIDE + 1, SIDE, |_| true),
        );
        let detections = vec![square("coin", 0, 2, 2, 5), odd, square("rice", 1, 20, 20, 10)];

        let report = pipeline.estimate_masses(detections, &depth()).await.unwrap();
        assert_eq!(report.estimates.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].name, "egg");
    }

    #[tokio::test]
    async fn empty_detection_set_yields_empty_report() {
        let regressor = Arc::new(VolumeEcho::default());
        let pipeline = pipeline(regressor.clone());
        let report = pipeline.estimate_masses(Vec::new(), &depth()).await.unwrap();
        assert_eq!(report, EstimationReport::default());
        assert!(regressor.last.lock().unwrap().is_empty());
        assert_eq!(pipeline.metrics().runs, 1);
    }

    #[tokio::test]
    async fn only_reference_detected_yields_no_estimates() {
        let pipeline = pipeline(Arc::new(VolumeEcho::default()));
        let report = pipeline
            .estimate_masses(vec![square("coin", 0, 2, 2, 5)], &depth())
            .await
            .unwrap();
        assert!(report.estimates.is_empty());
        assert!(report.failures.is_empty());
        assert!(report.scale_factor.is_some());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = PipelineConfig {
            depth_unit_scale: 0.0,
            ..Default::default()
        };
        let result = MassPipeline::new(config, Arc::new(VolumeEcho::default()));
        assert!(matches!(result, Err(PipelineError::InvalidConfig(_))));
    }
}
