use crate::generator::scene::SyntheticScene;
use crate::workflow::capabilities::{SceneDepthEstimator, SceneDetector, SceneSegmenter};
use crate::workflow::config::WorkflowConfig;
use crate::workflow::regressor::LinearRegressor;
use anyhow::Context;
use foodmasscore::interface::EstimationReport;
use foodmasscore::processing::{ImageAnalyzer, MassPipeline};
use foodmasscore::telemetry::MetricsSnapshot;
use log::info;
use std::sync::Arc;

pub struct WorkflowResult {
    pub report: EstimationReport,
    pub metrics: MetricsSnapshot,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub async fn execute(&self, scene: SyntheticScene) -> anyhow::Result<WorkflowResult> {
        let regressor = Arc::new(LinearRegressor::new(self.config.regressor.clone()));
        let pipeline = MassPipeline::new(self.config.pipeline.clone(), regressor)
            .context("building mass pipeline")?;

        info!(
            "analyzing {}x{} scene with {} objects",
            scene.image.width(),
            scene.image.height(),
            scene.detections.len()
        );
        let scene = Arc::new(scene);
        let analyzer = ImageAnalyzer::new(
            Arc::new(pipeline),
            Arc::new(SceneDetector::new(scene.clone())),
            Arc::new(SceneSegmenter::new(scene.clone())),
            Arc::new(SceneDepthEstimator::new(scene.clone())),
        );

        let report = analyzer
            .analyze(&scene.image)
            .await
            .context("analyzing synthetic scene")?;

        Ok(WorkflowResult {
            report,
            metrics: analyzer.pipeline().metrics(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::scene::{build_scene, DiscSpec, SceneConfig};
    use foodmasscore::interface::Degradation;
    use foodmasscore::prelude::PipelineConfig;

    fn small_workflow() -> WorkflowConfig {
        let scene = SceneConfig {
            resolution: 96,
            reference: Some(DiscSpec {
                name: "coin".into(),
                class_id: 0,
                center: [12, 12],
                radius_px: 6,
                height_m: 0.0,
                confidence: 0.9,
            }),
            items: vec![
                DiscSpec {
                    name: "rice".into(),
                    class_id: 1,
                    center: [50, 50],
                    radius_px: 20,
                    height_m: 0.35,
                    confidence: 0.8,
                },
                DiscSpec {
                    name: "lettuce".into(),
                    class_id: 3,
                    center: [80, 20],
                    radius_px: 10,
                    height_m: 0.05,
                    confidence: 0.7,
                },
            ],
            noise_m: 0.0,
            dropout: 0.0,
            ..Default::default()
        };
        WorkflowConfig {
            pipeline: PipelineConfig {
                working_resolution: 96,
                ..Default::default()
            },
            scene,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn runner_estimates_synthetic_plate() {
        let cfg = small_workflow();
        let scene = build_scene(&cfg.scene).unwrap();
        let result = Runner::new(cfg).execute(scene).await.unwrap();

        let names: Vec<_> = result
            .report
            .estimates
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["rice", "lettuce"]);
        let rice = result.report.mass_of("rice").unwrap();
        let lettuce = result.report.mass_of("lettuce").unwrap();
        assert!(rice > lettuce);
        assert!(!result.report.is_degraded());
        assert_eq!(result.metrics.runs, 1);
        assert_eq!(result.metrics.estimated, 2);
    }

    #[tokio::test]
    async fn runner_without_reference_reports_degradation() {
        let mut cfg = small_workflow();
        cfg.scene.reference = None;
        let scene = build_scene(&cfg.scene).unwrap();
        let result = Runner::new(cfg).execute(scene).await.unwrap();

        assert!(result.report.estimates.is_empty());
        assert_eq!(result.report.failures.len(), 2);
        assert!(result
            .report
            .degradations
            .contains(&Degradation::DepthReferenceUnavailable));
    }

    #[tokio::test]
    async fn runner_surfaces_resolution_mismatch() {
        let mut cfg = small_workflow();
        cfg.pipeline.working_resolution = 640;
        let scene = build_scene(&cfg.scene).unwrap();
        assert!(Runner::new(cfg).execute(scene).await.is_err());
    }
}
