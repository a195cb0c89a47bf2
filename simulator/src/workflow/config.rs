use crate::generator::scene::SceneConfig;
use crate::workflow::regressor::RegressorConfig;
use anyhow::{ensure, Context};
use foodmasscore::prelude::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub pipeline: PipelineConfig,
    pub scene: SceneConfig,
    pub regressor: RegressorConfig,
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        config
            .validate()
            .with_context(|| format!("validating workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    /// Scene masks and depth must be generated on the pipeline's working grid.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.scene.resolution == self.pipeline.working_resolution,
            "scene resolution {} does not match pipeline working resolution {}",
            self.scene.resolution,
            self.pipeline.working_resolution
        );
        Ok(())
    }

    /// Applies command-line overrides on top of the loaded values.
    pub fn with_overrides(
        mut self,
        seed: Option<u64>,
        plate_offset_cm: Option<f64>,
        reference_radius_cm: Option<f64>,
    ) -> Self {
        if let Some(seed) = seed {
            self.scene.seed = seed;
        }
        if let Some(offset) = plate_offset_cm {
            self.pipeline.coin_to_plate_offset_cm = offset;
        }
        if let Some(radius) = reference_radius_cm {
            self.pipeline.reference_radius_cm = radius;
        }
        self
    }
}
