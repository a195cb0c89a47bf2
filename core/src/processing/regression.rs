use crate::interface::capability::MassRegressor;
use crate::interface::estimate::{MassEstimate, ObjectFailure, RegressionRow};
use crate::prelude::{ObjectError, PipelineError, PipelineResult};
use crate::telemetry::log::LogManager;
use std::sync::Arc;

/// An object that made it through integration and awaits a mass prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingObject {
    pub name: String,
    pub object_id: u32,
    pub real_area: Option<f64>,
    pub volume: f64,
}

/// Regressor batch plus the objects that could not join it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegressionBatch {
    pub names: Vec<String>,
    pub rows: Vec<RegressionRow>,
    pub rejected: Vec<ObjectFailure>,
}

/// Feeds per-object features to the mass regressor and pairs results with names.
pub struct MassPredictorAdapter {
    regressor: Arc<dyn MassRegressor>,
    logger: LogManager,
}

impl MassPredictorAdapter {
    pub fn new(regressor: Arc<dyn MassRegressor>) -> Self {
        Self {
            regressor,
            logger: LogManager::new("regression"),
        }
    }

    /// Builds rows in input order; objects without a real area are rejected.
    pub fn assemble(objects: Vec<PendingObject>) -> RegressionBatch {
        let mut batch = RegressionBatch::default();
        for object in objects {
            match object.real_area {
                Some(area) => {
                    batch.rows.push(RegressionRow {
                        object_id: object.object_id,
                        area,
                        volume: object.volume,
                    });
                    batch.names.push(object.name);
                }
                None => batch.rejected.push(ObjectFailure::new(
                    object.name,
                    ObjectError::RegressorInputInvalid,
                )),
            }
        }
        batch
    }

    pub async fn predict(
        &self,
        objects: Vec<PendingObject>,
    ) -> PipelineResult<(Vec<MassEstimate>, Vec<ObjectFailure>)> {
        let RegressionBatch {
            names,
            rows,
            rejected,
        } = Self::assemble(objects);

        for failure in &rejected {
            self.logger
                .degraded(&format!("{}: {}", failure.name, failure.error));
        }

        if rows.is_empty() {
            return Ok((Vec::new(), rejected));
        }

        let masses = self
            .regressor
            .predict(&rows)
            .await
            .map_err(PipelineError::RegressorUnavailable)?;
        if masses.len() != rows.len() {
            return Err(PipelineError::RegressorOutputMismatch {
                expected: rows.len(),
                actual: masses.len(),
            });
        }

        let estimates: Vec<MassEstimate> = names
            .into_iter()
            .zip(masses)
            .map(|(name, mass)| MassEstimate { name, mass })
            .collect();
        self.logger
            .record(&format!("predicted {} masses", estimates.len()));

        Ok((estimates, rejected))
    }
}
