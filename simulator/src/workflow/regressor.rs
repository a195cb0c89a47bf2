use async_trait::async_trait;
use foodmasscore::interface::{MassRegressor, RegressionRow};
use foodmasscore::prelude::CapabilityError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coefficients {
    pub intercept: f64,
    pub area: f64,
    pub volume: f64,
}

impl Coefficients {
    fn apply(&self, row: &RegressionRow) -> f64 {
        self.intercept + self.area * row.area + self.volume * row.volume
    }
}

/// Linear stand-in for a trained mass regressor, one coefficient set per class.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegressorConfig {
    pub default: Coefficients,
    pub per_class: BTreeMap<u32, Coefficients>,
}

impl Default for RegressorConfig {
    fn default() -> Self {
        Self {
            default: Coefficients {
                intercept: 0.0,
                area: 0.05,
                volume: 0.6,
            },
            per_class: BTreeMap::new(),
        }
    }
}

pub struct LinearRegressor {
    config: RegressorConfig,
}

impl LinearRegressor {
    pub fn new(config: RegressorConfig) -> Self {
        Self { config }
    }

    fn coefficients(&self, object_id: u32) -> &Coefficients {
        self.config
            .per_class
            .get(&object_id)
            .unwrap_or(&self.config.default)
    }
}

#[async_trait]
impl MassRegressor for LinearRegressor {
    async fn predict(&self, rows: &[RegressionRow]) -> Result<Vec<f64>, CapabilityError> {
        rows.iter()
            .map(|row| {
                let mass = self.coefficients(row.object_id).apply(row);
                if mass.is_finite() {
                    Ok(mass)
                } else {
                    Err(CapabilityError::Failed(format!(
                        "non-finite prediction for class {}",
                        row.object_id
                    )))
                }
            })
            .collect()
    }
}
