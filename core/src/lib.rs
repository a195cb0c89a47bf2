//! Calibrated volumetric mass estimation for plated food photographs.
//!
//! A reference object of known size ("coin") calibrates pixel areas into cm²,
//! its depth reading anchors the plate plane, and masked depth samples are
//! integrated into volumes before a learned regressor turns area and volume
//! into mass. Masks and depth maps share one square working grid (640×640 by
//! default); depth arrives in meters and is used in centimeters.

pub mod interface;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use interface::{
    DepthEstimator, EstimationReport, MassEstimate, MassRegressor, ObjectDetector, Segmenter,
};
pub use prelude::{PipelineConfig, PipelineError, PipelineResult};
pub use processing::{ImageAnalyzer, MassPipeline};
