pub mod analyzer;
pub mod area;
pub mod calibration;
pub mod pipeline;
pub mod reference;
pub mod regression;
pub mod volume;

pub use analyzer::ImageAnalyzer;
pub use area::AreaResolver;
pub use calibration::ScaleCalibrator;
pub use pipeline::MassPipeline;
pub use reference::{DepthReferenceLocator, ReferenceGeometry};
pub use regression::{MassPredictorAdapter, PendingObject, RegressionBatch};
pub use volume::{VolumeIntegrator, VolumeShortfall};
