pub mod capability;
pub mod detection;
pub mod estimate;
pub mod frame;
pub mod record;

pub use capability::{DepthEstimator, MassRegressor, ObjectDetector, Segmenter};
pub use detection::{BoundingBox, Detection, SegmentedDetection};
pub use estimate::{
    CalibrationFailure, Degradation, EstimationReport, MassEstimate, ObjectFailure, RegressionRow,
};
pub use frame::{DepthMap, ImageFrame, Mask};
pub use record::{RecordSet, SegmentationRecord};
