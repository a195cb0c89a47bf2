use crate::interface::frame::Mask;
use serde::{Deserialize, Serialize};

/// Pixel-space box in `(xmin, ymin, xmax, ymax)` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub xmin: i32,
    pub ymin: i32,
    pub xmax: i32,
    pub ymax: i32,
}

impl BoundingBox {
    pub fn new(xmin: i32, ymin: i32, xmax: i32, ymax: i32) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    pub fn width(&self) -> i32 {
        (self.xmax - self.xmin).max(0)
    }

    pub fn height(&self) -> i32 {
        (self.ymax - self.ymin).max(0)
    }
}

/// Labeled box emitted by the object detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub class_id: u32,
    pub name: String,
    pub confidence: f32,
    pub bounding_box: BoundingBox,
}

impl Detection {
    pub fn new(
        class_id: u32,
        name: impl Into<String>,
        confidence: f32,
        bounding_box: BoundingBox,
    ) -> Self {
        Self {
            class_id,
            name: name.into(),
            confidence,
            bounding_box,
        }
    }
}

/// A detection paired with the mask the segmenter produced for its box.
#[derive(Debug, Clone)]
pub struct SegmentedDetection {
    pub detection: Detection,
    pub mask: Mask,
}

impl SegmentedDetection {
    pub fn new(detection: Detection, mask: Mask) -> Self {
        Self { detection, mask }
    }
}
