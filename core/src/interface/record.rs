use crate::interface::detection::SegmentedDetection;
use crate::interface::frame::Mask;

/// Per-object state carried through calibration and integration.
///
/// `real_area` and `scale_factor` stay `None` until calibration succeeds and
/// are written at most once.
#[derive(Debug, Clone)]
pub struct SegmentationRecord {
    pub name: String,
    pub object_id: u32,
    pub confidence: f32,
    pub mask: Mask,
    pub pixel_area: usize,
    pub real_area: Option<f64>,
    pub scale_factor: Option<f64>,
}

impl SegmentationRecord {
    pub fn from_segmented(segmented: SegmentedDetection) -> Self {
        let pixel_area = segmented.mask.pixel_area();
        Self {
            name: segmented.detection.name,
            object_id: segmented.detection.class_id,
            confidence: segmented.detection.confidence,
            mask: segmented.mask,
            pixel_area,
            real_area: None,
            scale_factor: None,
        }
    }
}

/// Records in discovery order, keyed by object name.
///
/// A repeated food name replaces the earlier record in place. A repeated
/// reference label only replaces the earlier record when it is strictly more
/// confident.
#[derive(Debug, Clone)]
pub struct RecordSet {
    reference_label: String,
    records: Vec<SegmentationRecord>,
}

impl RecordSet {
    pub fn new(reference_label: impl Into<String>) -> Self {
        Self {
            reference_label: reference_label.into(),
            records: Vec::new(),
        }
    }

    pub fn from_segmented<I>(reference_label: impl Into<String>, segmented: I) -> Self
    where
        I: IntoIterator<Item = SegmentedDetection>,
    {
        let mut set = Self::new(reference_label);
        for item in segmented {
            set.insert(SegmentationRecord::from_segmented(item));
        }
        set
    }

    pub fn insert(&mut self, record: SegmentationRecord) {
        let is_reference = self.is_reference(&record);
        match self.records.iter_mut().find(|r| r.name == record.name) {
            Some(existing) => {
                if !is_reference || record.confidence > existing.confidence {
                    *existing = record;
                }
            }
            None => self.records.push(record),
        }
    }

    pub fn reference_label(&self) -> &str {
        &self.reference_label
    }

    pub fn is_reference(&self, record: &SegmentationRecord) -> bool {
        record.name == self.reference_label
    }

    pub fn reference(&self) -> Option<&SegmentationRecord> {
        self.records.iter().find(|r| self.is_reference(r))
    }

    /// Non-reference records, in discovery order.
    pub fn objects(&self) -> impl Iterator<Item = &SegmentationRecord> {
        self.records.iter().filter(move |r| !self.is_reference(r))
    }

    pub fn iter(&self) -> impl Iterator<Item = &SegmentationRecord> {
        self.records.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SegmentationRecord> {
        self.records.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
