use crate::interface::record::RecordSet;

/// Converts pixel areas into cm² once a scale factor is known.
pub struct AreaResolver;

impl AreaResolver {
    pub fn real_area(scale_factor: f64, pixel_area: usize) -> f64 {
        scale_factor * pixel_area as f64
    }

    /// Fills `real_area` for every non-reference record that has none yet.
    pub fn resolve(records: &mut RecordSet, scale_factor: f64) {
        let reference_label = records.reference_label().to_string();
        for record in records.iter_mut() {
            if record.name == reference_label || record.real_area.is_some() {
                continue;
            }
            record.real_area = Some(Self::real_area(scale_factor, record.pixel_area));
        }
    }
}
