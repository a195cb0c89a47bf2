use crate::math::stats::StatsHelper;
use ndarray::{ArrayView2, Zip};

pub struct GridHelper;

impl GridHelper {
    /// Mean `(row, col)` of the true cells, rounded to the nearest pixel.
    pub fn centroid(mask: ArrayView2<bool>) -> Option<(usize, usize)> {
        let (rows, cols): (Vec<f64>, Vec<f64>) = mask
            .indexed_iter()
            .filter(|&(_, &on)| on)
            .map(|((row, col), _)| (row as f64, col as f64))
            .unzip();

        let row = StatsHelper::mean(&rows)?;
        let col = StatsHelper::mean(&cols)?;
        Some((row.round() as usize, col.round() as usize))
    }

    /// Values under true mask cells, skipping zeros (missing samples) and non-finite reads.
    ///
    /// Callers must pass views of equal shape.
    pub fn masked_nonzero(mask: ArrayView2<bool>, values: ArrayView2<f64>) -> Vec<f64> {
        let mut samples = Vec::new();
        Zip::from(mask).and(values).for_each(|&on, &value| {
            if on && value != 0.0 && value.is_finite() {
                samples.push(value);
            }
        });
        samples
    }
}
