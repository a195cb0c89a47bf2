use crate::prelude::{PipelineError, PipelineResult};
use ndarray::{Array2, ArrayView2};

/// Interleaved RGB8 image handed to the model capabilities.
#[derive(Debug, Clone)]
pub struct ImageFrame {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl ImageFrame {
    pub const CHANNELS: usize = 3;

    pub fn new(width: usize, height: usize, pixels: Vec<u8>) -> PipelineResult<Self> {
        let expected = width
            .checked_mul(height)
            .and_then(|area| area.checked_mul(Self::CHANNELS))
            .ok_or_else(|| {
                PipelineError::InvalidInput(format!("{}x{} RGB frame is too large", width, height))
            })?;
        if pixels.len() != expected {
            return Err(PipelineError::InvalidInput(format!(
                "expected {} bytes for {}x{} RGB frame, got {}",
                expected,
                width,
                height,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn blank(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height * Self::CHANNELS],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// `(rows, cols)`, matching the layout of masks and depth maps.
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }
}

/// Binary instance mask, indexed `[row, col]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    cells: Array2<bool>,
}

impl Mask {
    pub fn new(cells: Array2<bool>) -> Self {
        Self { cells }
    }

    pub fn empty(rows: usize, cols: usize) -> Self {
        Self::new(Array2::from_elem((rows, cols), false))
    }

    pub fn from_fn<F>(rows: usize, cols: usize, f: F) -> Self
    where
        F: FnMut((usize, usize)) -> bool,
    {
        Self::new(Array2::from_shape_fn((rows, cols), f))
    }

    pub fn shape(&self) -> (usize, usize) {
        self.cells.dim()
    }

    pub fn view(&self) -> ArrayView2<'_, bool> {
        self.cells.view()
    }

    /// Number of cells set to true.
    pub fn pixel_area(&self) -> usize {
        self.cells.iter().filter(|&&on| on).count()
    }
}

/// Per-pixel metric depth in the estimator's native unit (meters), indexed `[row, col]`.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthMap {
    meters: Array2<f32>,
}

impl DepthMap {
    pub fn new(meters: Array2<f32>) -> Self {
        Self { meters }
    }

    pub fn from_shape_vec(rows: usize, cols: usize, values: Vec<f32>) -> PipelineResult<Self> {
        let meters = Array2::from_shape_vec((rows, cols), values)
            .map_err(|err| PipelineError::InvalidInput(format!("depth map shape: {}", err)))?;
        Ok(Self::new(meters))
    }

    pub fn shape(&self) -> (usize, usize) {
        self.meters.dim()
    }

    pub fn view(&self) -> ArrayView2<'_, f32> {
        self.meters.view()
    }

    /// Rescales into the working unit; zero (missing) depth stays zero.
    pub fn to_centimeters(&self, unit_scale: f64) -> Array2<f64> {
        self.meters.mapv(|value| f64::from(value) * unit_scale)
    }
}
