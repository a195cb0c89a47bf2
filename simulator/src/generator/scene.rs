use crate::generator::shapes::{dome_height, in_disc};
use anyhow::{ensure, Context};
use foodmasscore::interface::{BoundingBox, DepthMap, Detection, ImageFrame, Mask};
use foodmasscore::prelude::{DEFAULT_REFERENCE_LABEL, WORKING_RESOLUTION};
use ndarray::Array2;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Circular object placed on the plate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscSpec {
    pub name: String,
    pub class_id: u32,
    /// `[row, col]` in pixels.
    pub center: [usize; 2],
    pub radius_px: usize,
    /// Peak height above the table in meters; 0 for flat objects.
    #[serde(default)]
    pub height_m: f32,
    #[serde(default = "default_confidence")]
    pub confidence: f32,
}

fn default_confidence() -> f32 {
    0.9
}

/// Configuration for generating a synthetic plate photograph.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub resolution: usize,
    /// Camera-to-table distance in meters.
    pub table_depth_m: f32,
    pub reference: Option<DiscSpec>,
    pub items: Vec<DiscSpec>,
    /// Uniform depth jitter amplitude in meters.
    pub noise_m: f32,
    /// Probability that a pixel reads as missing (zero) depth.
    pub dropout: f64,
    pub seed: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            resolution: WORKING_RESOLUTION,
            table_depth_m: 0.8,
            reference: Some(DiscSpec {
                name: DEFAULT_REFERENCE_LABEL.to_string(),
                class_id: 0,
                center: [96, 96],
                radius_px: 40,
                height_m: 0.0,
                confidence: 0.95,
            }),
            items: vec![
                DiscSpec {
                    name: "rice".to_string(),
                    class_id: 1,
                    center: [320, 300],
                    radius_px: 120,
                    height_m: 0.32,
                    confidence: 0.88,
                },
                DiscSpec {
                    name: "chicken".to_string(),
                    class_id: 2,
                    center: [470, 470],
                    radius_px: 80,
                    height_m: 0.3,
                    confidence: 0.81,
                },
            ],
            noise_m: 0.002,
            dropout: 0.01,
            seed: 0,
        }
    }
}

/// Everything the in-process capabilities serve for one image.
#[derive(Debug, Clone)]
pub struct SyntheticScene {
    pub image: ImageFrame,
    pub detections: Vec<Detection>,
    pub masks: Vec<Mask>,
    pub depth: DepthMap,
}

impl SyntheticScene {
    /// Mask generated for the detection with this bounding box.
    pub fn mask_for(&self, bounding_box: BoundingBox) -> Option<&Mask> {
        self.detections
            .iter()
            .position(|d| d.bounding_box == bounding_box)
            .and_then(|idx| self.masks.get(idx))
    }
}

fn validate_disc(disc: &DiscSpec, resolution: usize) -> anyhow::Result<()> {
    let [row, col] = disc.center;
    ensure!(
        disc.radius_px > 0 && row < resolution && col < resolution,
        "object '{}' must have a positive radius and a center inside the {}px frame",
        disc.name,
        resolution
    );
    ensure!(
        (0.0..=1.0).contains(&disc.confidence),
        "object '{}' confidence {} outside [0, 1]",
        disc.name,
        disc.confidence
    );
    Ok(())
}

fn bounding_box(disc: &DiscSpec, resolution: usize) -> BoundingBox {
    let [row, col] = disc.center;
    let clamp = |v: usize| v.min(resolution) as i32;
    BoundingBox::new(
        col.saturating_sub(disc.radius_px) as i32,
        row.saturating_sub(disc.radius_px) as i32,
        clamp(col + disc.radius_px + 1),
        clamp(row + disc.radius_px + 1),
    )
}

fn build_image(resolution: usize, discs: &[&DiscSpec]) -> anyhow::Result<ImageFrame> {
    let mut pixels = Vec::with_capacity(resolution * resolution * ImageFrame::CHANNELS);
    for row in 0..resolution {
        for col in 0..resolution {
            let shade = discs
                .iter()
                .position(|d| in_disc(row, col, d.center, d.radius_px))
                .map(|idx| 80_u8.saturating_add((idx as u8).saturating_mul(40)))
                .unwrap_or(230);
            pixels.extend_from_slice(&[shade, shade, shade]);
        }
    }
    ImageFrame::new(resolution, resolution, pixels).context("assembling synthetic image")
}

pub fn build_scene(config: &SceneConfig) -> anyhow::Result<SyntheticScene> {
    let resolution = config.resolution;
    ensure!(resolution > 0, "scene resolution must be non-zero");
    ensure!(
        config.table_depth_m > 0.0,
        "table depth must be positive, got {}",
        config.table_depth_m
    );
    ensure!(
        (0.0..1.0).contains(&config.dropout),
        "dropout must be in [0, 1), got {}",
        config.dropout
    );

    let discs: Vec<&DiscSpec> = config.reference.iter().chain(config.items.iter()).collect();
    for disc in &discs {
        validate_disc(disc, resolution)?;
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let depth = Array2::from_shape_fn((resolution, resolution), |(row, col)| {
        if config.dropout > 0.0 && rng.gen_bool(config.dropout) {
            return 0.0;
        }
        let height = discs
            .iter()
            .map(|d| dome_height(row, col, d.center, d.radius_px, d.height_m))
            .fold(0.0_f32, f32::max);
        let jitter = if config.noise_m > 0.0 {
            rng.gen_range(-config.noise_m..config.noise_m)
        } else {
            0.0
        };
        (config.table_depth_m - height + jitter).max(0.0)
    });

    let detections = discs
        .iter()
        .map(|d| {
            Detection::new(
                d.class_id,
                d.name.clone(),
                d.confidence,
                bounding_box(d, resolution),
            )
        })
        .collect();
    let masks = discs
        .iter()
        .map(|d| {
            Mask::from_fn(resolution, resolution, |(r, c)| {
                in_disc(r, c, d.center, d.radius_px)
            })
        })
        .collect();

    Ok(SyntheticScene {
        image: build_image(resolution, &discs)?,
        detections,
        masks,
        depth: DepthMap::new(depth),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> SceneConfig {
        SceneConfig {
            resolution: 64,
            reference: Some(DiscSpec {
                name: "coin".into(),
                class_id: 0,
                center: [10, 10],
                radius_px: 4,
                height_m: 0.0,
                confidence: 0.9,
            }),
            items: vec![DiscSpec {
                name: "rice".into(),
                class_id: 1,
                center: [40, 40],
                radius_px: 12,
                height_m: 0.35,
                confidence: 0.8,
            }],
            noise_m: 0.0,
            dropout: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn scene_has_one_mask_per_detection() {
        let scene = build_scene(&small_config()).unwrap();
        assert_eq!(scene.detections.len(), 2);
        assert_eq!(scene.masks.len(), 2);
        assert_eq!(scene.depth.shape(), (64, 64));
        assert_eq!(scene.image.shape(), (64, 64));
        assert_eq!(scene.detections[0].name, "coin");
    }

    #[test]
    fn depth_rises_toward_food_peak() {
        let scene = build_scene(&small_config()).unwrap();
        let depth = scene.depth.view();
        assert!((depth[[10, 10]] - 0.8).abs() < 1e-6);
        assert!((depth[[40, 40]] - 0.45).abs() < 1e-6);
    }

    #[test]
    fn mask_lookup_by_bounding_box() {
        let scene = build_scene(&small_config()).unwrap();
        let rice_box = scene.detections[1].bounding_box;
        let mask = scene.mask_for(rice_box).unwrap();
        assert_eq!(mask.pixel_area(), scene.masks[1].pixel_area());
        assert!(scene.mask_for(BoundingBox::new(0, 0, 1, 1)).is_none());
    }

    #[test]
    fn same_seed_reproduces_depth() {
        let config = SceneConfig {
            noise_m: 0.01,
            dropout: 0.05,
            seed: 42,
            ..small_config()
        };
        let first = build_scene(&config).unwrap();
        let second = build_scene(&config).unwrap();
        assert_eq!(first.depth, second.depth);
    }

    #[test]
    fn object_outside_frame_is_rejected() {
        let mut config = small_config();
        config.items[0].center = [70, 10];
        assert!(build_scene(&config).is_err());
    }
}
