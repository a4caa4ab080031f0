use crate::scan::{ColorModel, Image};
use serde::Serialize;

/// Per-page summary printed by the command line tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSummary {
    pub page: usize,
    pub width: usize,
    pub height: usize,
    pub depth: u8,
    pub color_model: ColorModel,
    pub frames: usize,
    /// Mean red, green and blue level, scaled to 0.0..=1.0.
    pub mean: [f64; 3],
}

impl PageSummary {
    pub fn new(page: usize, image: &Image) -> Self {
        let (width, height) = image.bounds();
        let mut sums = [0u64; 3];
        for y in 0..height {
            for x in 0..width {
                let rgba = image.pixel_at(x, y).to_rgba16();
                for (sum, &v) in sums.iter_mut().zip(&rgba.0[..3]) {
                    *sum += u64::from(v);
                }
            }
        }
        let count = (width * height).max(1) as f64 * f64::from(u16::MAX);

        Self {
            page,
            width,
            height,
            depth: image.depth(),
            color_model: image.color_model(),
            frames: crate::scan::Slot::ALL
                .iter()
                .filter(|&&slot| image.frame(slot).is_some())
                .count(),
            mean: sums.map(|s| s as f64 / count),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
