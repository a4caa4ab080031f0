use super::{Image, Slot};
use crate::error::ScanError;
use crate::frame::{Frame, FrameFormat};
use image::{ColorType, DynamicImage, ImageBuffer, Luma, Rgba};
use serde::Serialize;

const OPAQUE8: u8 = 0xFF;
const OPAQUE16: u16 = 0xFFFF;

/// Color model of a scanned image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ColorModel {
    Gray8,
    Gray16,
    /// 8-bit RGB with a fixed opaque alpha.
    Rgba8,
    /// 16-bit RGB with a fixed opaque alpha.
    Rgba16,
}

impl ColorModel {
    pub fn color_type(self) -> ColorType {
        match self {
            ColorModel::Gray8 => ColorType::L8,
            ColorModel::Gray16 => ColorType::L16,
            ColorModel::Rgba8 => ColorType::Rgba8,
            ColorModel::Rgba16 => ColorType::Rgba16,
        }
    }
}

/// Color of a single pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Gray(Luma<u8>),
    Gray16(Luma<u16>),
    Rgba(Rgba<u8>),
    Rgba64(Rgba<u16>),
}

impl Color {
    /// Fully transparent black, returned for pixels outside the image.
    pub const TRANSPARENT: Color = Color::Rgba(Rgba([0, 0, 0, 0]));

    /// The color widened to 16 bits per channel.
    pub fn to_rgba16(self) -> Rgba<u16> {
        let wide = |v: u8| u16::from(v) * 0x101;
        match self {
            Color::Gray(Luma([v])) => Rgba([wide(v), wide(v), wide(v), OPAQUE16]),
            Color::Gray16(Luma([v])) => Rgba([v, v, v, OPAQUE16]),
            Color::Rgba(Rgba(c)) => Rgba(c.map(wide)),
            Color::Rgba64(c) => c,
        }
    }
}

impl Image {
    /// Color model, derived from the format and depth of the primary frame.
    pub fn color_model(&self) -> ColorModel {
        let Some(f) = self.primary() else {
            return ColorModel::Rgba8;
        };
        match (f.format == FrameFormat::Gray, f.depth == 16) {
            (true, false) => ColorModel::Gray8,
            (true, true) => ColorModel::Gray16,
            (false, false) => ColorModel::Rgba8,
            (false, true) => ColorModel::Rgba16,
        }
    }

    /// Color of the pixel at `(x, y)`.
    ///
    /// Coordinates outside [`Image::bounds`] yield [`Color::TRANSPARENT`].
    pub fn pixel_at(&self, x: usize, y: usize) -> Color {
        let Some(p) = self.primary() else {
            return Color::TRANSPARENT;
        };
        if x >= p.width || y >= p.height {
            return Color::TRANSPARENT;
        }

        if p.format == FrameFormat::Gray {
            let v = p.sample(x, y, 0);
            return match p.depth {
                1 => Color::Gray(Luma([(0xFF * v) as u8])),
                8 => Color::Gray(Luma([v as u8])),
                16 => Color::Gray16(Luma([v])),
                _ => Color::TRANSPARENT,
            };
        }

        let Some([r, g, b]) = self.rgb_samples(p, x, y) else {
            return Color::TRANSPARENT;
        };
        match p.depth {
            1 => Color::Rgba(Rgba([(0xFF * r) as u8, (0xFF * g) as u8, (0xFF * b) as u8, OPAQUE8])),
            8 => Color::Rgba(Rgba([r as u8, g as u8, b as u8, OPAQUE8])),
            16 => Color::Rgba64(Rgba([r, g, b, OPAQUE16])),
            _ => Color::TRANSPARENT,
        }
    }

    fn rgb_samples(&self, p: &Frame, x: usize, y: usize) -> Option<[u16; 3]> {
        if p.format == FrameFormat::Rgb {
            return Some([p.sample(x, y, 0), p.sample(x, y, 1), p.sample(x, y, 2)]);
        }
        let g = self.frame(Slot::Green)?;
        let b = self.frame(Slot::Blue)?;
        Some([p.sample(x, y, 0), g.sample(x, y, 0), b.sample(x, y, 0)])
    }

    /// Copies the image into an `image` crate buffer of its color model.
    pub fn to_dynamic_image(&self) -> Result<DynamicImage, ScanError> {
        let (w, h) = self.bounds();
        let (Ok(width), Ok(height)) = (u32::try_from(w), u32::try_from(h)) else {
            return Err(ScanError::malformed(format!("{}x{} image is too large", w, h)));
        };
        let at = |x: u32, y: u32| self.pixel_at(x as usize, y as usize);
        let luma8 = |x, y| match at(x, y) {
            Color::Gray(p) => p,
            _ => Luma([0]),
        };
        let luma16 = |x, y| match at(x, y) {
            Color::Gray16(p) => p,
            _ => Luma([0]),
        };
        let rgba8 = |x, y| match at(x, y) {
            Color::Rgba(p) => p,
            _ => Rgba([0; 4]),
        };
        let rgba16 = |x, y| at(x, y).to_rgba16();

        Ok(match self.color_model() {
            ColorModel::Gray8 => {
                DynamicImage::ImageLuma8(ImageBuffer::from_fn(width, height, luma8))
            }
            ColorModel::Gray16 => {
                DynamicImage::ImageLuma16(ImageBuffer::from_fn(width, height, luma16))
            }
            ColorModel::Rgba8 => {
                DynamicImage::ImageRgba8(ImageBuffer::from_fn(width, height, rgba8))
            }
            ColorModel::Rgba16 => {
                DynamicImage::ImageRgba16(ImageBuffer::from_fn(width, height, rgba16))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::test_frames::frame;
    use rand::Rng;

    fn gray(depth: u8, data: Vec<u8>) -> Image {
        single(frame(FrameFormat::Gray, 2, 2, depth, true, data))
    }

    fn single(frame: Frame) -> Image {
        Image::from_slots([Some(frame), None, None])
    }

    fn u16_bytes(values: &[u16]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_ne_bytes()).collect()
    }

    #[test]
    fn test_color_model_table() {
        assert_eq!(gray(1, vec![0, 0]).color_model(), ColorModel::Gray8);
        assert_eq!(gray(8, vec![0; 4]).color_model(), ColorModel::Gray8);
        assert_eq!(gray(16, vec![0; 8]).color_model(), ColorModel::Gray16);

        let rgb8 = single(frame(FrameFormat::Rgb, 1, 1, 8, true, vec![0; 3]));
        assert_eq!(rgb8.color_model(), ColorModel::Rgba8);
        let rgb16 = single(frame(FrameFormat::Rgb, 1, 1, 16, true, vec![0; 6]));
        assert_eq!(rgb16.color_model(), ColorModel::Rgba16);
        assert_eq!(rgb16.color_model().color_type(), ColorType::Rgba16);
    }

    #[test]
    fn test_gray_pixels_per_depth() {
        let one = gray(1, vec![0b0100_0000, 0b1000_0000]);
        assert_eq!(one.pixel_at(0, 0), Color::Gray(Luma([0])));
        assert_eq!(one.pixel_at(1, 0), Color::Gray(Luma([255])));
        assert_eq!(one.pixel_at(0, 1), Color::Gray(Luma([255])));

        let eight = gray(8, vec![10, 20, 30, 40]);
        assert_eq!(eight.pixel_at(1, 1), Color::Gray(Luma([40])));

        let sixteen = gray(16, u16_bytes(&[1, 2, 3, 0xBEEF]));
        assert_eq!(sixteen.pixel_at(1, 1), Color::Gray16(Luma([0xBEEF])));
    }

    #[test]
    fn test_color_pixels_per_depth() {
        let one = single(frame(FrameFormat::Rgb, 1, 1, 1, true, vec![0b1010_0000]));
        assert_eq!(one.pixel_at(0, 0), Color::Rgba(Rgba([255, 0, 255, 255])));

        let sixteen = Image::from_slots([
            Some(frame(FrameFormat::Rgb, 1, 1, 16, true, u16_bytes(&[1, 0x8000, 0xFFFF]))),
            None,
            None,
        ]);
        assert_eq!(sixteen.pixel_at(0, 0), Color::Rgba64(Rgba([1, 0x8000, 0xFFFF, 0xFFFF])));
    }

    #[test]
    fn test_out_of_bounds_is_transparent() {
        let images = [
            gray(1, vec![0xFF, 0xFF]),
            gray(8, vec![1; 4]),
            gray(16, vec![1; 8]),
            single(frame(FrameFormat::Rgb, 2, 2, 8, true, vec![9; 12])),
        ];
        for image in &images {
            assert_eq!(image.pixel_at(2, 0), Color::TRANSPARENT);
            assert_eq!(image.pixel_at(0, 2), Color::TRANSPARENT);
            assert_eq!(image.pixel_at(usize::MAX, usize::MAX), Color::TRANSPARENT);
        }
    }

    #[test]
    fn test_missing_plane_is_transparent() {
        let image = single(frame(FrameFormat::Red, 1, 1, 8, true, vec![5]));
        assert_eq!(image.pixel_at(0, 0), Color::TRANSPARENT);
    }

    #[test]
    fn test_planar_and_interleaved_agree() {
        let mut rng = rand::thread_rng();
        for depth in [1u8, 8, 16] {
            let (w, h) = (13, 5);
            let planes: Vec<Vec<u16>> = (0..3)
                .map(|_| {
                    (0..w * h)
                        .map(|_| match depth {
                            1 => rng.gen_range(0..2),
                            8 => rng.gen_range(0..=0xFF),
                            _ => rng.gen(),
                        })
                        .collect()
                })
                .collect();

            let pack = |samples: &[u16], channels: usize| -> Vec<u8> {
                let mut out = Vec::new();
                for row in samples.chunks(w * channels) {
                    match depth {
                        1 => {
                            let mut bytes = vec![0u8; (w * channels).div_ceil(8)];
                            for (i, &s) in row.iter().enumerate() {
                                bytes[i / 8] |= (s as u8) << (7 - i % 8);
                            }
                            out.extend(bytes);
                        }
                        8 => out.extend(row.iter().map(|&s| s as u8)),
                        _ => out.extend(u16_bytes(row)),
                    }
                }
                out
            };

            let interleaved: Vec<u16> = (0..w * h)
                .flat_map(|i| [planes[0][i], planes[1][i], planes[2][i]])
                .collect();
            let rgb = Image::from_slots([
                Some(frame(FrameFormat::Rgb, w, h, depth, true, pack(&interleaved, 3))),
                None,
                None,
            ]);
            let planar = Image::from_slots([
                Some(frame(FrameFormat::Red, w, h, depth, false, pack(&planes[0], 1))),
                Some(frame(FrameFormat::Green, w, h, depth, false, pack(&planes[1], 1))),
                Some(frame(FrameFormat::Blue, w, h, depth, true, pack(&planes[2], 1))),
            ]);

            assert_eq!(rgb.color_model(), planar.color_model());
            for y in 0..h {
                for x in 0..w {
                    assert_eq!(
                        rgb.pixel_at(x, y),
                        planar.pixel_at(x, y),
                        "depth {} at ({}, {})",
                        depth,
                        x,
                        y
                    );
                }
            }
        }
    }

    #[test]
    fn test_to_rgba16() {
        assert_eq!(Color::Gray(Luma([0x12])).to_rgba16(), Rgba([0x1212, 0x1212, 0x1212, 0xFFFF]));
        assert_eq!(Color::TRANSPARENT.to_rgba16(), Rgba([0; 4]));
    }

    #[test]
    fn test_to_dynamic_image() {
        let image = gray(8, vec![10, 20, 30, 40]);
        let dynamic = image.to_dynamic_image().unwrap();
        assert_eq!(dynamic.color(), ColorType::L8);
        let luma = dynamic.as_luma8().unwrap();
        assert_eq!(luma.dimensions(), (2, 2));
        assert_eq!(luma.get_pixel(0, 1), &Luma([30]));

        let rgb = single(frame(FrameFormat::Rgb, 1, 1, 8, true, vec![1, 2, 3]));
        let dynamic = rgb.to_dynamic_image().unwrap();
        assert_eq!(dynamic.as_rgba8().unwrap().get_pixel(0, 0), &Rgba([1, 2, 3, 255]));
    }
}
