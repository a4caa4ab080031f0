//! The "color pattern" test picture.
//!
//! Areas of 4 x 4 pixels sit one pixel apart from each other and from the
//! borders on a medium gray (0x55) background. Along a line of areas the level
//! climbs from black to full intensity; the next line of areas runs back down.
//! In color mode lines 1-2 are red, 3-4 green and 5-6 blue, repeating.

use crate::error::ScanError;
use crate::frame::{FrameFormat, Parameters};

pub const BACKGROUND: u8 = 0x55;

/// Filler written into the unreported pixels at the end of each row.
const PADDING: u8 = 0xAA;

fn ramp(x: usize, y: usize) -> Option<u8> {
    if x % 5 == 0 || y % 5 == 0 {
        return None;
    }
    let (x_pos, y_pos) = (x / 5, y / 5);
    let s = (x_pos % 0xFF) as u8;
    Some(if y_pos % 2 == 0 { s } else { 0xFF - s })
}

/// 8-bit gray level of the test picture at `(x, y)`.
pub fn gray_level(x: usize, y: usize) -> u8 {
    ramp(x, y).unwrap_or(BACKGROUND)
}

/// 8-bit red, green and blue levels of the test picture at `(x, y)`.
pub fn color_levels(x: usize, y: usize) -> [u8; 3] {
    match ramp(x, y) {
        None => [BACKGROUND; 3],
        Some(s) => match (y / 5) % 6 {
            0 | 1 => [s, 0, 0],
            2 | 3 => [0, s, 0],
            _ => [0, 0, s],
        },
    }
}

/// Which picture channels a frame carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Planes {
    Gray,
    Interleaved,
    Single(usize),
}

impl Planes {
    fn format(self) -> FrameFormat {
        match self {
            Planes::Gray => FrameFormat::Gray,
            Planes::Interleaved => FrameFormat::Rgb,
            Planes::Single(0) => FrameFormat::Red,
            Planes::Single(1) => FrameFormat::Green,
            Planes::Single(_) => FrameFormat::Blue,
        }
    }

    fn levels(self, x: usize, y: usize) -> ([u8; 3], usize) {
        match self {
            Planes::Gray => ([gray_level(x, y), 0, 0], 1),
            Planes::Interleaved => (color_levels(x, y), 3),
            Planes::Single(c) => ([color_levels(x, y)[c], 0, 0], 1),
        }
    }
}

/// Renders one frame of the test picture.
///
/// Each row carries `ppl_loss` extra pixels of filler that the returned
/// parameters do not report, so `bytes_per_line` exceeds what the reported
/// width needs. Fails with `NoMem` when the frame size overflows.
pub fn render(
    planes: Planes,
    width: usize,
    height: usize,
    depth: u8,
    ppl_loss: usize,
    last_frame: bool,
) -> Result<(Parameters, Vec<u8>), ScanError> {
    let padded = Parameters {
        format: planes.format(),
        last_frame,
        bytes_per_line: 0,
        pixels_per_line: width.checked_add(ppl_loss).ok_or(ScanError::NoMem)?,
        lines: Some(height),
        depth,
    };
    let params = Parameters {
        bytes_per_line: padded.min_bytes_per_line().ok_or(ScanError::NoMem)?,
        pixels_per_line: width,
        ..padded
    };

    let mut data = Vec::with_capacity(params.frame_len().ok_or(ScanError::NoMem)?);
    let mut row = Vec::with_capacity(params.bytes_per_line);
    for y in 0..height {
        row.clear();
        let mut bits = BitPacker::default();
        for x in 0..padded.pixels_per_line {
            let (levels, channels) = if x < width {
                planes.levels(x, y)
            } else {
                ([PADDING; 3], planes.format().channels())
            };
            for &level in &levels[..channels] {
                match depth {
                    1 => bits.push(&mut row, level >= 0x80),
                    16 => row.extend_from_slice(&(u16::from(level) * 257).to_ne_bytes()),
                    _ => row.push(level),
                }
            }
        }
        bits.flush(&mut row);
        row.resize(params.bytes_per_line, PADDING);
        data.extend_from_slice(&row);
    }

    Ok((params, data))
}

#[derive(Default)]
struct BitPacker {
    byte: u8,
    used: u8,
}

impl BitPacker {
    fn push(&mut self, out: &mut Vec<u8>, bit: bool) {
        if bit {
            self.byte |= 0x80 >> self.used;
        }
        self.used += 1;
        if self.used == 8 {
            out.push(self.byte);
            *self = Self::default();
        }
    }

    fn flush(&mut self, out: &mut Vec<u8>) {
        if self.used > 0 {
            out.push(self.byte);
            *self = Self::default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Frame;

    #[test]
    fn test_levels() {
        assert_eq!(gray_level(0, 3), BACKGROUND);
        assert_eq!(gray_level(6, 1), 1);
        assert_eq!(gray_level(6, 6), 0xFE);
        assert_eq!(color_levels(11, 11), [0, 2, 0]);
        assert_eq!(color_levels(11, 26), [0, 0, 0xFD]);
        assert_eq!(color_levels(5, 11), [BACKGROUND; 3]);
    }

    #[test]
    fn test_render_gray_matches_levels() {
        let (params, data) = render(Planes::Gray, 12, 12, 8, 0, true).unwrap();
        let frame = Frame::new(params, data).unwrap();
        for y in 0..12 {
            for x in 0..12 {
                assert_eq!(frame.sample(x, y, 0), u16::from(gray_level(x, y)));
            }
        }
    }

    #[test]
    fn test_render_padding_is_not_reported() {
        let (params, data) = render(Planes::Interleaved, 10, 2, 8, 7, false).unwrap();
        assert_eq!(params.pixels_per_line, 10);
        assert_eq!(params.bytes_per_line, 51);
        assert_eq!(data.len(), 102);
        assert!(!params.last_frame);
    }

    #[test]
    fn test_render_one_and_sixteen_bit() {
        let (params, data) = render(Planes::Single(2), 30, 30, 1, 0, true).unwrap();
        let frame = Frame::new(params, data).unwrap();
        assert_eq!(frame.format, FrameFormat::Blue);
        assert_eq!(frame.sample(0, 0, 0), 0);
        // Line 5 of areas is blue and its first area is dark.
        assert_eq!(frame.sample(1, 21, 0), 0);
        assert_eq!(frame.sample(1, 26, 0), 1);

        let (params, data) = render(Planes::Gray, 10, 10, 16, 3, true).unwrap();
        let frame = Frame::new(params, data).unwrap();
        assert_eq!(frame.sample(0, 0, 0), 0x5555);
        assert_eq!(frame.sample(6, 6, 0), 0xFEFE);
    }
}
