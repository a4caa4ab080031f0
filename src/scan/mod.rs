//! Scanned images assembled from device frames.

mod assembler;
mod pixel;

pub use assembler::assemble_image;
pub use pixel::{Color, ColorModel};

use crate::frame::Frame;

/// Position of a frame inside an [`Image`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Gray, interleaved RGB or red data.
    Primary = 0,
    Green = 1,
    Blue = 2,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::Primary, Slot::Green, Slot::Blue];

    fn index(self) -> usize {
        self as usize
    }
}

/// A scanned image made of one or three frames.
///
/// Images are only produced by [`assemble_image`], which guarantees that the
/// primary slot is filled and that planar images carry all three planes of
/// identical geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    frames: [Option<Frame>; 3],
}

impl Image {
    pub(crate) fn from_slots(frames: [Option<Frame>; 3]) -> Self {
        Self { frames }
    }

    pub fn frame(&self, slot: Slot) -> Option<&Frame> {
        self.frames[slot.index()].as_ref()
    }

    pub(crate) fn primary(&self) -> Option<&Frame> {
        self.frame(Slot::Primary)
    }

    /// Width and height of the image in pixels.
    pub fn bounds(&self) -> (usize, usize) {
        self.primary().map_or((0, 0), |f| (f.width, f.height))
    }

    pub fn width(&self) -> usize {
        self.bounds().0
    }

    pub fn height(&self) -> usize {
        self.bounds().1
    }

    pub fn depth(&self) -> u8 {
        self.primary().map_or(0, |f| f.depth)
    }
}
