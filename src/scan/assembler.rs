use super::{Image, Slot};
use crate::error::ScanError;
use crate::frame::{Frame, FrameFormat, FrameSource};
use log::{debug, error};

/// Reads frames from `source` until one completes the page and assembles
/// them into an image.
///
/// Errors from the source are returned unchanged.
pub fn assemble_image<S: FrameSource + ?Sized>(source: &mut S) -> Result<Image, ScanError> {
    let mut slots: [Option<Frame>; 3] = [None, None, None];
    loop {
        let frame = source.read_frame()?;
        let slot = match frame.format {
            FrameFormat::Gray | FrameFormat::Rgb | FrameFormat::Red => Slot::Primary,
            FrameFormat::Green => Slot::Green,
            FrameFormat::Blue => Slot::Blue,
            FrameFormat::Other(code) => {
                error!("Device sent frame with unknown type {}", code);
                return Err(ScanError::UnknownFrameFormat(code));
            }
        };
        debug!(
            "Frame {:?} -> slot {:?} ({}x{}, depth {})",
            frame.format, slot, frame.width, frame.height, frame.depth
        );

        let is_last = frame.is_last;
        slots[slot.index()] = Some(frame);
        if is_last {
            break;
        }
    }

    check_slots(&slots)?;
    Ok(Image::from_slots(slots))
}

fn check_slots(slots: &[Option<Frame>; 3]) -> Result<(), ScanError> {
    let Some(primary) = &slots[Slot::Primary.index()] else {
        return Err(ScanError::malformed("page ended without a gray, RGB or red frame"));
    };

    let planar = primary.format == FrameFormat::Red;
    for slot in [Slot::Green, Slot::Blue] {
        match (&slots[slot.index()], planar) {
            (None, true) => {
                return Err(ScanError::malformed(format!("page ended without a {:?} plane", slot)))
            }
            (Some(frame), false) => {
                return Err(ScanError::malformed(format!(
                    "{:?} frame cannot accompany a {:?} frame",
                    frame.format, primary.format
                )))
            }
            (Some(frame), true) if !same_geometry(primary, frame) => {
                return Err(ScanError::malformed(format!(
                    "{:?} plane is {}x{} at depth {}, red plane is {}x{} at depth {}",
                    slot,
                    frame.width,
                    frame.height,
                    frame.depth,
                    primary.width,
                    primary.height,
                    primary.depth
                )))
            }
            _ => {}
        }
    }
    Ok(())
}

fn same_geometry(a: &Frame, b: &Frame) -> bool {
    a.width == b.width && a.height == b.height && a.depth == b.depth
}
