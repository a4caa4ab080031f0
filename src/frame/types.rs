use crate::error::ScanError;

/// Layout of the samples carried by one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameFormat {
    /// Single-channel grayscale.
    Gray,
    /// Interleaved red, green and blue samples.
    Rgb,
    Red,
    Green,
    Blue,
    /// A protocol value outside the recognized set.
    Other(u32),
}

impl FrameFormat {
    pub fn from_raw(code: u32) -> Self {
        match code {
            0 => FrameFormat::Gray,
            1 => FrameFormat::Rgb,
            2 => FrameFormat::Red,
            3 => FrameFormat::Green,
            4 => FrameFormat::Blue,
            other => FrameFormat::Other(other),
        }
    }

    pub fn raw(self) -> u32 {
        match self {
            FrameFormat::Gray => 0,
            FrameFormat::Rgb => 1,
            FrameFormat::Red => 2,
            FrameFormat::Green => 3,
            FrameFormat::Blue => 4,
            FrameFormat::Other(code) => code,
        }
    }

    /// Samples per pixel in a frame of this format.
    pub fn channels(self) -> usize {
        match self {
            FrameFormat::Rgb => 3,
            _ => 1,
        }
    }
}

/// Frame description reported by the device when a frame is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameters {
    pub format: FrameFormat,
    pub last_frame: bool,
    pub bytes_per_line: usize,
    pub pixels_per_line: usize,
    /// `None` when the device cannot tell the height in advance, as with
    /// hand scanners; the frame then ends when the data does.
    pub lines: Option<usize>,
    pub depth: u8,
}

impl Parameters {
    /// Bytes needed to hold one row of samples, without padding.
    ///
    /// `None` if the row size does not fit in `usize`.
    pub fn min_bytes_per_line(&self) -> Option<usize> {
        let samples = self.pixels_per_line.checked_mul(self.format.channels())?;
        match self.depth {
            1 => Some(samples.div_ceil(8)),
            16 => samples.checked_mul(2),
            _ => Some(samples),
        }
    }

    /// Total frame size in bytes, if the line count is known and the size
    /// fits in `usize`.
    pub fn frame_len(&self) -> Option<usize> {
        self.bytes_per_line.checked_mul(self.lines?)
    }

    /// Checks that the reported geometry describes a frame that can exist.
    pub fn validate(&self) -> Result<(), ScanError> {
        if !matches!(self.depth, 1 | 8 | 16) {
            return Err(ScanError::malformed(format!("unsupported depth {}", self.depth)));
        }
        let min = self.min_bytes_per_line().ok_or_else(|| {
            ScanError::malformed(format!("{} pixels per line overflow", self.pixels_per_line))
        })?;
        if self.bytes_per_line < min {
            return Err(ScanError::malformed(format!(
                "{} bytes per line cannot hold {} pixels at depth {}",
                self.bytes_per_line, self.pixels_per_line, self.depth
            )));
        }
        if let Some(lines) = self.lines {
            if self.frame_len().is_none() {
                return Err(ScanError::malformed(format!(
                    "{} lines of {} bytes overflow",
                    lines, self.bytes_per_line
                )));
            }
        }
        Ok(())
    }
}

/// Raw pixel data for one channel set of one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub format: FrameFormat,
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub depth: u8,
    pub is_last: bool,
    bytes_per_line: usize,
    data: Vec<u8>,
}

impl Frame {
    pub fn new(params: Parameters, data: Vec<u8>) -> Result<Self, ScanError> {
        params.validate()?;
        let height = match (params.lines, params.frame_len()) {
            (Some(_), Some(len)) if data.len() < len => {
                return Err(ScanError::malformed(format!(
                    "frame truncated: got {} bytes, expected {}",
                    data.len(),
                    len
                )));
            }
            (Some(lines), _) => lines,
            // Unknown line count: every complete row received counts.
            (None, _) => data.len().checked_div(params.bytes_per_line).unwrap_or(0),
        };

        Ok(Self {
            format: params.format,
            width: params.pixels_per_line,
            height,
            channels: params.format.channels(),
            depth: params.depth,
            is_last: params.last_frame,
            bytes_per_line: params.bytes_per_line,
            data,
        })
    }

    pub fn bytes_per_line(&self) -> usize {
        self.bytes_per_line
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Sample at `(x, y)` for channel `ch`, widened to 16 bits.
    ///
    /// 1-bit samples come back as 0 or 1. Coordinates are not range-checked
    /// against the frame geometry; reads past the buffer yield 0.
    pub fn sample(&self, x: usize, y: usize, ch: usize) -> u16 {
        let row = self.bytes_per_line.checked_mul(y);
        let i = self.channels.checked_mul(x).and_then(|s| s.checked_add(ch));
        let (Some(row), Some(i)) = (row, i) else {
            return 0;
        };
        match self.depth {
            1 => self
                .bytes_at(row, i / 8, 1)
                .map_or(0, |b| u16::from((b[0] >> (7 - i % 8)) & 1)),
            8 => self.bytes_at(row, i, 1).map_or(0, |b| u16::from(b[0])),
            16 => i
                .checked_mul(2)
                .and_then(|at| self.bytes_at(row, at, 2))
                .map_or(0, |b| u16::from_ne_bytes([b[0], b[1]])),
            _ => 0,
        }
    }

    fn bytes_at(&self, row: usize, offset: usize, len: usize) -> Option<&[u8]> {
        let start = row.checked_add(offset)?;
        self.data.get(start..start.checked_add(len)?)
    }
}
