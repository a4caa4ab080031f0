use super::types::{Frame, FrameFormat, Parameters};
use crate::device::Device;
use crate::error::ScanError;
use log::{debug, trace};

/// Read size used when pulling frame bytes from a device.
const READ_CHUNK: usize = 32 * 1024;

/// Upper bound on the buffer reserved up front from reported geometry.
const MAX_RESERVE: usize = 64 * 1024 * 1024;

/// Anything that yields frames of the current page and can be cancelled.
pub trait FrameSource {
    fn read_frame(&mut self) -> Result<Frame, ScanError>;

    fn cancel(&self);
}

impl<S: FrameSource + ?Sized> FrameSource for &mut S {
    fn read_frame(&mut self) -> Result<Frame, ScanError> {
        (**self).read_frame()
    }

    fn cancel(&self) {
        (**self).cancel()
    }
}

/// An open session with a device, reading whole frames from its transport.
pub struct Connection<D: Device> {
    device: D,
}

impl<D: Device> Connection<D> {
    pub fn open(device: D) -> Self {
        debug!("Opening connection");
        Self { device }
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn start(&mut self) -> Result<Parameters, ScanError> {
        self.device.start()
    }

    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, ScanError> {
        self.device.read(buf)
    }

    pub fn close(self) -> D {
        self.device.cancel();
        debug!("Connection closed");
        self.device
    }
}

impl<D: Device> FrameSource for Connection<D> {
    fn read_frame(&mut self) -> Result<Frame, ScanError> {
        let params = self.device.start()?;
        debug!(
            "Starting frame {:?}: {}x{:?} depth {} ({} bytes per line, last={})",
            params.format,
            params.pixels_per_line,
            params.lines,
            params.depth,
            params.bytes_per_line,
            params.last_frame
        );

        // Unknown layouts are refused before their geometry is looked at.
        if let FrameFormat::Other(code) = params.format {
            return Err(ScanError::UnknownFrameFormat(code));
        }
        params.validate()?;

        let reserve = params.frame_len().unwrap_or(0).min(MAX_RESERVE);
        let mut data = Vec::with_capacity(reserve);
        let mut chunk = vec![0u8; READ_CHUNK];
        loop {
            let n = self.device.read(&mut chunk)?;
            if n == 0 {
                break;
            }
            trace!("Read {} bytes", n);
            data.extend_from_slice(&chunk[..n]);
        }

        Frame::new(params, data)
    }

    fn cancel(&self) {
        self.device.cancel();
    }
}
