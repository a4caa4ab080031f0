use super::config::{DeviceConfig, ScanMode, ScanSource};
use super::pattern::{self, Planes};
use super::{CancelHandle, CancelSignal, Device};
use crate::error::ScanError;
use crate::frame::Parameters;
use log::{debug, info, warn};
use std::time::Duration;

/// In-process scanner that serves the color pattern test picture.
///
/// A flatbed holds a single page per session: once it has been scanned the
/// next page start reports `Empty` until the session is cancelled. The
/// feeder holds `feeder_pages` pages in total.
pub struct SimulatedScanner {
    config: DeviceConfig,
    cancel: CancelSignal,
    flatbed_loaded: bool,
    feeder_left: usize,
    pass: usize,
    pending: Option<Vec<u8>>,
    offset: usize,
    pages_started: usize,
}

impl SimulatedScanner {
    pub fn new(config: DeviceConfig) -> Result<Self, ScanError> {
        config.validate().map_err(|e| {
            warn!("Rejecting device configuration: {}", e);
            ScanError::Invalid
        })?;
        info!(
            "Simulated scanner ready: {:?} {:?} depth {} {}x{}",
            config.source, config.mode, config.depth, config.width, config.height
        );
        let feeder_left = config.feeder_pages;
        Ok(Self {
            config,
            cancel: CancelSignal::new(),
            flatbed_loaded: true,
            feeder_left,
            pass: 0,
            pending: None,
            offset: 0,
            pages_started: 0,
        })
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Handle for cancelling a blocked read from another thread.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.handle()
    }

    pub fn pages_started(&self) -> usize {
        self.pages_started
    }

    fn abort_page(&mut self) {
        if self.pass != 0 || self.pending.is_some() {
            debug!("Aborting current page at pass {}", self.pass);
        }
        self.pass = 0;
        self.pending = None;
        self.offset = 0;
        self.flatbed_loaded = true;
    }

    fn load_page(&mut self) -> Result<(), ScanError> {
        match self.config.source {
            ScanSource::Flatbed if !self.flatbed_loaded => return Err(ScanError::Empty),
            ScanSource::Flatbed => self.flatbed_loaded = false,
            ScanSource::Feeder if self.feeder_left == 0 => return Err(ScanError::Empty),
            ScanSource::Feeder => self.feeder_left -= 1,
        }
        self.pages_started += 1;
        debug!("Loaded page {}", self.pages_started);
        Ok(())
    }

    /// Planes of the next frame and whether it completes the page.
    fn next_planes(&mut self) -> (Planes, bool) {
        match self.config.mode {
            ScanMode::Gray => (Planes::Gray, true),
            ScanMode::Color if !self.config.three_pass => (Planes::Interleaved, true),
            ScanMode::Color => {
                let channel = self
                    .config
                    .three_pass_order
                    .to_ascii_uppercase()
                    .chars()
                    .nth(self.pass)
                    .and_then(|c| "RGB".find(c))
                    .unwrap_or(self.pass);
                self.pass = (self.pass + 1) % 3;
                (Planes::Single(channel), self.pass == 0)
            }
        }
    }
}

impl Device for SimulatedScanner {
    fn start(&mut self) -> Result<Parameters, ScanError> {
        if self.cancel.is_cancelled() {
            self.abort_page();
            self.cancel.reset();
        }
        if self.pass == 0 {
            self.load_page()?;
        }

        let (planes, last_frame) = self.next_planes();
        let (mut params, data) = pattern::render(
            planes,
            self.config.width,
            self.config.height,
            self.config.depth,
            self.config.ppl_loss,
            last_frame,
        )?;
        if self.config.hand_scanner {
            params.lines = None;
        }
        self.pending = Some(data);
        self.offset = 0;
        Ok(params)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, ScanError> {
        if self.cancel.is_cancelled() {
            return Err(ScanError::Cancelled);
        }
        if self.config.read_delay_ms > 0 {
            self.cancel.wait(Duration::from_millis(self.config.read_delay_ms))?;
        }
        if let Some(status) = &self.config.read_status {
            return Err(status.clone());
        }

        let data = self.pending.as_ref().ok_or(ScanError::Invalid)?;
        let rest = &data[self.offset..];
        let n = rest.len().min(buf.len());
        buf[..n].copy_from_slice(&rest[..n]);
        self.offset += n;
        Ok(n)
    }

    fn cancel(&self) {
        self.cancel.cancel();
    }
}
