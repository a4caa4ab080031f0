mod config;
mod pattern;
mod simulated;

pub use config::{DeviceConfig, ScanMode, ScanSource};
pub use simulated::SimulatedScanner;

use crate::error::ScanError;
use crate::frame::Parameters;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Raw transport to an imaging device.
///
/// A frame is started with [`Device::start`], which reports its parameters,
/// and its bytes are then pulled with [`Device::read`] until it returns
/// `Ok(0)`.
pub trait Device {
    fn start(&mut self) -> Result<Parameters, ScanError>;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, ScanError>;

    /// Aborts any in-flight transfer. Idempotent.
    fn cancel(&self);
}

/// Cloneable handle that cancels a device from any thread.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
    wake: Sender<()>,
}

/// Receiving side of a [`CancelHandle`], owned by the device.
#[derive(Debug)]
pub struct CancelSignal {
    flag: Arc<AtomicBool>,
    wake: Receiver<()>,
    handle: CancelHandle,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
        // A full channel already holds a pending wake-up.
        let _ = self.wake.try_send(());
    }
}

impl CancelSignal {
    pub fn new() -> Self {
        let flag = Arc::new(AtomicBool::new(false));
        let (tx, rx) = bounded(1);
        Self {
            flag: flag.clone(),
            wake: rx,
            handle: CancelHandle { flag, wake: tx },
        }
    }

    pub fn handle(&self) -> CancelHandle {
        self.handle.clone()
    }

    pub fn cancel(&self) {
        self.handle.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Clears a previous cancellation before a new transfer starts.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
        while self.wake.try_recv().is_ok() {}
    }

    /// Blocks for up to `timeout`, returning early with `Cancelled` if a
    /// cancellation arrives.
    pub fn wait(&self, timeout: Duration) -> Result<(), ScanError> {
        if self.is_cancelled() {
            return Err(ScanError::Cancelled);
        }
        match self.wake.recv_timeout(timeout) {
            Ok(()) => Err(ScanError::Cancelled),
            Err(RecvTimeoutError::Timeout) if !self.is_cancelled() => Ok(()),
            Err(RecvTimeoutError::Timeout) => Err(ScanError::Cancelled),
            Err(RecvTimeoutError::Disconnected) => {
                Err(ScanError::transport("cancel channel disconnected"))
            }
        }
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}
