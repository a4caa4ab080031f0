//! Page-level acquisition on top of the frame assembler.

use crate::error::ScanError;
use crate::frame::FrameSource;
use crate::scan::{assemble_image, Image};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

/// Which page-level policy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Read exactly one page.
    #[default]
    Single,
    /// Read every page available, then return them together.
    All,
    /// Hand pages over one by one as they are read.
    Continuous,
}

/// Cancels the wrapped source when dropped, whatever the exit path.
struct CancelOnDrop<'a, S: FrameSource + ?Sized>(&'a mut S);

impl<S: FrameSource + ?Sized> Deref for CancelOnDrop<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        &*self.0
    }
}

impl<S: FrameSource + ?Sized> DerefMut for CancelOnDrop<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut *self.0
    }
}

impl<S: FrameSource + ?Sized> Drop for CancelOnDrop<'_, S> {
    fn drop(&mut self) {
        debug!("Cancelling acquisition");
        self.0.cancel();
    }
}

/// Reads whole pages from a frame source.
pub struct Scanner<S: FrameSource> {
    source: S,
}

impl<S: FrameSource> Scanner<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    /// Reads one page.
    pub fn read_image(&mut self) -> Result<Image, ScanError> {
        let mut source = CancelOnDrop(&mut self.source);
        let image = assemble_image(&mut *source)?;
        info!("Read {}x{} page", image.width(), image.height());
        Ok(image)
    }

    /// Reads every page currently available, as needed by duplex and
    /// feeder devices where a single read only returns one page.
    ///
    /// Fails with `Empty` when not even one page is available.
    pub fn read_available_images(&mut self) -> Result<Vec<Image>, ScanError> {
        let mut source = CancelOnDrop(&mut self.source);
        collect_until_tray_empty(&mut *source)
    }

    /// Reads pages one at a time and passes each to `handler`.
    ///
    /// Only one page is held in memory at a time. An empty tray before the
    /// first page is an error; afterwards it ends the run. A handler error
    /// stops the run before any further page is read.
    pub fn continuous_read<F, E>(&mut self, handler: F) -> Result<(), E>
    where
        F: FnMut(Image) -> Result<(), E>,
        E: From<ScanError>,
    {
        let mut source = CancelOnDrop(&mut self.source);
        stream_until_tray_empty(&mut *source, handler)
    }
}

/// Collects pages until the tray runs dry after at least one page.
fn collect_until_tray_empty<S>(source: &mut S) -> Result<Vec<Image>, ScanError>
where
    S: FrameSource + ?Sized,
{
    let mut images = Vec::new();
    loop {
        match assemble_image(source) {
            Ok(image) => {
                images.push(image);
                info!("Read page {}", images.len());
            }
            Err(ScanError::Empty) if !images.is_empty() => {
                info!("Tray empty after {} pages", images.len());
                return Ok(images);
            }
            Err(e) => {
                if !images.is_empty() {
                    warn!("Discarding {} pages after error: {}", images.len(), e);
                }
                return Err(e);
            }
        }
    }
}

/// Hands pages to `handler` until the tray runs dry; the first page must
/// exist.
fn stream_until_tray_empty<S, F, E>(source: &mut S, mut handler: F) -> Result<(), E>
where
    S: FrameSource + ?Sized,
    F: FnMut(Image) -> Result<(), E>,
    E: From<ScanError>,
{
    let mut image = assemble_image(source)?;
    let mut pages = 0usize;
    loop {
        pages += 1;
        debug!("Handing page {} to handler", pages);
        handler(image)?;

        image = match assemble_image(source) {
            Ok(next) => next,
            Err(ScanError::Empty) => {
                info!("Tray empty after {} pages", pages);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
    }
}
