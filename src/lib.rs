//! A library for acquiring scanned pages from imaging devices.
//!
//! This library provides functionality for:
//! - Reading raw frames from a device session
//! - Assembling gray, interleaved and three-pass color frames into images
//! - Decoding pixels at 1, 8 and 16 bits per sample
//! - Reading single pages, whole feeders, or streaming page by page

pub mod acquisition;
pub mod cli;
pub mod config;
pub mod device;
pub mod error;
pub mod frame;
pub mod logging;
pub mod report;
pub mod scan;

pub use acquisition::{Scanner, Strategy};
pub use config::Config;
pub use error::{AppError, Result, ScanError};
pub use frame::{Connection, Frame, FrameFormat, FrameSource, Parameters};
pub use scan::{assemble_image, Color, ColorModel, Image, Slot};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Opens a connection to a simulated scanner with the given configuration.
pub fn open_simulated(
    config: &device::DeviceConfig,
) -> Result<Connection<device::SimulatedScanner>> {
    let device = device::SimulatedScanner::new(config.clone())?;
    Ok(Connection::open(device))
}
