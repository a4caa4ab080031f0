mod loader;

pub use loader::{AcquisitionConfig, Config};
