mod reader;
mod types;

pub use reader::{Connection, FrameSource};
pub use types::{Frame, FrameFormat, Parameters};
