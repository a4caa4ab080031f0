use thiserror::Error;

/// Failure kinds reported by a scan session.
///
/// The set is flat on purpose: device statuses, data-model violations and
/// transport passthrough all live side by side so callers can match on them
/// directly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("unknown frame type {0}")]
    UnknownFrameFormat(u32),

    #[error("no documents available")]
    Empty,

    #[error("operation was cancelled")]
    Cancelled,

    #[error("device busy")]
    Busy,

    #[error("invalid argument")]
    Invalid,

    #[error("feeder jammed")]
    Jammed,

    #[error("scanner cover is open")]
    CoverOpen,

    #[error("error during device I/O")]
    Io,

    #[error("out of memory")]
    NoMem,

    #[error("access to resource has been denied")]
    Denied,

    #[error("operation not supported")]
    Unsupported,

    #[error("malformed frame data: {0}")]
    Malformed(String),

    #[error("transport error: {0}")]
    Transport(String),
}

impl ScanError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        ScanError::Malformed(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        ScanError::Transport(msg.into())
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn config(msg: impl Into<String>) -> Self {
        AppError::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_frame_format_message() {
        let err = ScanError::UnknownFrameFormat(7);
        assert_eq!(err.to_string(), "unknown frame type 7");
    }

    #[test]
    fn test_scan_error_converts_into_app_error() {
        let err: AppError = ScanError::Jammed.into();
        assert!(matches!(err, AppError::Scan(ScanError::Jammed)));
        assert_eq!(err.to_string(), "Scan error: feeder jammed");
    }
}
