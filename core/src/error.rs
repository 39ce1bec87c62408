use thiserror::Error;

#[derive(Debug, Error)]
pub enum MorseError {
    #[error("Capture permission denied")]
    PermissionDenied,

    #[error("No capture device available")]
    DeviceUnavailable,

    #[error("Acquisition failed: {0}")]
    AcquisitionFailed(String),

    #[error("Invalid words-per-minute value: {0}")]
    InvalidWpm(u32),
}

pub type Result<T> = std::result::Result<T, MorseError>;
