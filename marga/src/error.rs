//! Error types for Marga

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Marga error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Serial port error
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be read or written
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unknown device type in configuration
    #[error("Unknown device type: {0}")]
    UnknownDevice(String),

    /// Hardware collaborator reported a failure
    #[error("Device error: {0}")]
    Device(String),

    /// Encoder counters stopped changing while a motion was active.
    ///
    /// Only raised when `motion.stall_timeout_ms` is configured; without it
    /// the poll loops block until the wheels move again.
    #[error("Encoder stall: no ticks for {waited_ms}ms (left={left}, right={right})")]
    EncoderStall {
        /// Time without a tick change
        waited_ms: u64,
        /// Left counter at the time of the stall
        left: u32,
        /// Right counter at the time of the stall
        right: u32,
    },

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Error::Config(e.to_string())
    }
}
