use thiserror::Error;

/// Result type alias for card manager operations
pub type Result<T> = std::result::Result<T, CardError>;

/// Source of an unrecoverable error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Card manager (directory setup, image creation and loading)
    CardManager,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::CardManager => write!(f, "cardman"),
        }
    }
}

/// Errors that can occur when managing card images
#[derive(Debug, Error)]
pub enum CardError {
    /// I/O error reported by a storage backend
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Sector I/O attempted while no card image is open
    #[error("No card image is open")]
    NotOpen,

    /// Sector number outside the card image
    #[error("Invalid sector {sector} (max: {max})")]
    InvalidSector {
        /// Requested sector
        sector: usize,
        /// Highest valid sector
        max: usize,
    },

    /// Seek to a sector offset failed
    #[error("Seek to sector {sector} (offset {offset}) failed")]
    Seek {
        /// Requested sector
        sector: usize,
        /// Byte offset of the sector
        offset: u64,
    },

    /// Read transferred fewer bytes than a full sector
    #[error("Short read on sector {sector}: {actual} of {expected} bytes")]
    ShortRead {
        /// Requested sector
        sector: usize,
        /// Bytes expected
        expected: usize,
        /// Bytes actually read
        actual: usize,
    },

    /// Write transferred fewer bytes than a full sector
    #[error("Short write on sector {sector}: {actual} of {expected} bytes")]
    ShortWrite {
        /// Requested sector
        sector: usize,
        /// Bytes expected
        expected: usize,
        /// Bytes actually written
        actual: usize,
    },

    /// Unrecoverable storage failure; the card is left unusable
    #[error("Fatal {category} error: {message}")]
    Fatal {
        /// Subsystem that failed
        category: ErrorCategory,
        /// Error message
        message: String,
    },

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed JSON in a settings or card configuration file
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CardError {
    /// Create a fatal card manager error
    pub fn fatal<S: Into<String>>(message: S) -> Self {
        CardError::Fatal {
            category: ErrorCategory::CardManager,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        CardError::Config(message.into())
    }

    /// Is this an unrecoverable error?
    pub fn is_fatal(&self) -> bool {
        matches!(self, CardError::Fatal { .. })
    }
}

/// Terminal handler for unrecoverable errors
///
/// Implementations never return: they halt, reset or exit the process.
pub trait FatalSink {
    /// Report an unrecoverable error and stop normal operation
    fn fatal(&mut self, err: &CardError) -> !;
}

/// Fatal sink that panics with the error message
#[derive(Debug, Default, Clone, Copy)]
pub struct PanicSink;

impl FatalSink for PanicSink {
    fn fatal(&mut self, err: &CardError) -> ! {
        panic!("{}", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CardError::ShortRead {
            sector: 12,
            expected: 128,
            actual: 64,
        };
        assert_eq!(err.to_string(), "Short read on sector 12: 64 of 128 bytes");
    }

    #[test]
    fn test_fatal_error() {
        let err = CardError::fatal("error creating directories");
        assert!(err.is_fatal());
        assert_eq!(
            err.to_string(),
            "Fatal cardman error: error creating directories"
        );
        assert!(!CardError::NotOpen.is_fatal());
    }

    #[test]
    #[should_panic(expected = "cannot init memcard")]
    fn test_panic_sink() {
        PanicSink.fatal(&CardError::fatal("cannot init memcard"));
    }
}
