//! Sector inspection error types

use thiserror::Error;

/// The main error type for sector inspection operations
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error from the underlying sector source
    #[error("Sector I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A sector buffer is too short for the offsets being read
    #[error("Truncated sector ({context}): need {needed} bytes, got {actual}")]
    TruncatedSector {
        /// What was being decoded
        context: &'static str,
        /// Minimum length required
        needed: usize,
        /// Length actually supplied
        actual: usize,
    },

    /// A read falls outside the addressable range of a source
    #[error("Out of range: {0}")]
    OutOfRange(String),

    /// Sector size is zero, too large, or not a power of two
    #[error("Invalid sector size: {0}")]
    InvalidSectorSize(String),

    /// Requested buffer exceeds the allocation limit
    #[error("Allocation limit exceeded: {0}")]
    AllocationLimit(String),

    /// Image file cannot back a block device
    #[error("Invalid image: {0}")]
    InvalidImage(String),
}

/// Result type alias for sector inspection operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a truncated sector error
    pub fn truncated(context: &'static str, needed: usize, actual: usize) -> Self {
        Error::TruncatedSector {
            context,
            needed,
            actual,
        }
    }

    /// Create an out of range error
    pub fn out_of_range(msg: impl Into<String>) -> Self {
        Error::OutOfRange(msg.into())
    }

    /// Create an invalid sector size error
    pub fn invalid_sector_size(msg: impl Into<String>) -> Self {
        Error::InvalidSectorSize(msg.into())
    }

    /// Create an invalid image error
    pub fn invalid_image(msg: impl Into<String>) -> Self {
        Error::InvalidImage(msg.into())
    }

    /// True if this is a `TruncatedSector` error
    pub fn is_truncated(&self) -> bool {
        matches!(self, Error::TruncatedSector { .. })
    }
}

/// Fail with `TruncatedSector` unless `bytes` holds at least `needed` bytes
pub fn ensure_len(bytes: &[u8], needed: usize, context: &'static str) -> Result<()> {
    if bytes.len() < needed {
        return Err(Error::truncated(context, needed, bytes.len()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_len() {
        assert!(ensure_len(&[0u8; 512], 512, "mbr").is_ok());

        let err = ensure_len(&[0u8; 511], 512, "mbr").unwrap_err();
        assert!(err.is_truncated());
        assert_eq!(
            err.to_string(),
            "Truncated sector (mbr): need 512 bytes, got 511"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "short read");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_truncated());
    }
}
