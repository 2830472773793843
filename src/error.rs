//! Error types for the basejpeg library.

use std::fmt;

/// Result type alias for basejpeg operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during JPEG encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid image dimensions (zero width or height).
    InvalidDimensions {
        /// Image width.
        width: u32,
        /// Image height.
        height: u32,
    },
    /// Image dimensions exceed the 16-bit frame header limit.
    ImageTooLarge {
        /// Image width.
        width: u32,
        /// Image height.
        height: u32,
        /// Maximum supported dimension.
        max: u32,
    },
    /// Pixel data length doesn't match expected size.
    InvalidDataLength {
        /// Expected number of bytes.
        expected: usize,
        /// Actual number of bytes provided.
        actual: usize,
    },
    /// Unsupported color type (JPEG encodes 1-, 3-, or 4-channel sources).
    UnsupportedColorType,
    /// The byte sink failed to accept output.
    Sink(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidDimensions { width, height } => {
                write!(f, "Invalid image dimensions: {}x{}", width, height)
            }
            Error::ImageTooLarge { width, height, max } => {
                write!(
                    f,
                    "Image {}x{} exceeds maximum dimension {}",
                    width, height, max
                )
            }
            Error::InvalidDataLength { expected, actual } => {
                write!(
                    f,
                    "Invalid pixel data length: expected {} bytes, got {}",
                    expected, actual
                )
            }
            Error::UnsupportedColorType => {
                write!(f, "Unsupported color type for JPEG encoding")
            }
            Error::Sink(msg) => {
                write!(f, "Sink write failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}
