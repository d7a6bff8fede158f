//! Tile error types

use thiserror::Error;

/// Errors surfaced by the tile crate.
///
/// Anomalies inside a layout (unknown elements, invalid dimensions,
/// unmeasurable containers) are not errors: the offending subtree is logged
/// and skipped.
#[derive(Error, Debug)]
pub enum TileError {
    /// A layout document could not be parsed
    #[error("invalid layout document: {0}")]
    Layout(#[from] serde_json::Error),

    /// The inflater configuration could not be parsed
    #[error("invalid inflater config: {0}")]
    Config(#[from] toml::de::Error),

    /// The measurement engine rejected the view tree
    #[error("layout computation failed: {0}")]
    Measure(#[from] taffy::TaffyError),
}

/// Result type for tile operations
pub type Result<T> = std::result::Result<T, TileError>;

/// Failure to load a drawable resource.
///
/// Unlike layout anomalies these reach the caller of the resolution path so a
/// distinct failure state can be shown.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceAccessError {
    /// The resolver does not know the resource
    #[error("unknown resource {0}")]
    Unknown(String),

    /// The raw pixel buffer does not match the declared dimensions
    #[error("image buffer is {actual} bytes, {width}x{height} needs {expected}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// Declared dimensions are zero
    #[error("image dimensions {width}x{height} are invalid")]
    InvalidDimensions { width: u32, height: u32 },

    /// The pixel format cannot be decoded
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// The provider dropped the request without answering
    #[error("resource {0} was never delivered")]
    Abandoned(String),
}
