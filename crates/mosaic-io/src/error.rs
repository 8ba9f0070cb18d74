//! Error types for PNG and tile-directory I/O.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for I/O operations.
pub type Result<T> = std::result::Result<T, IoError>;

/// Errors that can occur while reading or writing image files.
#[derive(Debug, Error)]
pub enum IoError {
    /// Underlying filesystem I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The `png` crate rejected the stream as malformed.
    #[error("failed to decode PNG: {0}")]
    Decode(String),

    /// The `png` crate failed while writing.
    #[error("failed to encode PNG: {0}")]
    Encode(String),

    /// Decoded color type/bit depth combination this crate does not widen
    /// to RGBA16 (only grayscale, grayscale+alpha, RGB and RGBA are
    /// handled; paletted PNGs are out of scope).
    #[error("unsupported PNG color type {color_type:?} at bit depth {bit_depth:?}")]
    UnsupportedColorType {
        /// The `png` crate's reported color type.
        color_type: png::ColorType,
        /// The `png` crate's reported bit depth.
        bit_depth: png::BitDepth,
    },

    /// A path given as the tiles directory could not be read.
    #[error("cannot read tiles directory {path}: {source}")]
    TilesDir {
        /// The directory that failed to open/read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}
