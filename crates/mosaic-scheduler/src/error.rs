//! Error types for configuration and scheduling.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for scheduler operations.
pub type Result<T> = std::result::Result<T, SchedulerError>;

/// Errors that can arise while validating a [`crate::Config`] or running
/// the scheduler.
#[derive(Error, Debug)]
pub enum SchedulerError {
    /// `tile_size` was zero.
    #[error("tile_size must be >= 1, got {0}")]
    InvalidTileSize(u32),

    /// `upscale` was zero.
    #[error("upscale must be >= 1, got {0}")]
    InvalidUpscale(u32),

    /// `intensity` fell outside `[0, 1]`.
    #[error("intensity must be in [0, 1], got {0}")]
    InvalidIntensity(f64),

    /// `blendin` fell outside `[0, 1]`.
    #[error("blendin must be in [0, 1], got {0}")]
    InvalidBlendin(f64),

    /// `threads` was zero.
    #[error("threads must be >= 1, got {0}")]
    InvalidThreads(usize),

    /// Stage A decoded and resized zero tiles; there is nothing to
    /// composite with.
    #[error("no tiles loaded from tiles directory: {0}")]
    NoTilesLoaded(PathBuf),

    /// Failure loading the input image, scanning the tiles directory, or
    /// saving the output image.
    #[error(transparent)]
    Io(#[from] mosaic_io::IoError),

    /// Failure in a core image primitive (bounds, invalid dimensions).
    #[error(transparent)]
    Core(#[from] mosaic_core::CoreError),
}
