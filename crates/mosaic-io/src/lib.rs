//! # mosaic-io
//!
//! PNG decode/encode and tile-directory scanning for the photomosaic
//! engine. Decoding always widens to [`mosaic_core::Rgba16`]; encoding
//! always writes back out at 16 bits per channel, regardless of the
//! source's native depth.

#![warn(missing_docs)]

pub mod error;
pub mod png;
pub mod tiles;

pub use error::{IoError, Result};
