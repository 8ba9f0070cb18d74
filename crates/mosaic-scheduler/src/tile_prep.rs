//! Stage A's per-file unit of work: decode a candidate tile and resize it
//! to `tile_size x tile_size`. Shared by all three scheduling strategies
//! so "decode, then resize, then silently drop on failure" behaves
//! identically regardless of who calls it.

use mosaic_core::Image;
use std::path::Path;

/// Decodes the PNG at `path` and resizes it to `tile_size x tile_size`.
///
/// Returns `None` if the file fails to decode; stage A's contract is to
/// drop such entries rather than abort the run.
pub fn prepare_tile(path: &Path, tile_size: u32) -> Option<Image> {
    match mosaic_io::png::read(path) {
        Ok(image) => image.resize(tile_size, tile_size).ok(),
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "skipping undecodable tile");
            None
        }
    }
}
