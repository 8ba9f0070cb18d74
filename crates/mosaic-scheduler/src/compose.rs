//! Stage B's per-rectangle unit of work, shared by all three scheduling
//! strategies so the same four-step recipe (pick a tile, transfer its
//! color, blend it in twice) runs identically regardless of who drives
//! it.

use crate::shared_output::SharedOutput;
use mosaic_core::{color_blend, Image, TileRect};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Processes one output rectangle: samples a random tile, color-transfers
/// it toward the rectangle's current content, and writes the
/// doubly-blended result back into `shared`.
///
/// `rect_index` is this rectangle's position in the rectangle list
/// (`(x0 outer, y0 inner)` order); it is only consulted when `seed` is
/// set, to make tile selection a pure function of `(seed, rect_index)`
/// rather than of processing order.
pub fn process_rect(
    shared: &SharedOutput,
    tiles: &[Image],
    rect: TileRect,
    rect_index: usize,
    blendin: f64,
    intensity: f64,
    seed: Option<u64>,
) {
    let tile = &tiles[pick_tile_index(tiles.len(), rect_index, seed)];
    let reference = shared.read_rect(rect);
    let colored = tile.color_transfer(&reference);

    for y in 0..rect.height() {
        for x in 0..rect.width() {
            let tile_px = tile.get(x, y).expect("rect fits within tile_size x tile_size");
            let colored_px = colored.get(x, y).expect("colored matches tile's dimensions");
            let blended = color_blend(tile_px, colored_px, blendin);

            let (dst_x, dst_y) = (rect.x0 + x, rect.y0 + y);
            let base_px = shared.get(dst_x, dst_y);
            let final_px = color_blend(base_px, blended, intensity);
            shared.set(dst_x, dst_y, final_px);
        }
    }
}

fn pick_tile_index(tile_count: usize, rect_index: usize, seed: Option<u64>) -> usize {
    match seed {
        Some(seed) => {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(rect_index as u64));
            rng.gen_range(0..tile_count)
        }
        None => rand::thread_rng().gen_range(0..tile_count),
    }
}
