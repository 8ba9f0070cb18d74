//! [`crate::RunMode::Sequential`]: both stages run on the calling thread.

use crate::compose::process_rect;
use crate::shared_output::SharedOutput;
use crate::tile_prep::prepare_tile;
use mosaic_core::{Image, TileRect};
use std::path::PathBuf;

/// Stage A: decode and resize every candidate file, dropping failures.
pub fn stage_a(files: &[PathBuf], tile_size: u32) -> Vec<Image> {
    files.iter().filter_map(|path| prepare_tile(path, tile_size)).collect()
}

/// Stage B: process every rectangle in list order against `out_img`.
pub fn stage_b(out_img: &mut Image, rects: &[TileRect], tiles: &[Image], blendin: f64, intensity: f64, seed: Option<u64>) {
    let shared = SharedOutput::new(out_img);
    for (rect_index, &rect) in rects.iter().enumerate() {
        process_rect(&shared, tiles, rect, rect_index, blendin, intensity, seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mosaic_core::Rgba16;

    #[test]
    fn stage_a_skips_undecodable_files() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("not_a_png.png");
        std::fs::write(&bogus, b"not a png").unwrap();
        let tiles = stage_a(&[bogus], 4);
        assert!(tiles.is_empty());
    }

    #[test]
    fn stage_b_covers_every_rectangle() {
        let mut out = Image::new(4, 4).unwrap();
        let tiles = vec![{
            let mut t = Image::new(2, 2).unwrap();
            for y in 0..2 {
                for x in 0..2 {
                    t.set(x, y, Rgba16::new(1000, 2000, 3000, 65535)).unwrap();
                }
            }
            t
        }];
        let rects = mosaic_core::rect::tile_rects(4, 4, 2);
        stage_b(&mut out, &rects, &tiles, 0.0, 1.0, Some(1));
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(out.get(x, y).unwrap(), tiles[0].get(x % 2, y % 2).unwrap());
            }
        }
    }
}
