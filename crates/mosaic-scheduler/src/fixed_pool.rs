//! [`crate::RunMode::Parallel`]: a fixed pool of worker threads, fed by
//! bounded channels in both stages.
//!
//! Workers share one `Receiver` through a `Mutex` (the standard pattern
//! for "N consumers draining one channel"); a channel's `Receiver` isn't
//! `Sync` on its own, so the mutex is what lets every worker call `recv`
//! on the same queue.

use crate::compose::process_rect;
use crate::shared_output::SharedOutput;
use crate::tile_prep::prepare_tile;
use mosaic_core::{Image, TileRect};
use std::path::PathBuf;
use std::sync::mpsc::sync_channel;
use std::sync::Mutex;
use std::thread;

/// Stage A: `threads` workers pull file paths off a shared bounded
/// channel, decode+resize, and publish to a `tilesOut` channel of
/// capacity `threads`. The driver reads exactly `files.len()` items,
/// keeping the `Some` ones.
pub fn stage_a(files: &[PathBuf], tile_size: u32, threads: usize) -> Vec<Image> {
    if files.is_empty() {
        return Vec::new();
    }
    let (files_tx, files_rx) = sync_channel::<PathBuf>(files.len());
    let files_rx = Mutex::new(files_rx);
    let (tiles_tx, tiles_rx) = sync_channel::<Option<Image>>(threads);

    thread::scope(|scope| {
        for _ in 0..threads {
            let tiles_tx = tiles_tx.clone();
            let files_rx = &files_rx;
            scope.spawn(move || {
                while let Ok(path) = files_rx.lock().expect("files_rx mutex poisoned").recv() {
                    let tile = prepare_tile(&path, tile_size);
                    if tiles_tx.send(tile).is_err() {
                        break;
                    }
                }
            });
        }
        drop(tiles_tx);

        for path in files {
            files_tx.send(path.clone()).expect("workers still draining files_rx");
        }
        drop(files_tx);

        let mut tiles = Vec::with_capacity(files.len());
        for _ in 0..files.len() {
            if let Ok(Some(tile)) = tiles_rx.recv() {
                tiles.push(tile);
            }
        }
        tiles
    })
}

/// Stage B: `threads` workers pull rectangles off a shared bounded
/// channel and process them against `out_img`; a completion channel of
/// capacity `threads` carries one token per finished rectangle so the
/// driver knows when to stop waiting.
pub fn stage_b(out_img: &mut Image, rects: &[TileRect], tiles: &[Image], blendin: f64, intensity: f64, seed: Option<u64>, threads: usize) {
    if rects.is_empty() {
        return;
    }
    let shared = SharedOutput::new(out_img);
    let (rects_tx, rects_rx) = sync_channel::<(usize, TileRect)>(rects.len());
    let rects_rx = Mutex::new(rects_rx);
    let (done_tx, done_rx) = sync_channel::<()>(threads);

    thread::scope(|scope| {
        for _ in 0..threads {
            let done_tx = done_tx.clone();
            let rects_rx = &rects_rx;
            let shared = &shared;
            scope.spawn(move || {
                while let Ok((rect_index, rect)) = rects_rx.lock().expect("rects_rx mutex poisoned").recv() {
                    process_rect(shared, tiles, rect, rect_index, blendin, intensity, seed);
                    if done_tx.send(()).is_err() {
                        break;
                    }
                }
            });
        }
        drop(done_tx);

        for (rect_index, &rect) in rects.iter().enumerate() {
            rects_tx.send((rect_index, rect)).expect("workers still draining rects_rx");
        }
        drop(rects_tx);

        for _ in 0..rects.len() {
            let _ = done_rx.recv();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use mosaic_core::Rgba16;

    #[test]
    fn stage_a_produces_one_tile_per_decodable_file() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.png");
        mosaic_io::png::write(&good, &Image::new(4, 4).unwrap()).unwrap();
        let bad = dir.path().join("bad.png");
        std::fs::write(&bad, b"not a png").unwrap();

        let tiles = stage_a(&[good, bad], 4, 2);
        assert_eq!(tiles.len(), 1);
    }

    #[test]
    fn stage_b_matches_sequential_given_one_tile() {
        let mut out_a = Image::new(4, 4).unwrap();
        let mut out_b = Image::new(4, 4).unwrap();
        let tile = {
            let mut t = Image::new(2, 2).unwrap();
            for y in 0..2 {
                for x in 0..2 {
                    t.set(x, y, Rgba16::new(500, 1500, 2500, 65535)).unwrap();
                }
            }
            t
        };
        let tiles = vec![tile];
        let rects = mosaic_core::rect::tile_rects(4, 4, 2);

        crate::sequential::stage_b(&mut out_a, &rects, &tiles, 0.3, 0.4, Some(9));
        stage_b(&mut out_b, &rects, &tiles, 0.3, 0.4, Some(9), 3);

        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(out_a.get(x, y).unwrap(), out_b.get(x, y).unwrap());
            }
        }
    }
}
