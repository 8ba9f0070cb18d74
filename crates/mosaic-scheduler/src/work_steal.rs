//! [`crate::RunMode::WorkSteal`]: fork-join over per-worker bounded
//! deques, mirroring spec.md's fork-join strategy almost directly onto
//! [`mosaic_core::Deque`].
//!
//! Each worker owns exactly one deque and pops its own bottom first;
//! once its deque is empty it checks the shared `done` flag, and if not
//! yet set, yields and steals from a uniformly random victim. `done` is
//! only raised by the driver after it has collected every expected
//! result, so a worker can never observe `done` while work remains.

use crate::compose::process_rect;
use crate::shared_output::SharedOutput;
use crate::tile_prep::prepare_tile;
use mosaic_core::{Deque, Image, TileRect};
use rand::Rng;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::sync_channel;
use std::thread;

fn deque_capacity(n: usize, threads: usize) -> usize {
    n.div_ceil(threads) + 1
}

fn steal_loop<T>(deques: &[Deque<T>], owner: usize, done: &AtomicBool) -> Option<T> {
    loop {
        if let Some(task) = deques[owner].pop_bottom() {
            return Some(task);
        }
        if done.load(Ordering::SeqCst) {
            return None;
        }
        thread::yield_now();
        let victim = rand::thread_rng().gen_range(0..deques.len());
        if !deques[victim].is_empty() {
            if let Some(task) = deques[victim].pop_top() {
                return Some(task);
            }
        }
    }
}

/// Stage A: distribute files round-robin (`entry_index mod threads`)
/// across `threads` deques, have each worker drain its own deque then
/// steal from random victims, and collect results through a channel of
/// capacity `files.len()`.
pub fn stage_a(files: &[PathBuf], tile_size: u32, threads: usize) -> Vec<Image> {
    if files.is_empty() {
        return Vec::new();
    }
    let capacity = deque_capacity(files.len(), threads);
    let deques: Vec<Deque<PathBuf>> = (0..threads).map(|_| Deque::new(capacity)).collect();
    for (i, path) in files.iter().enumerate() {
        deques[i % threads].push_bottom(path.clone());
    }

    let done = AtomicBool::new(false);
    let (tiles_tx, tiles_rx) = sync_channel::<Option<Image>>(files.len());

    thread::scope(|scope| {
        for owner in 0..threads {
            let deques = &deques;
            let done = &done;
            let tiles_tx = tiles_tx.clone();
            scope.spawn(move || {
                while let Some(path) = steal_loop(deques, owner, done) {
                    let tile = prepare_tile(&path, tile_size);
                    if tiles_tx.send(tile).is_err() {
                        break;
                    }
                }
            });
        }
        drop(tiles_tx);

        let mut tiles = Vec::with_capacity(files.len());
        for _ in 0..files.len() {
            if let Ok(Some(tile)) = tiles_rx.recv() {
                tiles.push(tile);
            }
        }
        done.store(true, Ordering::SeqCst);
        tiles
    })
}

/// Stage B: mirrors stage A's fork-join pattern over the rectangle list,
/// with a completion channel of capacity `threads` carrying one token
/// per finished rectangle instead of a payload (writes go straight into
/// `out_img` through [`SharedOutput`]).
pub fn stage_b(out_img: &mut Image, rects: &[TileRect], tiles: &[Image], blendin: f64, intensity: f64, seed: Option<u64>, threads: usize) {
    if rects.is_empty() {
        return;
    }
    let capacity = deque_capacity(rects.len(), threads);
    let deques: Vec<Deque<(usize, TileRect)>> = (0..threads).map(|_| Deque::new(capacity)).collect();
    for (i, &rect) in rects.iter().enumerate() {
        deques[i % threads].push_bottom((i, rect));
    }

    let done = AtomicBool::new(false);
    let shared = SharedOutput::new(out_img);
    let (done_tx, done_rx) = sync_channel::<()>(threads);

    thread::scope(|scope| {
        for owner in 0..threads {
            let deques = &deques;
            let done = &done;
            let shared = &shared;
            let done_tx = done_tx.clone();
            scope.spawn(move || {
                while let Some((rect_index, rect)) = steal_loop(deques, owner, done) {
                    process_rect(shared, tiles, rect, rect_index, blendin, intensity, seed);
                    if done_tx.send(()).is_err() {
                        break;
                    }
                }
            });
        }
        drop(done_tx);

        for _ in 0..rects.len() {
            let _ = done_rx.recv();
        }
        done.store(true, Ordering::SeqCst);
    });
}
