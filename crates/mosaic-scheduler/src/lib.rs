//! # mosaic-scheduler
//!
//! Configuration, the tile-preparation/composition pipeline, and the
//! three interchangeable scheduling strategies that run it:
//! [`RunMode::Sequential`], [`RunMode::Parallel`] (fixed worker pool over
//! bounded channels), and [`RunMode::WorkSteal`] (fork-join over
//! [`mosaic_core::Deque`]). All three strategies produce the same output
//! image given the same [`Config::seed`].
//!
//! [`run`] is the single entry point the CLI calls: it resolves paths,
//! drives both stages under the configured strategy, saves the result,
//! and reports how long each stage took.

#![warn(missing_docs)]

mod compose;
mod config;
mod error;
mod fixed_pool;
mod sequential;
mod shared_output;
mod tile_prep;
mod timings;
mod work_steal;

pub use config::{Config, RunMode};
pub use error::{Result, SchedulerError};
pub use timings::Timings;

use mosaic_core::rect::tile_rects;
use std::time::Instant;

/// Runs one full mosaic generation: validates `config`, prepares tiles,
/// composites the output, saves it, and reports stage timings.
///
/// # Errors
///
/// Returns a [`SchedulerError`] for configuration violations, I/O
/// failures opening the input or tiles directory or saving the output,
/// or an empty tile set after stage A.
pub fn run(config: &Config) -> Result<Timings> {
    config.validate()?;

    let input = mosaic_io::png::read(&config.in_path)?;
    let mut out_img = input.resize(input.width() * config.upscale, input.height() * config.upscale)?;
    let rects = tile_rects(out_img.width(), out_img.height(), config.tile_size);

    let files = mosaic_io::tiles::scan_png_files(&config.tiles_dir)?;

    let stage_a_start = Instant::now();
    let tiles = match config.mode {
        RunMode::Sequential => sequential::stage_a(&files, config.tile_size),
        RunMode::Parallel => fixed_pool::stage_a(&files, config.tile_size, config.threads),
        RunMode::WorkSteal => work_steal::stage_a(&files, config.tile_size, config.threads),
    };
    let stage_a_elapsed = stage_a_start.elapsed();

    if tiles.is_empty() {
        return Err(SchedulerError::NoTilesLoaded(config.tiles_dir.clone()));
    }

    let stage_b_start = Instant::now();
    match config.mode {
        RunMode::Sequential => {
            sequential::stage_b(&mut out_img, &rects, &tiles, config.blendin, config.intensity, config.seed)
        }
        RunMode::Parallel => fixed_pool::stage_b(
            &mut out_img,
            &rects,
            &tiles,
            config.blendin,
            config.intensity,
            config.seed,
            config.threads,
        ),
        RunMode::WorkSteal => work_steal::stage_b(
            &mut out_img,
            &rects,
            &tiles,
            config.blendin,
            config.intensity,
            config.seed,
            config.threads,
        ),
    };
    let stage_b_elapsed = stage_b_start.elapsed();

    mosaic_io::png::write(&config.out_path, &out_img)?;

    tracing::info!(
        stage_a_secs = stage_a_elapsed.as_secs_f64(),
        stage_b_secs = stage_b_elapsed.as_secs_f64(),
        tiles = tiles.len(),
        rects = rects.len(),
        "mosaic run complete"
    );

    Ok(Timings { stage_a: stage_a_elapsed, stage_b: stage_b_elapsed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mosaic_core::{Image, Rgba16};
    use std::path::PathBuf;

    fn write_solid_png(path: &std::path::Path, size: u32, px: Rgba16) {
        let mut img = Image::new(size, size).unwrap();
        for y in 0..size {
            for x in 0..size {
                img.set(x, y, px).unwrap();
            }
        }
        mosaic_io::png::write(path, &img).unwrap();
    }

    fn base_config(dir: &std::path::Path, mode: RunMode) -> Config {
        Config {
            in_path: dir.join("in.png"),
            out_path: dir.join("out.png"),
            tiles_dir: dir.join("tiles"),
            tile_size: 2,
            upscale: 1,
            intensity: 0.0,
            blendin: 0.0,
            mode,
            threads: 3,
            seed: Some(1),
        }
    }

    #[test]
    fn s5_zero_intensity_is_an_identity_blend() {
        let dir = tempfile::tempdir().unwrap();
        let input_px = Rgba16::new(10, 20, 30, 65535);
        write_solid_png(&dir.path().join("in.png"), 4, input_px);
        std::fs::create_dir(dir.path().join("tiles")).unwrap();
        write_solid_png(&dir.path().join("tiles/a.png"), 8, Rgba16::new(1000, 2000, 3000, 65535));

        let mut config = base_config(dir.path(), RunMode::Sequential);
        config.upscale = 2;
        run(&config).unwrap();

        let out = mosaic_io::png::read(&config.out_path).unwrap();
        let expected = mosaic_io::png::read(&dir.path().join("in.png")).unwrap().resize(8, 8).unwrap();
        assert_eq!(out.width(), expected.width());
        assert_eq!(out.height(), expected.height());
        for y in 0..out.height() {
            for x in 0..out.width() {
                assert_eq!(out.get(x, y).unwrap(), expected.get(x, y).unwrap());
            }
        }
    }

    #[test]
    fn s6_all_three_modes_agree_given_one_tile_and_a_seed() {
        let dir = tempfile::tempdir().unwrap();
        write_solid_png(&dir.path().join("in.png"), 6, Rgba16::new(40, 50, 60, 65535));
        std::fs::create_dir(dir.path().join("tiles")).unwrap();
        write_solid_png(&dir.path().join("tiles/a.png"), 8, Rgba16::new(5000, 6000, 7000, 65535));

        let mut outputs = Vec::new();
        for mode in [RunMode::Sequential, RunMode::Parallel, RunMode::WorkSteal] {
            let mut config = base_config(dir.path(), mode);
            config.out_path = dir.path().join(format!("out_{mode:?}.png"));
            config.blendin = 0.3;
            config.intensity = 0.2;
            run(&config).unwrap();
            outputs.push(mosaic_io::png::read(&config.out_path).unwrap());
        }
        for y in 0..6 {
            for x in 0..6 {
                let first = outputs[0].get(x, y).unwrap();
                for other in &outputs[1..] {
                    assert_eq!(other.get(x, y).unwrap(), first);
                }
            }
        }
    }

    /// `s5`/`s6` above only exercise cross-mode agreement and the
    /// `intensity=0`/`blendin=0` identity paths - neither touches whether
    /// `color_transfer` itself produces the reference's tonal range rather
    /// than collapsing to near-black. With `blendin=1, intensity=1` the
    /// output is exactly `tile.color_transfer(&input_region)` (see
    /// `base_config`'s blend/intensity short-circuits exercised above), so
    /// a single-rect image lets the expected pixels be hand-derived the
    /// same way `image.rs`'s `color_transfer` unit tests do: a tile level
    /// whose own CDF isn't saturated (R=10, half the tile's mass) lands at
    /// the reference's matching cumulative level (R=199), not 0.
    #[test]
    fn color_transfer_through_the_pipeline_matches_the_references_tonal_range() {
        let dir = tempfile::tempdir().unwrap();

        let mut input = Image::new(2, 2).unwrap();
        for y in 0..2 {
            input.set(0, y, Rgba16::new(0x3200, 0, 0, 65535)).unwrap();
            input.set(1, y, Rgba16::new(0xC800, 0, 0, 65535)).unwrap();
        }
        mosaic_io::png::write(&dir.path().join("in.png"), &input).unwrap();

        let mut tile = Image::new(2, 2).unwrap();
        for y in 0..2 {
            tile.set(0, y, Rgba16::new(0x0A00, 0, 0, 65535)).unwrap();
            tile.set(1, y, Rgba16::new(0x9600, 0, 0, 65535)).unwrap();
        }
        std::fs::create_dir(dir.path().join("tiles")).unwrap();
        mosaic_io::png::write(&dir.path().join("tiles/a.png"), &tile).unwrap();

        let mut config = base_config(dir.path(), RunMode::Sequential);
        config.blendin = 1.0;
        config.intensity = 1.0;
        run(&config).unwrap();

        let out = mosaic_io::png::read(&config.out_path).unwrap();
        for y in 0..2 {
            // Source level 10 has half the tile's mass (not saturated):
            // matches the reference's cumulative level, 199.
            assert_eq!(out.get(0, y).unwrap().r, 199 * 256);
            // Source level 150 is the tile's topmost populated level, so
            // its own CDF is already 1.0 - the one legitimate collapse case
            // documented in DESIGN.md's open question 1.
            assert_eq!(out.get(1, y).unwrap().r, 0);
        }
    }

    #[test]
    fn empty_tiles_directory_is_a_fatal_error() {
        let dir = tempfile::tempdir().unwrap();
        write_solid_png(&dir.path().join("in.png"), 4, Rgba16::new(1, 2, 3, 65535));
        std::fs::create_dir(dir.path().join("tiles")).unwrap();

        let config = base_config(dir.path(), RunMode::Sequential);
        let err = run(&config).unwrap_err();
        assert!(matches!(err, SchedulerError::NoTilesLoaded(p) if p == PathBuf::from(dir.path().join("tiles"))));
    }

    #[test]
    fn invalid_config_is_rejected_before_touching_any_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = base_config(dir.path(), RunMode::Sequential);
        config.intensity = 2.0;
        assert!(matches!(run(&config), Err(SchedulerError::InvalidIntensity(_))));
    }
}
