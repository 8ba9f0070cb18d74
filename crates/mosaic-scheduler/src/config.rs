//! Run configuration: paths, sizing, blend weights, scheduling strategy.

use crate::error::{Result, SchedulerError};
use std::path::PathBuf;

/// Which of the three scheduling strategies drives stage A and stage B.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Both stages run on the invoking thread.
    Sequential,
    /// A fixed pool of worker threads fed by bounded channels.
    Parallel,
    /// Fork-join work stealing over per-worker deques.
    WorkSteal,
}

/// Full configuration for one mosaic run.
///
/// `seed`, when set, makes tile selection (stage B step 2) reproducible:
/// each rectangle's RNG is derived from `seed` and the rectangle's index
/// in the rectangle list, so the same seed and mode produce the same
/// tile assignment regardless of which worker happens to process which
/// rectangle.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the input raster image.
    pub in_path: PathBuf,
    /// Path the composited output is written to.
    pub out_path: PathBuf,
    /// Directory of candidate tile images.
    pub tiles_dir: PathBuf,
    /// Edge length, in pixels, tiles are resized to.
    pub tile_size: u32,
    /// Integer factor the input is upscaled by before composition.
    pub upscale: u32,
    /// Weight `[0, 1]` blending the mosaic composition back over the
    /// upscaled input (0 = pure input, identity; 1 = pure mosaic).
    pub intensity: f64,
    /// Weight `[0, 1]` blending a tile against its color-transferred copy
    /// before the intensity blend (0 = untransferred tile, 1 = fully
    /// transferred).
    pub blendin: f64,
    /// Scheduling strategy.
    pub mode: RunMode,
    /// Worker count for [`RunMode::Parallel`] and [`RunMode::WorkSteal`].
    /// Ignored by [`RunMode::Sequential`].
    pub threads: usize,
    /// Optional seed for deterministic tile selection.
    pub seed: Option<u64>,
}

impl Config {
    /// Validates range constraints, returning the first violation found.
    pub fn validate(&self) -> Result<()> {
        if self.tile_size < 1 {
            return Err(SchedulerError::InvalidTileSize(self.tile_size));
        }
        if self.upscale < 1 {
            return Err(SchedulerError::InvalidUpscale(self.upscale));
        }
        if !(0.0..=1.0).contains(&self.intensity) {
            return Err(SchedulerError::InvalidIntensity(self.intensity));
        }
        if !(0.0..=1.0).contains(&self.blendin) {
            return Err(SchedulerError::InvalidBlendin(self.blendin));
        }
        if self.threads < 1 {
            return Err(SchedulerError::InvalidThreads(self.threads));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Config {
        Config {
            in_path: "in.png".into(),
            out_path: "out.png".into(),
            tiles_dir: "tiles".into(),
            tile_size: 16,
            upscale: 2,
            intensity: 0.5,
            blendin: 0.5,
            mode: RunMode::Sequential,
            threads: 4,
            seed: None,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(base().validate().is_ok());
    }

    #[test]
    fn zero_tile_size_rejected() {
        let mut c = base();
        c.tile_size = 0;
        assert!(matches!(c.validate(), Err(SchedulerError::InvalidTileSize(0))));
    }

    #[test]
    fn intensity_above_one_rejected() {
        let mut c = base();
        c.intensity = 1.1;
        assert!(matches!(c.validate(), Err(SchedulerError::InvalidIntensity(_))));
    }

    #[test]
    fn zero_threads_rejected() {
        let mut c = base();
        c.threads = 0;
        assert!(matches!(c.validate(), Err(SchedulerError::InvalidThreads(0))));
    }
}
