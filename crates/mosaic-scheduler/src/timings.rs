//! Wall-clock timings for the two bulk stages.

use std::time::Duration;

/// How long stage A (tile preparation) and stage B (composition) took.
///
/// The driver prints both as seconds with two decimals: one line between
/// the stages, one line after the output image has been saved.
#[derive(Debug, Clone, Copy)]
pub struct Timings {
    /// Tile directory scan, decode, and resize.
    pub stage_a: Duration,
    /// Rectangle covering, color transfer, and blend composition.
    pub stage_b: Duration,
}
