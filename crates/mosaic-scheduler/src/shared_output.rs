//! A `Send + Sync` handle onto one [`Image`]'s pixel buffer, for stage B's
//! worker threads to write into disjoint tile rectangles without a lock.
//!
//! Grounded in the same reasoning `mosaic_core::Deque` uses for its own
//! unsafe slot access: the data structure gives out shared access, and
//! safety rests on a property its caller guarantees rather than one the
//! type itself can check - here, that `mosaic_core::rect::tile_rects`
//! partitions the image into non-overlapping rectangles, so two workers
//! never address the same pixel.

use mosaic_core::{Image, Rgba16, TileRect};

pub struct SharedOutput {
    ptr: *mut Rgba16,
    width: u32,
    height: u32,
}

// SAFETY: every write goes through `set`, whose caller contract (via
// `TileRect` partitioning) guarantees distinct indices across threads.
unsafe impl Send for SharedOutput {}
unsafe impl Sync for SharedOutput {}

impl SharedOutput {
    pub fn new(image: &mut Image) -> Self {
        Self { width: image.width(), height: image.height(), ptr: image.as_mut_ptr() }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        (y as usize) * (self.width as usize) + (x as usize)
    }

    /// Reads the pixel at `(x, y)`.
    ///
    /// Safe to call concurrently with other threads' `set` calls as long
    /// as no rectangle partition overlaps this `(x, y)` - reads of a
    /// worker's own not-yet-written rectangle observe the pre-stage
    /// value, which is exactly what stage B's `ref := outImg.Subsize(R)`
    /// step needs.
    pub fn get(&self, x: u32, y: u32) -> Rgba16 {
        let idx = self.index(x, y);
        // SAFETY: idx < width * height by the debug_assert above; no
        // other thread holds a `&mut` to this buffer for the run's
        // duration.
        unsafe { *self.ptr.add(idx) }
    }

    /// Writes `color` to the pixel at `(x, y)`.
    ///
    /// # Safety (caller contract)
    ///
    /// No two threads may call `set` with the same `(x, y)` concurrently.
    /// Callers driving stage B satisfy this by assigning each worker a
    /// distinct, non-overlapping [`TileRect`].
    pub fn set(&self, x: u32, y: u32, color: Rgba16) {
        let idx = self.index(x, y);
        // SAFETY: see `get`; disjointness is the caller's contract.
        unsafe { *self.ptr.add(idx) = color }
    }

    /// Copies `rect` out of the shared buffer into a standalone image.
    pub fn read_rect(&self, rect: TileRect) -> Image {
        let mut out = Image::new(rect.width(), rect.height()).expect("non-empty rect by construction");
        for y in 0..rect.height() {
            for x in 0..rect.width() {
                out.set(x, y, self.get(rect.x0 + x, rect.y0 + y)).expect("in bounds by construction");
            }
        }
        out
    }
}
