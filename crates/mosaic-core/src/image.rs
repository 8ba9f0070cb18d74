//! 16-bit RGBA image buffer and the color kernels the composition stage
//! runs over it: nearest-neighbour resize, histogram/CDF, histogram
//! specification (color transfer), and weighted blend.
//!
//! Memory layout is row-major, top-to-bottom, one [`Rgba16`] per pixel.

use crate::error::{CoreError, Result};
use crate::rect::TileRect;

/// An RGBA pixel with 16-bit channels, matching the source's 16-bit PNG
/// convention (`image.RGBA64` in the original).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba16 {
    /// Red channel.
    pub r: u16,
    /// Green channel.
    pub g: u16,
    /// Blue channel.
    pub b: u16,
    /// Alpha channel.
    pub a: u16,
}

impl Rgba16 {
    /// Builds a pixel from four 16-bit channel values.
    #[inline]
    pub const fn new(r: u16, g: u16, b: u16, a: u16) -> Self {
        Self { r, g, b, a }
    }
}

/// A rectangle of RGBA pixels with 16-bit channels.
#[derive(Debug, Clone)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<Rgba16>,
}

impl Image {
    /// Creates a black, fully-transparent image of the given dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidDimensions`] if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CoreError::invalid_dimensions(width, height, "width and height must be positive"));
        }
        Ok(Self {
            width,
            height,
            pixels: vec![Rgba16::default(); (width as usize) * (height as usize)],
        })
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Result<usize> {
        if x >= self.width || y >= self.height {
            return Err(CoreError::out_of_bounds(x, y, self.width, self.height));
        }
        Ok((y as usize) * (self.width as usize) + (x as usize))
    }

    /// Reads the pixel at `(x, y)`.
    pub fn get(&self, x: u32, y: u32) -> Result<Rgba16> {
        Ok(self.pixels[self.index(x, y)?])
    }

    /// Writes `color` to the pixel at `(x, y)`.
    pub fn set(&mut self, x: u32, y: u32, color: Rgba16) -> Result<()> {
        let idx = self.index(x, y)?;
        self.pixels[idx] = color;
        Ok(())
    }

    /// Raw pointer to the start of the pixel buffer.
    ///
    /// Exists so the composition stage's worker threads can write into
    /// disjoint tile rectangles of the same output image without a lock
    /// (see the data model's ownership note: the rectangle partition
    /// guarantees no two workers ever touch the same index). Callers
    /// dereferencing this pointer are responsible for staying within
    /// `width * height` and for not aliasing another thread's writes.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut Rgba16 {
        self.pixels.as_mut_ptr()
    }

    /// Resizes this image to `(width, height)` by nearest-neighbour
    /// sampling. No interpolation, no filtering.
    pub fn resize(&self, width: u32, height: u32) -> Result<Image> {
        let mut out = Image::new(width, height)?;
        for y in 0..height {
            let src_y = (y as u64 * self.height as u64 / height as u64) as u32;
            for x in 0..width {
                let src_x = (x as u64 * self.width as u64 / width as u64) as u32;
                let px = self.get(src_x, src_y)?;
                out.set(x, y, px)?;
            }
        }
        Ok(out)
    }

    /// Copies the pixels within `rect` into a new image the size of that
    /// rectangle.
    pub fn subsize(&self, rect: TileRect) -> Result<Image> {
        let mut out = Image::new(rect.width(), rect.height())?;
        for y in 0..rect.height() {
            for x in 0..rect.width() {
                let px = self.get(rect.x0 + x, rect.y0 + y)?;
                out.set(x, y, px)?;
            }
        }
        Ok(out)
    }

    /// Per-channel relative frequency of each of the 256 high-byte levels
    /// (`channel >> 8`), normalized to `[0, 1]` by pixel count.
    pub fn histogram(&self) -> [[f64; 256]; 3] {
        let mut hist = [[0.0f64; 256]; 3];
        for px in &self.pixels {
            hist[0][(px.r >> 8) as usize] += 1.0;
            hist[1][(px.g >> 8) as usize] += 1.0;
            hist[2][(px.b >> 8) as usize] += 1.0;
        }
        let total = self.pixels.len() as f64;
        for channel in &mut hist {
            for bucket in channel.iter_mut() {
                *bucket /= total;
            }
        }
        hist
    }

    /// Per-channel cumulative distribution function: a prefix sum of
    /// [`Image::histogram`], normalized to `[0, 1]`.
    pub fn cdf(&self) -> [[f64; 256]; 3] {
        let hist = self.histogram();
        let mut cdf = hist;
        for channel in &mut cdf {
            let mut running = 0.0;
            for bucket in channel.iter_mut() {
                running += *bucket;
                *bucket = running;
            }
        }
        cdf
    }

    /// Remaps every pixel's channels through `lut[channel][value >> 8]`,
    /// rounding and restoring the low byte as zero (`x256`). Alpha passes
    /// through unchanged.
    pub fn map_pixels(&self, lut: &[[f64; 256]; 3]) -> Image {
        let mut out = self.clone();
        for px in &mut out.pixels {
            let map = |channel: usize, value: u16| -> u16 {
                (lut[channel][(value >> 8) as usize].round() as i64 * 256).clamp(0, u16::MAX as i64) as u16
            };
            let r = map(0, px.r);
            let g = map(1, px.g);
            let b = map(2, px.b);
            *px = Rgba16::new(r, g, b, px.a);
        }
        out
    }

    /// Histogram specification: reshapes this image's per-channel CDF
    /// toward `reference`'s CDF and returns the remapped image.
    ///
    /// For each channel and each source level `k`, the lookup table entry
    /// is `interp(reference_cdf[channel], LEVELS, self_cdf[channel][k])`:
    /// the query is this image's own CDF value at `k` (a probability in
    /// `[0, 1]`), the breakpoints are the reference's CDF (also `[0, 1]`),
    /// and the interpolated values are the plain output levels `0..255`.
    /// This finds the reference level whose cumulative frequency matches
    /// this image's cumulative frequency at `k`, which is the definition
    /// of histogram matching. Argument order matters: the query and the
    /// breakpoints must both be CDF values for the ascending scan to land
    /// anywhere but the last entry.
    pub fn color_transfer(&self, reference: &Image) -> Image {
        let src_cdf = self.cdf();
        let ref_cdf = reference.cdf();
        let levels: [f64; 256] = std::array::from_fn(|i| i as f64);
        let mut lut = [[0.0f64; 256]; 3];
        for channel in 0..3 {
            for level in 0..256 {
                lut[channel][level] = interp(&ref_cdf[channel], &levels, src_cdf[channel][level]);
            }
        }
        self.map_pixels(&lut)
    }
}

/// Linear interpolation between breakpoints.
///
/// Finds the largest `i < xp.len() - 1` with `xp[i + 1] <= xi` by linear
/// ascending scan, then returns the linear interpolation of `fp` at that
/// position. Returns `0.0` if `xi` falls past the last breakpoint rather
/// than clamping to `fp[xp.len() - 1]` - a conscious simplification
/// carried over from the source (see DESIGN.md open question 1).
///
/// # Panics
///
/// Panics if `xp` and `fp` have different lengths or either is empty.
pub fn interp(xp: &[f64], fp: &[f64], xi: f64) -> f64 {
    assert_eq!(xp.len(), fp.len(), "interp: parallel arrays must have equal length");
    assert!(!xp.is_empty(), "interp: arrays must be non-empty");

    let mut i = 0;
    while i < xp.len() - 1 && xp[i + 1] <= xi {
        i += 1;
    }

    if i < xp.len() - 1 {
        let (x0, x1) = (xp[i], xp[i + 1]);
        let (y0, y1) = (fp[i], fp[i + 1]);
        y0 + (y1 - y0) * (xi - x0) / (x1 - x0)
    } else {
        0.0
    }
}

/// Pixel-level weighted average: `round(src * (1 - w) + dst * w)` per
/// channel, including alpha. Short-circuits at the extremes so `w <= 0`
/// returns `src` exactly and `w >= 1` returns `dst` exactly.
pub fn color_blend(src: Rgba16, dst: Rgba16, w: f64) -> Rgba16 {
    if w <= 0.0 {
        return src;
    }
    if w >= 1.0 {
        return dst;
    }
    let mix = |s: u16, d: u16| -> u16 {
        (s as f64 * (1.0 - w) + d as f64 * w).round().clamp(0.0, u16::MAX as f64) as u16
    };
    Rgba16::new(mix(src.r, dst.r), mix(src.g, dst.g), mix(src.b, dst.b), mix(src.a, dst.a))
}
