//! PNG decode/encode, widening everything to the engine's 16-bit RGBA
//! buffer and always writing back out at 16 bits per channel.
//!
//! Grounded in the teacher's `vfx_io::png` module - same decoder/encoder
//! setup, trimmed to the one pixel format this engine needs.

use crate::error::{IoError, Result};
use mosaic_core::{Image, Rgba16};
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Reads a PNG file, widening 8-bit channels to 16-bit (`v as u16 * 257`)
/// and converting grayscale/RGB sources to RGBA.
pub fn read<P: AsRef<Path>>(path: P) -> Result<Image> {
    let file = std::fs::File::open(path.as_ref())?;
    let decoder = png::Decoder::new(BufReader::new(file));
    let mut reader = decoder.read_info().map_err(|e| IoError::Decode(e.to_string()))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::Decode("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader.next_frame(&mut buf).map_err(|e| IoError::Decode(e.to_string()))?;
    let bytes = &buf[..info.buffer_size()];

    let mut image = Image::new(info.width, info.height)
        .map_err(|e| IoError::Decode(format!("invalid PNG dimensions: {e}")))?;

    match (info.color_type, info.bit_depth) {
        (png::ColorType::Grayscale, png::BitDepth::Eight) => {
            for (i, &g) in bytes.iter().enumerate() {
                set_widened(&mut image, i, widen8(g), widen8(g), widen8(g), u16::MAX);
            }
        }
        (png::ColorType::GrayscaleAlpha, png::BitDepth::Eight) => {
            for (i, ga) in bytes.chunks_exact(2).enumerate() {
                set_widened(&mut image, i, widen8(ga[0]), widen8(ga[0]), widen8(ga[0]), widen8(ga[1]));
            }
        }
        (png::ColorType::Rgb, png::BitDepth::Eight) => {
            for (i, rgb) in bytes.chunks_exact(3).enumerate() {
                set_widened(&mut image, i, widen8(rgb[0]), widen8(rgb[1]), widen8(rgb[2]), u16::MAX);
            }
        }
        (png::ColorType::Rgba, png::BitDepth::Eight) => {
            for (i, rgba) in bytes.chunks_exact(4).enumerate() {
                set_widened(&mut image, i, widen8(rgba[0]), widen8(rgba[1]), widen8(rgba[2]), widen8(rgba[3]));
            }
        }
        (png::ColorType::Grayscale, png::BitDepth::Sixteen) => {
            for (i, g) in bytes.chunks_exact(2).enumerate() {
                let g = be16(g);
                set_widened(&mut image, i, g, g, g, u16::MAX);
            }
        }
        (png::ColorType::GrayscaleAlpha, png::BitDepth::Sixteen) => {
            for (i, ga) in bytes.chunks_exact(4).enumerate() {
                let g = be16(&ga[0..2]);
                let a = be16(&ga[2..4]);
                set_widened(&mut image, i, g, g, g, a);
            }
        }
        (png::ColorType::Rgb, png::BitDepth::Sixteen) => {
            for (i, rgb) in bytes.chunks_exact(6).enumerate() {
                set_widened(&mut image, i, be16(&rgb[0..2]), be16(&rgb[2..4]), be16(&rgb[4..6]), u16::MAX);
            }
        }
        (png::ColorType::Rgba, png::BitDepth::Sixteen) => {
            for (i, rgba) in bytes.chunks_exact(8).enumerate() {
                set_widened(
                    &mut image,
                    i,
                    be16(&rgba[0..2]),
                    be16(&rgba[2..4]),
                    be16(&rgba[4..6]),
                    be16(&rgba[6..8]),
                );
            }
        }
        (color_type, bit_depth) => {
            return Err(IoError::UnsupportedColorType { color_type, bit_depth });
        }
    }

    Ok(image)
}

/// Writes `image` as a 16-bit-per-channel RGBA PNG.
pub fn write<P: AsRef<Path>>(path: P, image: &Image) -> Result<()> {
    let file = std::fs::File::create(path.as_ref())?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Sixteen);

    let mut writer = encoder.write_header().map_err(|e| IoError::Encode(e.to_string()))?;

    let mut bytes = Vec::with_capacity((image.width() as usize) * (image.height() as usize) * 8);
    for y in 0..image.height() {
        for x in 0..image.width() {
            let px = image.get(x, y).expect("in-bounds by construction");
            bytes.extend_from_slice(&px.r.to_be_bytes());
            bytes.extend_from_slice(&px.g.to_be_bytes());
            bytes.extend_from_slice(&px.b.to_be_bytes());
            bytes.extend_from_slice(&px.a.to_be_bytes());
        }
    }
    writer.write_image_data(&bytes).map_err(|e| IoError::Encode(e.to_string()))?;
    Ok(())
}

#[inline]
fn widen8(v: u8) -> u16 {
    v as u16 * 257
}

#[inline]
fn be16(bytes: &[u8]) -> u16 {
    u16::from_be_bytes([bytes[0], bytes[1]])
}

fn set_widened(image: &mut Image, pixel_index: usize, r: u16, g: u16, b: u16, a: u16) {
    let x = (pixel_index as u32) % image.width();
    let y = (pixel_index as u32) / image.width();
    image.set(x, y, Rgba16::new(r, g, b, a)).expect("pixel_index is in range by construction");
}
