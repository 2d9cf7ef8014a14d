// CPU filter engine: pure frame-to-frame functions, one per FilterKind.
// Inputs are assumed structurally valid; the capture boundary already
// rejected anything empty or mis-strided.

use crate::types::{pack, unpack, FilterKind, Frame};

/// Block side for the pixelate filter, in source pixels.
pub const PIXELATE_BLOCK: usize = 10;

/// Absolute red intensity a pixel must exceed to count as red-dominant.
pub const RED_THRESHOLD: u32 = 150;
/// Relative margin over the other two channels (red > 1.3x green and blue).
pub const RED_MARGIN: f32 = 1.3;

/// Dispatch on the active filter. `None` still copies, since downstream may
/// mutate the result in place.
pub fn apply(kind: FilterKind, src: &Frame) -> Frame {
    match kind {
        FilterKind::None => identity(src),
        FilterKind::Pixelate => pixelate(src, PIXELATE_BLOCK),
        FilterKind::SinCity => sin_city(src),
    }
}

/// A true identity: output pixel-for-pixel equal to input.
pub fn identity(src: &Frame) -> Frame {
    src.clone()
}

/// Replace every pixel in each `block`-sided tile by the tile's mean color.
/// Tiles at the right/bottom edge are clipped to the image and averaged over
/// their actual extent, so no out-of-bounds pixel is ever sampled.
pub fn pixelate(src: &Frame, block: usize) -> Frame {
    let block = block.max(1);
    let mut dst = src.clone();

    let mut by = 0;
    while by < src.height {
        let bh = block.min(src.height - by);
        let mut bx = 0;
        while bx < src.width {
            let bw = block.min(src.width - bx);

            // Sum the tile, channel by channel.
            let (mut sr, mut sg, mut sb) = (0u64, 0u64, 0u64);
            for y in by..by + bh {
                for x in bx..bx + bw {
                    let (r, g, b) = unpack(src.get(x, y));
                    sr += r as u64;
                    sg += g as u64;
                    sb += b as u64;
                }
            }
            // Round to nearest, like OpenCV's mean + saturate_cast does.
            let n = (bw * bh) as u64;
            let mean = pack(
                ((sr + n / 2) / n) as u32,
                ((sg + n / 2) / n) as u32,
                ((sb + n / 2) / n) as u32,
            );

            // Flood the tile with its mean.
            for y in by..by + bh {
                for x in bx..bx + bw {
                    dst.set(x, y, mean);
                }
            }
            bx += block;
        }
        by += block;
    }
    dst
}

/// True when a pixel's red channel beats the absolute threshold and both
/// other channels by the relative margin. Depends only on that pixel.
#[inline]
pub fn is_red_dominant(px: u32) -> bool {
    let (r, g, b) = unpack(px);
    r > RED_THRESHOLD && r as f32 > g as f32 * RED_MARGIN && r as f32 > b as f32 * RED_MARGIN
}

/// Luminance grayscale of one pixel, replicated across channels.
/// Same 0.299/0.587/0.114 weights OpenCV's BGR2GRAY uses.
#[inline]
pub fn grayscale_pixel(px: u32) -> u32 {
    let (r, g, b) = unpack(px);
    let y = (r * 299 + g * 587 + b * 114) / 1000;
    pack(y, y, y)
}

/// Per-pixel SinCity classification: red-dominant pixels keep their original
/// color, everything else goes grayscale. Shared with the GPU program
/// emulation so both paths classify identically.
#[inline]
pub fn sin_city_pixel(px: u32) -> u32 {
    if is_red_dominant(px) { px } else { grayscale_pixel(px) }
}

/// SinCity over a whole frame. Pure per-pixel work, no spatial dependency.
pub fn sin_city(src: &Frame) -> Frame {
    let mut dst = src.clone();
    for y in 0..src.height {
        for x in 0..src.width {
            dst.set(x, y, sin_city_pixel(src.get(x, y)));
        }
    }
    dst
}
