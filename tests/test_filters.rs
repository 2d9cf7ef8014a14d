// tests/test_filters.rs — CPU filter engine properties.

use quadcam::filters::{self, RED_THRESHOLD};
use quadcam::types::{pack, unpack, Frame, FilterKind};

fn frame_filled(w: usize, h: usize, px: u32) -> Frame {
    Frame::from_pixels(w, h, vec![px; w * h])
}

// ===== Pixelate =====

#[test]
fn pixelate_preserves_dimensions() {
    let src = frame_filled(37, 23, pack(10, 20, 30));
    let out = filters::pixelate(&src, 10);
    assert_eq!(out.width, 37);
    assert_eq!(out.height, 23);
}

#[test]
fn pixelate_block_is_exact_mean() {
    // One 4x4 block with known channel sums:
    //   r = x + 4y  (sum 120, mean 7.5 -> rounds to 8)
    //   g = 2(x + 4y) (sum 240 -> mean 15 exactly)
    //   b = 255 everywhere
    let mut src = Frame::new(4, 4);
    for y in 0..4 {
        for x in 0..4 {
            let v = (x + 4 * y) as u32;
            src.set(x, y, pack(v, 2 * v, 255));
        }
    }
    let out = filters::pixelate(&src, 4);
    let expected = pack(8, 15, 255);
    for y in 0..4 {
        for x in 0..4 {
            assert_eq!(out.get(x, y), expected, "mismatch at ({x}, {y})");
        }
    }
}

#[test]
fn pixelate_edge_blocks_average_clipped_extent() {
    // 5x3 image, block 4: the right edge block is a 1x3 strip. It must be
    // averaged over exactly that strip, never over out-of-bounds pixels.
    let mut src = frame_filled(5, 3, pack(10, 10, 10));
    for y in 0..3 {
        src.set(4, y, pack(200, 200, 200));
    }
    let out = filters::pixelate(&src, 4);
    for y in 0..3 {
        // Interior block keeps its own mean.
        assert_eq!(out.get(0, y), pack(10, 10, 10));
        // Edge strip mean is the strip's own value, undiluted.
        assert_eq!(out.get(4, y), pack(200, 200, 200));
    }
}

#[test]
fn pixelate_uniform_image_is_unchanged() {
    let src = frame_filled(17, 11, pack(90, 40, 160));
    let out = filters::pixelate(&src, 10);
    for y in 0..11 {
        for x in 0..17 {
            assert_eq!(out.get(x, y), pack(90, 40, 160));
        }
    }
}

// ===== SinCity =====

#[test]
fn sincity_keeps_red_dominant_pixels() {
    let red = pack(200, 50, 50);
    let src = frame_filled(3, 3, red);
    let out = filters::sin_city(&src);
    for y in 0..3 {
        for x in 0..3 {
            assert_eq!(out.get(x, y), red);
        }
    }
}

#[test]
fn sincity_grays_everything_else() {
    let src = frame_filled(2, 2, pack(100, 120, 140));
    let out = filters::sin_city(&src);
    for y in 0..2 {
        for x in 0..2 {
            let (r, g, b) = unpack(out.get(x, y));
            assert_eq!(r, g, "gray pixels must be channel-equal");
            assert_eq!(g, b, "gray pixels must be channel-equal");
        }
    }
}

#[test]
fn sincity_thresholds_are_strict() {
    // Exactly at the absolute threshold: not dominant.
    assert!(!filters::is_red_dominant(pack(RED_THRESHOLD, 0, 0)));
    // Above the absolute threshold but within the 1.3x margin of green.
    assert!(!filters::is_red_dominant(pack(200, 160, 10)));
    // Clearly dominant.
    assert!(filters::is_red_dominant(pack(200, 120, 120)));
}

#[test]
fn sincity_is_per_pixel_deterministic() {
    // The classification depends only on the pixel's own channels, so the
    // same pixel value gives the same output wherever it sits.
    let mut src = Frame::new(4, 1);
    src.set(0, 0, pack(220, 30, 30));
    src.set(1, 0, pack(60, 60, 60));
    src.set(2, 0, pack(220, 30, 30));
    src.set(3, 0, pack(60, 60, 60));
    let out = filters::sin_city(&src);
    assert_eq!(out.get(0, 0), out.get(2, 0));
    assert_eq!(out.get(1, 0), out.get(3, 0));
}

// ===== Identity =====

#[test]
fn identity_is_pixel_exact_copy() {
    let mut src = Frame::new(6, 4);
    for y in 0..4 {
        for x in 0..6 {
            src.set(x, y, pack((x * 40) as u32, (y * 60) as u32, 5));
        }
    }
    let out = filters::apply(FilterKind::None, &src);
    assert_eq!(out.width, src.width);
    assert_eq!(out.height, src.height);
    assert_eq!(out.pixels, src.pixels);
}
