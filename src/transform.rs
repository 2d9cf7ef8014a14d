// Transform controller: the translate/rotate/scale state applied to the
// displayed quad, plus its resolution into the two backend representations.
//
// Conventions (both paths must visually agree, see the parity test):
// - translate is a fraction of the frame size, +x right, +y UP on screen
// - rotate is degrees, positive = counterclockwise on screen
// - scale is a factor about the frame center, clamped to a positive floor

use crate::types::Frame;

/// Smallest allowed scale; keeps the quad from degenerating or inverting.
pub const MIN_SCALE: f32 = 0.1;

/// Interactive per-key increments (one poll tick each).
pub const TRANSLATE_STEP: f32 = 0.01;
pub const ROTATE_STEP_DEG: f32 = 1.0;
pub const SCALE_STEP: f32 = 1.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformState {
    pub translate_x: f32,
    pub translate_y: f32,
    pub rotate_deg: f32,
    pub scale: f32,
}

impl Default for TransformState {
    fn default() -> Self {
        Self { translate_x: 0.0, translate_y: 0.0, rotate_deg: 0.0, scale: 1.0 }
    }
}

impl TransformState {
    /// Identity transform (what the sweep uses when transforms are off).
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn translate_by(&mut self, dx: f32, dy: f32) {
        self.translate_x += dx;
        self.translate_y += dy;
    }

    pub fn rotate_by(&mut self, degrees: f32) {
        self.rotate_deg += degrees;
    }

    /// Multiplicative scale step with the positive floor applied.
    pub fn scale_by(&mut self, factor: f32) {
        self.scale = (self.scale * factor).max(MIN_SCALE);
    }

    /// Effective scale as the warp and rasterizer use it.
    pub fn effective_scale(&self) -> f32 {
        self.scale.max(MIN_SCALE)
    }
}

/// Translation resolved into pixel units for a given frame size. The vertical
/// sign flips here: interactive +y means "up", image rows grow downward.
#[inline]
pub fn translate_px(t: &TransformState, width: usize, height: usize) -> (f32, f32) {
    (t.translate_x * width as f32, -t.translate_y * height as f32)
}

/// CPU-path resolution: warp the frame by rotation and scale about its
/// center, then shift by the pixel translation. Inverse-mapped with
/// nearest-neighbor sampling; pixels mapping outside the source are black.
pub fn warp_affine(src: &Frame, t: &TransformState) -> Frame {
    let w = src.width;
    let h = src.height;
    let mut dst = Frame::new(w, h);

    let theta = t.rotate_deg.to_radians();
    let (sin, cos) = theta.sin_cos();
    let scale = t.effective_scale();
    let (tx, ty) = translate_px(t, w, h);
    let cx = w as f32 / 2.0;
    let cy = h as f32 / 2.0;

    for y in 0..h {
        for x in 0..w {
            // Offset of this destination pixel from the moved center.
            let vx = x as f32 - cx - tx;
            let vy = y as f32 - cy - ty;
            // Undo rotation and scale. Screen-counterclockwise rotation in
            // row-major (y-down) coordinates is [[c, s], [-s, c]], so the
            // inverse applied here is [[c, -s], [s, c]] / scale.
            let sx = cx + (cos * vx - sin * vy) / scale;
            let sy = cy + (sin * vx + cos * vy) / scale;

            let ix = sx.round() as isize;
            let iy = sy.round() as isize;
            if ix >= 0 && iy >= 0 && (ix as usize) < w && (iy as usize) < h {
                dst.set(x, y, src.get(ix as usize, iy as usize));
            }
        }
    }
    dst
}
