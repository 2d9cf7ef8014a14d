// Render bridge: the contract through which processed pixels (CPU path) or
// parameter state (GPU path) reach the display surface, plus the software
// rasterizer that stands in for the render programs.
//
// The rasterizer plays the shader's role: `sample_program` is what the
// fragment program computes per texel, `rasterize_quad` is the transformed
// quad draw. Keeping both as pure functions lets the CPU/GPU parity
// properties run headless.

use crate::filters::{sin_city_pixel, PIXELATE_BLOCK};
use crate::transform::TransformState;
use crate::types::{FilterKind, Frame};
use crate::Error;

/// What the main loop and the sweep talk to. One call each of
/// `select_program` / `push_transform` / `push_frame_texture` per frame,
/// then `draw_frame`. All three pushes are idempotent.
pub trait RenderBridge {
    fn select_program(&mut self, kind: FilterKind);
    fn push_transform(&mut self, transform: &TransformState);
    fn push_frame_texture(&mut self, frame: &Frame);
    fn draw_frame(&mut self) -> Result<(), Error>;
}

/// Evaluate the selected program at one texel.
///
/// `Pixelate` here is the shader semantics: sample at the block-quantized
/// coordinate (one representative texel), not the CPU path's block mean.
/// The two are intentionally equivalent in intent, not bit-identical.
#[inline]
pub fn sample_program(program: FilterKind, tex: &Frame, x: usize, y: usize) -> u32 {
    match program {
        FilterKind::None => tex.get(x, y),
        FilterKind::Pixelate => {
            // Quantize to the block's top-left texel; callers pass in-bounds
            // coordinates, so the quantized pair stays in bounds too.
            tex.get(x - x % PIXELATE_BLOCK, y - y % PIXELATE_BLOCK)
        }
        FilterKind::SinCity => sin_city_pixel(tex.get(x, y)),
    }
}

/// Draw the textured quad into `out` under the given transform and program.
///
/// The quad fills `out` at identity: the texture is stretched to the output
/// size, then translated by a fraction of the output size (+y up), rotated
/// counterclockwise about its center, and scaled. Uncovered output pixels
/// are black.
pub fn rasterize_quad(tex: &Frame, t: &TransformState, program: FilterKind, out: &mut Frame) {
    let ow = out.width;
    let oh = out.height;

    let theta = t.rotate_deg.to_radians();
    let (sin, cos) = theta.sin_cos();
    let scale = t.effective_scale();

    // Where the quad center lands on screen. +translate_y moves up, so it
    // subtracts in row coordinates; this must match the CPU warp's sign.
    let cx = ow as f32 / 2.0 + t.translate_x * ow as f32;
    let cy = oh as f32 / 2.0 - t.translate_y * oh as f32;

    // Texture stretch factors (output pixel -> texel).
    let sx_tex = tex.width as f32 / ow as f32;
    let sy_tex = tex.height as f32 / oh as f32;

    for y in 0..oh {
        for x in 0..ow {
            let vx = x as f32 - cx;
            let vy = y as f32 - cy;
            // Inverse rotation+scale, same matrix as transform::warp_affine.
            let ux = (cos * vx - sin * vy) / scale + ow as f32 / 2.0;
            let uy = (sin * vx + cos * vy) / scale + oh as f32 / 2.0;

            let tx = (ux * sx_tex).round() as isize;
            let ty = (uy * sy_tex).round() as isize;
            if tx >= 0 && ty >= 0 && (tx as usize) < tex.width && (ty as usize) < tex.height {
                let px = sample_program(program, tex, tx as usize, ty as usize);
                out.set(x, y, px);
            } else {
                out.set(x, y, 0);
            }
        }
    }
}

/// A bridge that renders nowhere. Used by the sweep tests and useful for
/// measuring the non-display cost of a pipeline; records how many draws
/// happened so callers can assert on it.
pub struct NullBridge {
    pub program: FilterKind,
    pub transform: TransformState,
    pub texture: Option<Frame>,
    pub draws: u64,
}

impl NullBridge {
    pub fn new() -> Self {
        Self {
            program: FilterKind::None,
            transform: TransformState::identity(),
            texture: None,
            draws: 0,
        }
    }
}

impl Default for NullBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBridge for NullBridge {
    fn select_program(&mut self, kind: FilterKind) {
        self.program = kind;
    }

    fn push_transform(&mut self, transform: &TransformState) {
        self.transform = *transform;
    }

    fn push_frame_texture(&mut self, frame: &Frame) {
        self.texture = Some(frame.clone());
    }

    fn draw_frame(&mut self) -> Result<(), Error> {
        self.draws += 1;
        Ok(())
    }
}
