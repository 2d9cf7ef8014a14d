// The backend-agnostic processing step: one validated frame in, one draw out.
//
// CPU path: bake the filter into the pixels, warp them by the resolved
// affine, then hand the bridge finished pixels (identity program, identity
// transform). GPU path: hand the bridge the raw frame and let the selected
// program plus the pushed uniforms do the work at draw time. Same visual
// result by two different routes.

use crate::filters;
use crate::render::RenderBridge;
use crate::transform::{self, TransformState};
use crate::types::{Backend, FilterKind, Frame};
use crate::Error;

pub fn process_frame<B: RenderBridge>(
    bridge: &mut B,
    frame: &Frame,
    filter: FilterKind,
    backend: Backend,
    transform: &TransformState,
) -> Result<(), Error> {
    match backend {
        Backend::Gpu => {
            bridge.select_program(filter);
            bridge.push_transform(transform);
            bridge.push_frame_texture(frame);
        }
        Backend::Cpu => {
            let filtered = filters::apply(filter, frame);
            let warped = transform::warp_affine(&filtered, transform);
            bridge.select_program(FilterKind::None);
            bridge.push_transform(&TransformState::identity());
            bridge.push_frame_texture(&warped);
        }
    }
    bridge.draw_frame()
}
