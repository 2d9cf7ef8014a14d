// quadcam: live webcam frames on a transformable quad, filtered through
// either a CPU pixel path or a GPU-style parameter path, with an automated
// benchmark sweep over resolution x backend x filter x transform.

pub mod camera;
pub mod config;
pub mod error;
pub mod filters;
pub mod metrics;
pub mod pipeline;
pub mod render;
pub mod sweep;
pub mod transform;
pub mod types;
pub mod window;

pub use error::Error;
