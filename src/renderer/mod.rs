//! WebGPU rendering module
//!
//! Uses SDF (Signed Distance Fields) for all rendering in the fragment shader.

mod error;
pub mod frame;
pub mod sdf_pipeline;

pub use error::RenderError;
pub use frame::FrameData;
pub use sdf_pipeline::SdfRenderState;
