//! Renderer setup errors

/// Anything that can go wrong while bringing up WebGPU.
///
/// Per-frame failures stay as [`wgpu::SurfaceError`] so the caller can decide
/// between reconfiguring and skipping the frame.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("Surface creation failed: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("No suitable adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("Device request failed: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("Surface reports no supported formats")]
    NoSurfaceFormat,
}
