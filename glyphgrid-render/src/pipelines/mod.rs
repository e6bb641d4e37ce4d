//! wgpu render pipelines.

pub mod sdf_text;
