//! # glyphgrid-render
//!
//! GPU backend for glyphgrid, built on `wgpu`.
//!
//! ## Architecture
//!
//! ```text
//!  FontAtlas (glyphgrid-text)          TextRun + CaretQuad
//!       │                                    │
//!       ▼                                    ▼
//!  AtlasTexture::from_bitmap()        bridge::build_vertices()
//!   (row flip + mip chain)                   │
//!       │                                    ▼
//!       └──► Renderer.upload_atlas()   Renderer.prepare(vertices, camera)
//!                                            │
//!                     Viewport.camera() ─────┘
//!                                            ▼
//!                                  Renderer.render_to_surface()
//! ```
//!
//! ## Crate modules
//!
//! - [`context`]: GPU device/queue/surface initialisation
//! - [`vertex`]: vertex and uniform data types
//! - [`texture`]: atlas upload preparation
//! - [`pipelines`]: the SDF text pipeline and its WGSL shader
//! - [`renderer`]: frame orchestration
//! - [`bridge`]: text run → vertex conversion
//! - [`viewport`]: pan/zoom state

pub mod bridge;
pub mod context;
pub mod pipelines;
pub mod renderer;
pub mod texture;
pub mod vertex;
pub mod viewport;

// Re-exports for convenience
pub use bridge::build_vertices;
pub use context::{GpuContext, GpuError};
pub use renderer::{FrameStats, RenderError, Renderer};
pub use texture::AtlasTexture;
pub use vertex::{CameraUniform, GlyphVertex, SdfUniform};
pub use viewport::{Viewport, ViewportEvent};
