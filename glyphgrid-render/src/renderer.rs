//! High-level renderer that ties the GPU context and the SDF text pipeline
//! together into per-frame `prepare` + `render_*` calls.

use thiserror::Error;
use wgpu::{
    Color, CommandEncoderDescriptor, LoadOp, Operations, RenderPassColorAttachment,
    RenderPassDescriptor, StoreOp, TextureView, TextureViewDescriptor,
};

use crate::context::GpuContext;
use crate::pipelines::sdf_text::SdfTextPipeline;
use crate::texture::AtlasTexture;
use crate::vertex::{CameraUniform, GlyphVertex, SdfUniform};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error("No surface configured (headless mode)")]
    NoSurface,
}

/// Frame statistics returned after each render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Vertices submitted (six per glyph or caret quad).
    pub vertex_count: u32,
    /// Number of draw calls.
    pub draw_calls: u32,
}

impl FrameStats {
    pub fn quad_count(&self) -> u32 {
        self.vertex_count / 6
    }
}

/// Renders one text run (plus caret) per frame.
///
/// ```ignore
/// let mut renderer = Renderer::new(&gpu, 1024);
/// renderer.upload_atlas(&gpu, &AtlasTexture::from_bitmap(&atlas.bitmap));
/// renderer.prepare(&gpu, &vertices, &viewport.camera(w, h));
/// let stats = renderer.render_to_surface(&gpu)?;
/// ```
pub struct Renderer {
    text_pipeline: SdfTextPipeline,
    clear_color: Color,
    sdf: SdfUniform,
}

impl Renderer {
    pub fn new(gpu: &GpuContext, atlas_size: u32) -> Self {
        let text_pipeline = SdfTextPipeline::new(&gpu.device, gpu.surface_format, atlas_size);
        let sdf = SdfUniform::default();
        text_pipeline.upload_sdf(&gpu.queue, &sdf);

        Self {
            text_pipeline,
            clear_color: Color {
                r: 0.0,
                g: 0.0,
                b: 0.0,
                a: 1.0,
            },
            sdf,
        }
    }

    pub fn set_clear_color(&mut self, r: f64, g: f64, b: f64, a: f64) {
        self.clear_color = Color { r, g, b, a };
    }

    /// Replace the shading parameters; uploaded on the next `prepare`.
    pub fn set_sdf(&mut self, sdf: SdfUniform) {
        self.sdf = sdf;
    }

    pub fn sdf(&self) -> &SdfUniform {
        &self.sdf
    }

    /// Replace the atlas texture. Call whenever the current font atlas
    /// changes.
    pub fn upload_atlas(&mut self, gpu: &GpuContext, atlas: &AtlasTexture) {
        self.text_pipeline.upload_atlas(&gpu.device, &gpu.queue, atlas);
    }

    /// Upload per-frame data (vertices, camera, shading params).
    pub fn prepare(&mut self, gpu: &GpuContext, vertices: &[GlyphVertex], camera: &CameraUniform) {
        self.text_pipeline.upload_vertices(&gpu.device, &gpu.queue, vertices);
        self.text_pipeline.upload_camera(&gpu.queue, camera);
        self.text_pipeline.upload_sdf(&gpu.queue, &self.sdf);
    }

    /// Render to the window surface.
    pub fn render_to_surface(&self, gpu: &GpuContext) -> Result<FrameStats, RenderError> {
        let surface = gpu.surface.as_ref().ok_or(RenderError::NoSurface)?;
        let output = surface.get_current_texture()?;
        let view = output.texture.create_view(&TextureViewDescriptor::default());

        let stats = self.encode_and_submit(gpu, &view, "glyphgrid_frame");
        output.present();
        Ok(stats)
    }

    /// Render to an off-screen texture (headless mode).
    pub fn render_to_texture(&self, gpu: &GpuContext, target_view: &TextureView) -> FrameStats {
        self.encode_and_submit(gpu, target_view, "glyphgrid_offscreen")
    }

    fn encode_and_submit(&self, gpu: &GpuContext, view: &TextureView, label: &str) -> FrameStats {
        let mut encoder = gpu.device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some(label),
        });

        {
            let mut pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some(label),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(self.clear_color),
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.text_pipeline.draw(&mut pass);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));

        let vertex_count = self.text_pipeline.vertex_count();
        FrameStats {
            vertex_count,
            draw_calls: u32::from(vertex_count > 0),
        }
    }

    pub fn text_pipeline(&self) -> &SdfTextPipeline {
        &self.text_pipeline
    }
}

// ===================================================================
// Tests
// ===================================================================
