//! GPU vertex and uniform data types for the SDF text renderer.
//!
//! All types derive `bytemuck::Pod` + `Zeroable` for zero-copy upload
//! to GPU buffers.

use bytemuck::{Pod, Zeroable};
use wgpu::{BufferAddress, VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

// ───────────────────────────────────────────────────────────────────
// Glyph vertex
// ───────────────────────────────────────────────────────────────────

/// One corner of a glyph or caret quad.
///
/// 24 bytes. Six of these make one quad (triangle list, no index buffer).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GlyphVertex {
    /// Model-space position (font-size units, origin at the run center).
    pub position: [f32; 2],
    /// Atlas UV with a bottom-left origin.
    pub uv: [f32; 2],
    /// 1.0 for solid fills (caret), 0.0 for SDF-sampled glyphs.
    pub solid: f32,
    pub _pad: f32,
}

impl GlyphVertex {
    pub fn glyph(position: [f32; 2], uv: [f32; 2]) -> Self {
        Self {
            position,
            uv,
            solid: 0.0,
            _pad: 0.0,
        }
    }

    pub fn solid(position: [f32; 2]) -> Self {
        Self {
            position,
            uv: [0.0; 2],
            solid: 1.0,
            _pad: 0.0,
        }
    }

    pub fn layout() -> VertexBufferLayout<'static> {
        static ATTRS: &[VertexAttribute] = &[
            // location(0) = position
            VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: VertexFormat::Float32x2,
            },
            // location(1) = uv
            VertexAttribute {
                offset: 8,
                shader_location: 1,
                format: VertexFormat::Float32x2,
            },
            // location(2) = solid
            VertexAttribute {
                offset: 16,
                shader_location: 2,
                format: VertexFormat::Float32,
            },
        ];
        VertexBufferLayout {
            array_stride: std::mem::size_of::<GlyphVertex>() as BufferAddress,
            step_mode: VertexStepMode::Vertex,
            attributes: ATTRS,
        }
    }
}

// ───────────────────────────────────────────────────────────────────
// Camera uniform
// ───────────────────────────────────────────────────────────────────

/// Camera uniform sent to the GPU once per frame.
///
/// 64 bytes: one column-major 4×4 matrix.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    /// Orthographic projection for a `width × height` pixel viewport
    /// looking at `center` (model units) with `scale` pixels per unit.
    ///
    /// `center` maps to the middle of the screen; Y grows upward.
    pub fn orthographic(width: f32, height: f32, center: [f32; 2], scale: f32) -> Self {
        // ndc_x = (x - cx) * scale / (width / 2)
        // ndc_y = (y - cy) * scale / (height / 2)
        let sx = 2.0 * scale / width.max(1.0);
        let sy = 2.0 * scale / height.max(1.0);
        let tx = -center[0] * sx;
        let ty = -center[1] * sy;

        Self {
            view_proj: [
                [sx,  0.0, 0.0, 0.0],
                [0.0, sy,  0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [tx,  ty,  0.0, 1.0],
            ],
        }
    }

    /// 1 model unit = 1 pixel, centered on the origin.
    pub fn identity(width: f32, height: f32) -> Self {
        Self::orthographic(width, height, [0.0, 0.0], 1.0)
    }

    /// Apply the matrix to a 2D point (z = 0, w = 1).
    pub fn project(&self, point: [f32; 2]) -> [f32; 2] {
        let m = &self.view_proj;
        [
            point[0] * m[0][0] + point[1] * m[1][0] + m[3][0],
            point[0] * m[0][1] + point[1] * m[1][1] + m[3][1],
        ]
    }
}

// ───────────────────────────────────────────────────────────────────
// SDF uniform
// ───────────────────────────────────────────────────────────────────

/// Distance-field shading parameters.
///
/// 32 bytes. `alpha = smoothstep(threshold - w, threshold + w, d)` with
/// `w = edge_scale * length(vec2(dpdx(d), dpdy(d)))`; fragments below
/// `alpha_cutoff` are discarded.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SdfUniform {
    pub threshold: f32,
    pub edge_scale: f32,
    pub alpha_cutoff: f32,
    pub _pad: f32,
    /// Linear RGBA text and caret color.
    pub color: [f32; 4],
}

impl Default for SdfUniform {
    fn default() -> Self {
        Self {
            threshold: 0.75,
            edge_scale: 0.707,
            alpha_cutoff: 0.0,
            _pad: 0.0,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

impl SdfUniform {
    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }
}

// ===================================================================
// Tests
// ===================================================================
