//! Text → GPU bridge: converts a compiled [`TextRun`] and an optional
//! caret into a flat `GlyphVertex` triangle list.

use glyphgrid_text::{CaretQuad, TextRun};

use crate::vertex::GlyphVertex;

/// Pack `run` (and `caret`, drawn last) into vertices.
///
/// Each glyph is raised by `baseline_shift * font_size` so glyph tops line
/// up with their rasterized offsets. Unmapped glyphs are kept; their zero
/// UVs sample an empty texel and draw nothing.
pub fn build_vertices(run: &TextRun, caret: Option<&CaretQuad>) -> Vec<GlyphVertex> {
    let caret_len = caret.map_or(0, |c| c.positions.len());
    let mut vertices = Vec::with_capacity(run.vertex_count() + caret_len);

    let scale = run.alignment.scale;
    for quad in &run.quads {
        let lift = quad.baseline_shift * scale;
        vertices.extend(
            quad.positions
                .iter()
                .zip(quad.uvs.iter())
                .map(|(&[x, y], &uv)| GlyphVertex::glyph([x, y + lift], uv)),
        );
    }

    if let Some(caret) = caret {
        vertices.extend(caret.positions.iter().map(|&p| GlyphVertex::solid(p)));
    }

    vertices
}

// ===================================================================
// Tests
// ===================================================================
