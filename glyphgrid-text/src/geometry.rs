//! Text geometry: turns a string into one textured quad per character.
//!
//! Layout is a fixed monospaced grid: character `i` occupies the unit
//! square `[i, i + 1] × [0, 1]`, the whole run is shifted by the
//! [`Alignment`] so it is centered on the origin, then scaled by the font
//! size. Y grows upward.
//!
//! Each quad is two triangles with the corner order
//!
//! ```text
//! right-top, left-top, left-bottom,  left-bottom, right-bottom, right-top
//! ```
//!
//! UVs cover the glyph's full grid cell, normalized by the atlas size and
//! flipped vertically (`v = 1 - y / atlas_size`), so the atlas must be
//! sampled with a bottom-left origin. Characters without an atlas entry
//! keep their quad but get all-zero UVs.

use crate::error::GeometryError;
use crate::layout::{AtlasLayout, AtlasLayoutEntry, GlyphMapping};

/// Vertices per glyph quad (two triangles).
pub const VERTICES_PER_QUAD: usize = 6;

/// Corner order shared by positions and UVs, as `(right, top)` flags.
const CORNERS: [(bool, bool); VERTICES_PER_QUAD] = [
    (true, true),
    (false, true),
    (false, false),
    (false, false),
    (true, false),
    (true, true),
];

/// Centering offsets plus the font-size scale of a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Alignment {
    /// `-len / 2`, in glyph cells.
    pub x: f32,
    /// `-0.5`, in glyph cells.
    pub y: f32,
    /// Font size: model units per glyph cell.
    pub scale: f32,
}

impl Alignment {
    pub fn new(char_count: usize, font_size: f32) -> Self {
        Self {
            x: -(char_count as f32) / 2.0,
            y: -0.5,
            scale: font_size,
        }
    }
}

/// One character's quad.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphQuad {
    pub ch: char,
    /// Model-space corners, already scaled by the font size.
    pub positions: [[f32; 2]; VERTICES_PER_QUAD],
    pub uvs: [[f32; 2]; VERTICES_PER_QUAD],
    /// False when the character had no atlas entry.
    pub mapped: bool,
    /// Glyph top offset in cell units (`top_offset / grid_size`). Not
    /// applied to `positions`.
    pub baseline_shift: f32,
}

/// Compiled geometry for a whole string.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    pub quads: Vec<GlyphQuad>,
    pub alignment: Alignment,
}

impl TextRun {
    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.quads.len() * VERTICES_PER_QUAD
    }

    /// All vertex positions, quad after quad.
    pub fn positions(&self) -> Vec<[f32; 2]> {
        self.quads.iter().flat_map(|q| q.positions).collect()
    }

    /// All UVs, in the same order as [`TextRun::positions`].
    pub fn uvs(&self) -> Vec<[f32; 2]> {
        self.quads.iter().flat_map(|q| q.uvs).collect()
    }

    pub fn unmapped_count(&self) -> usize {
        self.quads.iter().filter(|q| !q.mapped).count()
    }
}

fn check_font_size(font_size: f32) -> Result<(), GeometryError> {
    if font_size.is_finite() && font_size > 0.0 {
        Ok(())
    } else {
        Err(GeometryError::InvalidFontSize(font_size))
    }
}

fn quad_positions(alignment: &Alignment, index: usize) -> [[f32; 2]; VERTICES_PER_QUAD] {
    let left = alignment.x + index as f32;
    let bottom = alignment.y;
    CORNERS.map(|(right, top)| {
        let x = if right { left + 1.0 } else { left };
        let y = if top { bottom + 1.0 } else { bottom };
        [x * alignment.scale, y * alignment.scale]
    })
}

fn cell_uvs(entry: &AtlasLayoutEntry, atlas_size: u32, grid_size: u32) -> [[f32; 2]; VERTICES_PER_QUAD] {
    let ds = 1.0 / atlas_size as f32;
    let u0 = ds * entry.x as f32;
    let u1 = ds * (entry.x + grid_size) as f32;
    let v_top = 1.0 - ds * entry.y as f32;
    let v_bottom = 1.0 - ds * (entry.y + grid_size) as f32;
    CORNERS.map(|(right, top)| {
        [
            if right { u1 } else { u0 },
            if top { v_top } else { v_bottom },
        ]
    })
}

/// Compile `text` into one quad per character.
///
/// Output depends only on the arguments. An empty string yields an empty
/// run.
pub fn compile(text: &str, font_size: f32, layout: &AtlasLayout) -> Result<TextRun, GeometryError> {
    check_font_size(font_size)?;

    let alignment = Alignment::new(text.chars().count(), font_size);
    let grid_size = layout.grid_size();

    let quads = text
        .chars()
        .enumerate()
        .map(|(index, ch)| {
            let positions = quad_positions(&alignment, index);
            match layout.resolve(ch) {
                GlyphMapping::Mapped(entry) => GlyphQuad {
                    ch,
                    positions,
                    uvs: cell_uvs(entry, layout.atlas_size(), grid_size),
                    mapped: true,
                    baseline_shift: entry.top_offset as f32 / grid_size as f32,
                },
                GlyphMapping::Unmapped => GlyphQuad {
                    ch,
                    positions,
                    uvs: [[0.0; 2]; VERTICES_PER_QUAD],
                    mapped: false,
                    baseline_shift: 0.0,
                },
            }
        })
        .collect();

    Ok(TextRun { quads, alignment })
}

/// A thin caret quad in the same model space as [`compile`]'s output.
#[derive(Clone, Debug, PartialEq)]
pub struct CaretQuad {
    pub positions: [[f32; 2]; VERTICES_PER_QUAD],
}

impl CaretQuad {
    /// Horizontal center of the caret.
    pub fn center_x(&self) -> f32 {
        (self.positions[0][0] + self.positions[1][0]) / 2.0
    }
}

/// Caret before character `cursor` of a `char_count`-character run.
///
/// Centered at `(alignment.x + cursor) * font_size`, `width` model units
/// wide and `font_size` tall around the run's vertical center.
pub fn caret_quad(
    char_count: usize,
    cursor: usize,
    font_size: f32,
    width: f32,
) -> Result<CaretQuad, GeometryError> {
    check_font_size(font_size)?;
    if !(width.is_finite() && width >= 0.0) {
        return Err(GeometryError::InvalidCaretWidth(width));
    }

    let alignment = Alignment::new(char_count, font_size);
    let center = (alignment.x + cursor.min(char_count) as f32) * font_size;
    let half_w = width / 2.0;
    let half_h = font_size / 2.0;
    let positions = CORNERS.map(|(right, top)| {
        [
            if right { center + half_w } else { center - half_w },
            if top { half_h } else { -half_h },
        ]
    });
    Ok(CaretQuad { positions })
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn layout_with(entries: &[(char, u32, u32)], atlas: u32, grid: u32) -> AtlasLayout {
        let mut layout = AtlasLayout::new(atlas, grid);
        for &(ch, x, y) in entries {
            layout.insert(
                ch,
                AtlasLayoutEntry {
                    x,
                    y,
                    width: grid,
                    height: grid,
                    top_offset: 0,
                },
            );
        }
        layout
    }

    #[test]
    fn test_empty_text() {
        let layout = layout_with(&[], 4, 2);
        let run = compile("", 10.0, &layout).unwrap();
        assert!(run.is_empty());
        assert_eq!(run.vertex_count(), 0);
        assert_eq!(run.alignment.x, 0.0);
    }

    #[test]
    fn test_hi_vertex_count_and_first_quad() {
        let layout = layout_with(&[('H', 0, 0), ('i', 2, 0)], 4, 2);
        let run = compile("Hi", 10.0, &layout).unwrap();
        assert_eq!(run.vertex_count(), 12);
        assert_eq!(run.positions().len(), 12);
        let first = &run.quads[0];
        let rightmost = first.positions.iter().map(|p| p[0]).fold(f32::MIN, f32::max);
        assert_eq!(rightmost, 0.0);
        let leftmost = first.positions.iter().map(|p| p[0]).fold(f32::MAX, f32::min);
        assert_eq!(leftmost, -10.0);
    }

    #[test]
    fn test_corner_order() {
        let layout = layout_with(&[('a', 0, 0)], 4, 2);
        let run = compile("a", 2.0, &layout).unwrap();
        // alignment (-0.5, -0.5), scale 2
        assert_eq!(
            run.quads[0].positions,
            [
                [1.0, 1.0],
                [-1.0, 1.0],
                [-1.0, -1.0],
                [-1.0, -1.0],
                [1.0, -1.0],
                [1.0, 1.0],
            ]
        );
    }

    #[test]
    fn test_uvs_cover_flipped_cell() {
        let layout = layout_with(&[('b', 2, 0)], 4, 2);
        let run = compile("b", 1.0, &layout).unwrap();
        assert_eq!(
            run.quads[0].uvs,
            [
                [1.0, 1.0],
                [0.5, 1.0],
                [0.5, 0.5],
                [0.5, 0.5],
                [1.0, 0.5],
                [1.0, 1.0],
            ]
        );
    }

    #[test]
    fn test_unmapped_glyph_zero_uvs_same_positions() {
        let layout = layout_with(&[('x', 0, 0)], 4, 2);
        let mapped = compile("xx", 8.0, &layout).unwrap();
        let unmapped = compile("x?", 8.0, &layout).unwrap();
        let quad = &unmapped.quads[1];
        assert!(!quad.mapped);
        assert!(quad.uvs.iter().all(|uv| *uv == [0.0, 0.0]));
        assert_eq!(quad.positions, mapped.quads[1].positions);
        assert_eq!(unmapped.unmapped_count(), 1);
    }

    #[test]
    fn test_length_matches_chars_not_bytes() {
        let layout = layout_with(&[], 4, 2);
        let run = compile("héllo→", 4.0, &layout).unwrap();
        assert_eq!(run.len(), 6);
        assert_eq!(run.alignment.x, -3.0);
        let chars: String = run.quads.iter().map(|q| q.ch).collect();
        assert_eq!(chars, "héllo→");
    }

    #[test]
    fn test_compile_is_deterministic() {
        let layout = layout_with(&[('a', 0, 0), ('b', 2, 0), ('c', 0, 2)], 4, 2);
        let first = compile("abcabz", 13.5, &layout).unwrap();
        let second = compile("abcabz", 13.5, &layout).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.uvs(), second.uvs());
    }

    #[test]
    fn test_baseline_shift() {
        let mut layout = AtlasLayout::new(128, 64);
        layout.insert(
            'A',
            AtlasLayoutEntry {
                x: 0,
                y: 0,
                width: 40,
                height: 50,
                top_offset: 48,
            },
        );
        let run = compile("A", 1.0, &layout).unwrap();
        assert_eq!(run.quads[0].baseline_shift, 0.75);
    }

    #[test]
    fn test_invalid_font_size() {
        let layout = layout_with(&[], 4, 2);
        assert_eq!(compile("a", 0.0, &layout), Err(GeometryError::InvalidFontSize(0.0)));
        assert!(compile("a", -1.0, &layout).is_err());
        assert!(compile("a", f32::INFINITY, &layout).is_err());
    }

    #[test]
    fn test_caret_positions() {
        // 5 chars, cursor 0 → x = -2.5 * 10
        let caret = caret_quad(5, 0, 10.0, 0.5).unwrap();
        assert_eq!(caret.center_x(), -25.0);
        let caret = caret_quad(5, 5, 10.0, 0.5).unwrap();
        assert_eq!(caret.center_x(), 25.0);
        let ys: Vec<f32> = caret.positions.iter().map(|p| p[1]).collect();
        assert!(ys.iter().all(|y| *y == 5.0 || *y == -5.0));
    }

    #[test]
    fn test_caret_matches_glyph_edges() {
        let layout = layout_with(&[], 4, 2);
        let run = compile("abc", 12.0, &layout).unwrap();
        let caret = caret_quad(3, 1, 12.0, 0.0).unwrap();
        // Caret before 'b' sits on b's left edge.
        assert_eq!(caret.center_x(), run.quads[1].positions[1][0]);
    }

    #[test]
    fn test_caret_clamps_cursor_and_validates() {
        let caret = caret_quad(2, 9, 4.0, 1.0).unwrap();
        assert_eq!(caret.center_x(), 4.0);
        assert!(caret_quad(2, 0, 0.0, 1.0).is_err());
        assert_eq!(
            caret_quad(2, 0, 4.0, -1.0),
            Err(GeometryError::InvalidCaretWidth(-1.0))
        );
    }
}
