//! 2D pan/zoom state for the text view.
//!
//! Zoom deltas accumulate into a raw scale; the scale actually used for
//! drawing is `max(0, scale)`, so the view collapses rather than mirrors
//! when zoomed past zero. Pan deltas arrive in screen pixels and are
//! divided by the effective scale before being added to the camera
//! position, which keeps on-screen drag speed constant at every zoom.

use crate::vertex::CameraUniform;

/// A discrete viewport input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewportEvent {
    /// Add `delta` to the raw scale.
    Zoom(f32),
    /// Screen-space drag: `dx` right, `dy` down, in pixels.
    Pan { dx: f32, dy: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    scale: f32,
    /// Camera position in model units.
    translate: [f32; 2],
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translate: [0.0, 0.0],
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scale used for drawing, never negative.
    pub fn scale(&self) -> f32 {
        self.scale.max(0.0)
    }

    /// Accumulated scale, possibly negative.
    pub fn raw_scale(&self) -> f32 {
        self.scale
    }

    pub fn translate(&self) -> [f32; 2] {
        self.translate
    }

    pub fn apply(&mut self, event: ViewportEvent) {
        match event {
            ViewportEvent::Zoom(delta) => {
                if delta.is_finite() {
                    self.scale += delta;
                }
            }
            ViewportEvent::Pan { dx, dy } => {
                let scale = self.scale();
                // Nothing is visible at zero scale and the division is undefined.
                if scale <= 0.0 || !dx.is_finite() || !dy.is_finite() {
                    return;
                }
                self.translate[0] -= dx / scale;
                self.translate[1] += dy / scale;
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Projection for a `width × height` pixel target.
    pub fn camera(&self, width: f32, height: f32) -> CameraUniform {
        CameraUniform::orthographic(width, height, self.translate, self.scale())
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_viewport() {
        let vp = Viewport::new();
        assert_eq!(vp.scale(), 1.0);
        assert_eq!(vp.translate(), [0.0, 0.0]);
    }

    #[test]
    fn test_zoom_accumulates() {
        let mut vp = Viewport::new();
        vp.apply(ViewportEvent::Zoom(0.5));
        vp.apply(ViewportEvent::Zoom(0.25));
        assert_eq!(vp.scale(), 1.75);
    }

    #[test]
    fn test_scale_clamped_at_zero() {
        let mut vp = Viewport::new();
        vp.apply(ViewportEvent::Zoom(-3.0));
        assert_eq!(vp.raw_scale(), -2.0);
        assert_eq!(vp.scale(), 0.0);
        // Zooming back in has to climb out of the negative range first.
        vp.apply(ViewportEvent::Zoom(2.5));
        assert_eq!(vp.scale(), 0.5);
    }

    #[test]
    fn test_pan_divides_by_scale() {
        let mut vp = Viewport::new();
        vp.apply(ViewportEvent::Zoom(1.0));
        vp.apply(ViewportEvent::Pan { dx: 10.0, dy: 4.0 });
        assert_eq!(vp.translate(), [-5.0, 2.0]);
    }

    #[test]
    fn test_pan_ignored_at_zero_scale() {
        let mut vp = Viewport::new();
        vp.apply(ViewportEvent::Zoom(-1.0));
        vp.apply(ViewportEvent::Pan { dx: 10.0, dy: 10.0 });
        assert_eq!(vp.translate(), [0.0, 0.0]);
    }

    #[test]
    fn test_non_finite_input_ignored() {
        let mut vp = Viewport::new();
        vp.apply(ViewportEvent::Zoom(f32::NAN));
        vp.apply(ViewportEvent::Pan { dx: f32::INFINITY, dy: 0.0 });
        assert_eq!(vp, Viewport::new());
    }

    #[test]
    fn test_drag_keeps_point_under_cursor() {
        let mut vp = Viewport::new();
        vp.apply(ViewportEvent::Zoom(3.0));
        let before = vp.camera(800.0, 600.0).project([0.0, 0.0]);
        vp.apply(ViewportEvent::Pan { dx: 40.0, dy: -30.0 });
        let after = vp.camera(800.0, 600.0).project([0.0, 0.0]);
        // 40px right and 30px up, in NDC.
        assert!((after[0] - before[0] - 40.0 / 400.0).abs() < 1e-5);
        assert!((after[1] - before[1] - 30.0 / 300.0).abs() < 1e-5);
    }

    #[test]
    fn test_reset() {
        let mut vp = Viewport::new();
        vp.apply(ViewportEvent::Zoom(2.0));
        vp.apply(ViewportEvent::Pan { dx: 1.0, dy: 1.0 });
        vp.reset();
        assert_eq!(vp, Viewport::new());
    }
}
