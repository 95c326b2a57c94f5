use egui::{Pos2, Rect, Vec2};

use crate::config::PaintConfig;

/// Zoom and pan of the canvas inside the viewport.
///
/// Viewport positions are relative to the top-left corner of the canvas area;
/// canvas positions are in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    zoom: f32,
    /// Viewport position of the canvas origin
    pan: Vec2,
    min_zoom: f32,
    max_zoom: f32,
    zoom_step: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::new(&PaintConfig::default())
    }
}

impl ViewTransform {
    pub fn new(config: &PaintConfig) -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            zoom_step: config.zoom_step,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn pan(&self) -> Vec2 {
        self.pan
    }

    pub fn screen_to_canvas(&self, pos: Pos2) -> Pos2 {
        ((pos - self.pan).to_vec2() / self.zoom).to_pos2()
    }

    pub fn canvas_to_screen(&self, pos: Pos2) -> Pos2 {
        (pos.to_vec2() * self.zoom + self.pan).to_pos2()
    }

    /// Viewport rectangle covered by a canvas of the given size
    pub fn canvas_rect(&self, width: u32, height: u32) -> Rect {
        Rect::from_min_size(
            self.pan.to_pos2(),
            Vec2::new(width as f32, height as f32) * self.zoom,
        )
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Scale by `factor` keeping the canvas point under `anchor` fixed.
    /// Returns false when the clamped zoom did not change.
    pub fn zoom_at(&mut self, anchor: Pos2, factor: f32) -> bool {
        if !(factor > 0.0) {
            return false;
        }
        let new_zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < 0.001 {
            return false;
        }
        let fixed = self.screen_to_canvas(anchor);
        self.zoom = new_zoom;
        self.pan = anchor.to_vec2() - fixed.to_vec2() * new_zoom;
        true
    }

    pub fn zoom_in(&mut self, anchor: Pos2) -> bool {
        self.zoom_at(anchor, 1.0 + self.zoom_step)
    }

    pub fn zoom_out(&mut self, anchor: Pos2) -> bool {
        self.zoom_at(anchor, 1.0 / (1.0 + self.zoom_step))
    }

    /// Back to 100%, keeping the point under `anchor` fixed
    pub fn reset_zoom(&mut self, anchor: Pos2) -> bool {
        self.zoom_at(anchor, 1.0 / self.zoom)
    }

    /// Actual size with the canvas centred in a viewport of `viewport` size
    pub fn center(&mut self, viewport: Vec2, width: u32, height: u32) {
        self.zoom = 1.0;
        let canvas = Vec2::new(width as f32, height as f32);
        self.pan = ((viewport - canvas) * 0.5).max(Vec2::ZERO).floor();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_round_trip() {
        let mut view = ViewTransform::default();
        view.pan_by(Vec2::new(30.0, -12.0));
        view.zoom_at(Pos2::new(100.0, 100.0), 2.0);
        let p = Pos2::new(17.25, 3.5);
        let back = view.screen_to_canvas(view.canvas_to_screen(p));
        assert!((back - p).length() < 1e-4);
    }

    #[test]
    fn test_zoom_keeps_anchor_fixed() {
        let mut view = ViewTransform::default();
        let anchor = Pos2::new(200.0, 150.0);
        let before = view.screen_to_canvas(anchor);
        assert!(view.zoom_in(anchor));
        let after = view.screen_to_canvas(anchor);
        assert!((before - after).length() < 1e-3);
        assert!((view.zoom() - 1.15).abs() < 1e-5);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut view = ViewTransform::default();
        for _ in 0..100 {
            view.zoom_in(Pos2::ZERO);
        }
        assert_eq!(view.zoom(), 16.0);
        assert!(!view.zoom_in(Pos2::ZERO));
        for _ in 0..100 {
            view.zoom_out(Pos2::ZERO);
        }
        assert!((view.zoom() - 0.1).abs() < 1e-6);
        assert!(view.reset_zoom(Pos2::ZERO));
        assert!((view.zoom() - 1.0).abs() < 1e-6);
    }
}
