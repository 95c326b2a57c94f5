use egui::Pos2;
use serde::{Deserialize, Serialize};

use crate::canvas::{CanvasBuffer, Pixel};

/// Distance between consecutive stamps along a segment, in canvas pixels
const STAMP_SPACING: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PenShape {
    #[default]
    Round,
    Square,
}

/// What a pen writes into the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PenMode {
    Paint(Pixel),
    Erase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pen {
    size: u32,
    shape: PenShape,
    mode: PenMode,
}

impl Pen {
    pub fn brush(color: Pixel, size: u32, shape: PenShape) -> Self {
        Self {
            size: size.max(1),
            shape,
            mode: PenMode::Paint(color),
        }
    }

    pub fn eraser(size: u32, shape: PenShape) -> Self {
        Self {
            size: size.max(1),
            shape,
            mode: PenMode::Erase,
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn shape(&self) -> PenShape {
        self.shape
    }

    pub fn mode(&self) -> PenMode {
        self.mode
    }

    pub fn radius(&self) -> f32 {
        self.size as f32 / 2.0
    }

    /// The pixel value this pen writes
    pub fn ink(&self) -> Pixel {
        match self.mode {
            PenMode::Paint(color) => color,
            PenMode::Erase => Pixel::TRANSPARENT,
        }
    }

    fn covers(&self, dx: f32, dy: f32) -> bool {
        let r = self.radius();
        match self.shape {
            PenShape::Round => dx * dx + dy * dy <= r * r,
            PenShape::Square => dx.abs() <= r && dy.abs() <= r,
        }
    }
}

/// Stamp one pen footprint centred on `center`. Coverage outside the canvas
/// is clipped. Returns the number of pixels that changed.
pub fn stamp(buffer: &mut CanvasBuffer, center: Pos2, pen: &Pen) -> usize {
    if !center.x.is_finite() || !center.y.is_finite() {
        return 0;
    }
    let r = pen.radius();
    let ink = pen.ink();
    let max_x = buffer.width() as f32 - 1.0;
    let max_y = buffer.height() as f32 - 1.0;

    let x0 = (center.x - r).floor().max(0.0);
    let x1 = (center.x + r).floor().min(max_x);
    let y0 = (center.y - r).floor().max(0.0);
    let y1 = (center.y + r).floor().min(max_y);
    if x0 > x1 || y0 > y1 {
        return 0;
    }

    // The pixel under the pointer is always painted, even for tiny pens
    let home = (center.x.floor(), center.y.floor());

    let mut changed = 0;
    for py in y0 as u32..=y1 as u32 {
        for px in x0 as u32..=x1 as u32 {
            let dx = px as f32 + 0.5 - center.x;
            let dy = py as f32 + 0.5 - center.y;
            let is_home = px as f32 == home.0 && py as f32 == home.1;
            if (is_home || pen.covers(dx, dy)) && buffer.put(px, py, ink) {
                changed += 1;
            }
        }
    }
    changed
}

/// Stamp along `from..=to` at sub-pixel spacing, leaving out `from` itself
fn stamp_after(buffer: &mut CanvasBuffer, from: Pos2, to: Pos2, pen: &Pen) -> usize {
    let distance = from.distance(to);
    let steps = (distance / STAMP_SPACING).ceil().max(1.0) as u32;
    let mut changed = 0;
    for i in 1..=steps {
        changed += stamp(buffer, from.lerp(to, i as f32 / steps as f32), pen);
    }
    changed
}

/// A stroke being drawn: rendered incrementally as the pointer moves
#[derive(Debug, Clone)]
pub struct ActiveStroke {
    pen: Pen,
    points: Vec<Pos2>,
    changed: usize,
}

impl ActiveStroke {
    /// Start a stroke, stamping the first point immediately
    pub fn begin(buffer: &mut CanvasBuffer, start: Pos2, pen: Pen) -> Self {
        let changed = stamp(buffer, start, &pen);
        Self {
            pen,
            points: vec![start],
            changed,
        }
    }

    /// Extend the stroke to a new pointer position, filling the gap
    pub fn extend_to(&mut self, buffer: &mut CanvasBuffer, point: Pos2) -> usize {
        let Some(&last) = self.points.last() else {
            return 0;
        };
        if last == point {
            return 0;
        }
        let changed = stamp_after(buffer, last, point, &self.pen);
        self.points.push(point);
        self.changed += changed;
        changed
    }

    pub fn pen(&self) -> &Pen {
        &self.pen
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    /// Total pixels changed by this stroke so far
    pub fn changed(&self) -> usize {
        self.changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_ink(buffer: &CanvasBuffer, ink: Pixel) -> usize {
        buffer.pixels().iter().filter(|p| **p == ink).count()
    }

    #[test]
    fn test_single_pixel_pen_paints_pixel_under_point() {
        let mut buffer = CanvasBuffer::new(10, 10).unwrap();
        let pen = Pen::brush(Pixel::BLACK, 1, PenShape::Round);
        assert_eq!(stamp(&mut buffer, Pos2::new(5.0, 5.0), &pen), 1);
        assert_eq!(buffer.get(5, 5).unwrap(), Pixel::BLACK);
    }

    #[test]
    fn test_square_pen_covers_full_block() {
        let mut buffer = CanvasBuffer::new(10, 10).unwrap();
        let pen = Pen::brush(Pixel::BLACK, 3, PenShape::Square);
        stamp(&mut buffer, Pos2::new(5.5, 5.5), &pen);
        assert_eq!(count_ink(&buffer, Pixel::BLACK), 9);
        for y in 4..=6 {
            for x in 4..=6 {
                assert_eq!(buffer.get(x, y).unwrap(), Pixel::BLACK);
            }
        }
    }

    #[test]
    fn test_round_pen_is_smaller_than_square() {
        let mut round = CanvasBuffer::new(20, 20).unwrap();
        let mut square = CanvasBuffer::new(20, 20).unwrap();
        stamp(&mut round, Pos2::new(10.0, 10.0), &Pen::brush(Pixel::BLACK, 8, PenShape::Round));
        stamp(&mut square, Pos2::new(10.0, 10.0), &Pen::brush(Pixel::BLACK, 8, PenShape::Square));
        assert!(count_ink(&round, Pixel::BLACK) < count_ink(&square, Pixel::BLACK));
        assert!(count_ink(&round, Pixel::BLACK) > 40);
    }

    #[test]
    fn test_fast_segment_leaves_no_gaps() {
        let mut buffer = CanvasBuffer::new(50, 5).unwrap();
        let pen = Pen::brush(Pixel::BLACK, 1, PenShape::Round);
        let mut stroke = ActiveStroke::begin(&mut buffer, Pos2::new(0.5, 2.5), pen);
        stroke.extend_to(&mut buffer, Pos2::new(49.5, 2.5));
        for x in 0..50 {
            assert_eq!(buffer.get(x, 2).unwrap(), Pixel::BLACK, "gap at x={x}");
        }
        assert_eq!(stroke.changed(), 50);
    }

    #[test]
    fn test_polyline_corners_are_continuous() {
        let mut buffer = CanvasBuffer::new(12, 12).unwrap();
        let pen = Pen::brush(Pixel::BLACK, 1, PenShape::Square);
        let corners = [Pos2::new(1.5, 1.5), Pos2::new(10.5, 1.5), Pos2::new(10.5, 10.5), Pos2::new(1.5, 10.5)];
        let mut stroke = ActiveStroke::begin(&mut buffer, corners[0], pen);
        for &corner in &corners[1..] {
            stroke.extend_to(&mut buffer, corner);
        }

        for i in 1..=10 {
            assert_eq!(buffer.get(i, 1).unwrap(), Pixel::BLACK, "top edge x={i}");
            assert_eq!(buffer.get(10, i).unwrap(), Pixel::BLACK, "right edge y={i}");
            assert_eq!(buffer.get(i, 10).unwrap(), Pixel::BLACK, "bottom edge x={i}");
        }
        // Shared corner pixels are counted once
        assert_eq!(stroke.changed(), 28);
        assert_eq!(count_ink(&buffer, Pixel::BLACK), 28);
        assert_eq!(buffer.get(5, 5).unwrap(), Pixel::TRANSPARENT);
    }

    #[test]
    fn test_stamp_outside_canvas_is_clipped() {
        let mut buffer = CanvasBuffer::new(4, 4).unwrap();
        let pen = Pen::brush(Pixel::BLACK, 4, PenShape::Square);
        assert_eq!(stamp(&mut buffer, Pos2::new(-50.0, -50.0), &pen), 0);
        // Overlapping the corner paints only what is inside
        let changed = stamp(&mut buffer, Pos2::new(0.0, 0.0), &pen);
        assert_eq!(changed, 4);
    }

    #[test]
    fn test_active_stroke_accumulates_points() {
        let mut buffer = CanvasBuffer::new(10, 10).unwrap();
        let pen = Pen::brush(Pixel::WHITE, 1, PenShape::Round);
        let mut stroke = ActiveStroke::begin(&mut buffer, Pos2::new(1.5, 1.5), pen);
        stroke.extend_to(&mut buffer, Pos2::new(5.5, 1.5));
        stroke.extend_to(&mut buffer, Pos2::new(5.5, 1.5));
        assert_eq!(stroke.points().len(), 2);
        assert_eq!(stroke.changed(), 5);
    }
}
