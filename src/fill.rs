use serde::{Deserialize, Serialize};

use crate::canvas::{CanvasBuffer, Pixel};
use crate::error::CanvasResult;

/// Which neighbours count as connected when growing a fill region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Connectivity {
    /// Left, right, up, down
    #[default]
    Four,
    /// Also the diagonals
    Eight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FillOptions {
    /// Maximum per-channel difference from the seed color. 0 matches exactly.
    pub tolerance: u8,
    pub connectivity: Connectivity,
}

impl FillOptions {
    pub fn exact() -> Self {
        Self::default()
    }

    pub fn with_tolerance(tolerance: u8) -> Self {
        Self {
            tolerance,
            ..Self::default()
        }
    }
}

/// Per-fill working state: the visited mask and the pending spans.
struct FillContext<'a> {
    buffer: &'a mut CanvasBuffer,
    visited: Vec<bool>,
    target: Pixel,
    tolerance: u8,
    width: i32,
}

impl FillContext<'_> {
    #[inline]
    fn is_fillable(&self, x: i32, y: i32) -> bool {
        let idx = y as usize * self.width as usize + x as usize;
        !self.visited[idx]
            && self
                .buffer
                .pixel_at(x as u32, y as u32)
                .max_channel_distance(self.target)
                <= self.tolerance
    }

    /// Push one seed for every run of fillable pixels in `lo..=hi` on row `y`.
    fn scan_line(&self, lo: i32, hi: i32, y: i32, stack: &mut Vec<(i32, i32)>) {
        let mut in_run = false;
        for x in lo..=hi {
            if self.is_fillable(x, y) {
                if !in_run {
                    stack.push((x, y));
                    in_run = true;
                }
            } else {
                in_run = false;
            }
        }
    }
}

/// Recolors the region connected to the seed whose colors lie within the
/// tolerance of the seed's original color.
///
/// Returns the number of pixels whose value changed. When the seed already
/// matches `color` within the tolerance nothing is written and 0 is returned.
pub fn flood_fill(
    buffer: &mut CanvasBuffer,
    seed_x: i32,
    seed_y: i32,
    color: Pixel,
    options: FillOptions,
) -> CanvasResult<usize> {
    let target = buffer.get(seed_x, seed_y)?;
    if target.max_channel_distance(color) <= options.tolerance {
        return Ok(0);
    }

    let width = buffer.width() as i32;
    let height = buffer.height() as i32;
    let mut ctx = FillContext {
        visited: vec![false; width as usize * height as usize],
        buffer,
        target,
        tolerance: options.tolerance,
        width,
    };

    let mut changed = 0usize;
    let mut stack: Vec<(i32, i32)> = Vec::with_capacity(1024);
    stack.push((seed_x, seed_y));

    while let Some((px, py)) = stack.pop() {
        if !ctx.is_fillable(px, py) {
            continue;
        }

        let mut x1 = px;
        while x1 > 0 && ctx.is_fillable(x1 - 1, py) {
            x1 -= 1;
        }
        let mut x2 = px;
        while x2 < width - 1 && ctx.is_fillable(x2 + 1, py) {
            x2 += 1;
        }

        let row = py as usize * width as usize;
        for x in x1..=x2 {
            ctx.visited[row + x as usize] = true;
            if ctx.buffer.put(x as u32, py as u32, color) {
                changed += 1;
            }
        }

        let (lo, hi) = match options.connectivity {
            Connectivity::Four => (x1, x2),
            Connectivity::Eight => ((x1 - 1).max(0), (x2 + 1).min(width - 1)),
        };
        if py > 0 {
            ctx.scan_line(lo, hi, py - 1, &mut stack);
        }
        if py < height - 1 {
            ctx.scan_line(lo, hi, py + 1, &mut stack);
        }
    }

    log::debug!(
        "Flood fill at ({}, {}) changed {} pixels",
        seed_x,
        seed_y,
        changed
    );
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_line_pushes_one_seed_per_run() {
        let mut buffer = CanvasBuffer::new(6, 2).unwrap();
        // Row 1: fillable, wall, fillable, fillable, wall, fillable
        buffer.set(1, 1, Pixel::BLACK).unwrap();
        buffer.set(4, 1, Pixel::BLACK).unwrap();
        let ctx = FillContext {
            visited: vec![false; 12],
            buffer: &mut buffer,
            target: Pixel::TRANSPARENT,
            tolerance: 0,
            width: 6,
        };
        let mut stack = Vec::new();
        ctx.scan_line(0, 5, 1, &mut stack);
        assert_eq!(stack, vec![(0, 1), (2, 1), (5, 1)]);
    }
}
