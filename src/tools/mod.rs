use serde::{Deserialize, Serialize};

use crate::canvas::Pixel;
use crate::config::PaintConfig;
use crate::fill::FillOptions;
use crate::stroke::{Pen, PenShape};

/// The tools available in the toolbar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToolKind {
    #[default]
    Brush,
    Eraser,
    Bucket,
}

impl ToolKind {
    pub const ALL: [ToolKind; 3] = [ToolKind::Brush, ToolKind::Eraser, ToolKind::Bucket];

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Brush => "Brush",
            ToolKind::Eraser => "Eraser",
            ToolKind::Bucket => "Bucket",
        }
    }

    /// Whether the tool draws strokes with a sized pen
    pub fn uses_pen(self) -> bool {
        matches!(self, ToolKind::Brush | ToolKind::Eraser)
    }
}

/// Current tool, color and per-tool options.
///
/// Persisted between runs through eframe storage; the size limits come from
/// [`PaintConfig`] and are re-applied after loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    tool: ToolKind,
    pub color: Pixel,
    brush_size: u32,
    eraser_size: u32,
    pub pen_shape: PenShape,
    pub fill: FillOptions,
    #[serde(skip)]
    min_size: u32,
    #[serde(skip)]
    max_size: u32,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self::from_config(&PaintConfig::default())
    }
}

impl ToolSettings {
    pub fn from_config(config: &PaintConfig) -> Self {
        Self {
            tool: ToolKind::Brush,
            color: Pixel::BLACK,
            brush_size: config.default_pen_size,
            eraser_size: config.default_pen_size,
            pen_shape: PenShape::Round,
            fill: FillOptions::default(),
            min_size: config.min_pen_size,
            max_size: config.max_pen_size,
        }
        .clamped()
    }

    /// Re-apply pen size limits, e.g. after restoring persisted settings
    pub fn with_limits(mut self, config: &PaintConfig) -> Self {
        self.min_size = config.min_pen_size;
        self.max_size = config.max_pen_size;
        self.clamped()
    }

    fn clamped(mut self) -> Self {
        self.brush_size = self.clamp_size(self.brush_size);
        self.eraser_size = self.clamp_size(self.eraser_size);
        self
    }

    fn clamp_size(&self, size: u32) -> u32 {
        size.clamp(self.min_size.max(1), self.max_size.max(self.min_size.max(1)))
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        if tool != self.tool {
            log::info!("Tool changed: {} -> {}", self.tool.name(), tool.name());
            self.tool = tool;
        }
    }

    pub fn size_limits(&self) -> (u32, u32) {
        (self.min_size, self.max_size)
    }

    /// Size of the active tool's pen; the bucket has no pen and reports 1
    pub fn current_pen_size(&self) -> u32 {
        match self.tool {
            ToolKind::Brush => self.brush_size,
            ToolKind::Eraser => self.eraser_size,
            ToolKind::Bucket => 1,
        }
    }

    /// Set the active pen size within the configured limits. Returns true if it changed.
    pub fn set_pen_size(&mut self, size: u32) -> bool {
        let size = self.clamp_size(size);
        let slot = match self.tool {
            ToolKind::Brush => &mut self.brush_size,
            ToolKind::Eraser => &mut self.eraser_size,
            ToolKind::Bucket => return false,
        };
        if *slot == size {
            return false;
        }
        *slot = size;
        true
    }

    pub fn adjust_pen_size(&mut self, delta: i32) -> bool {
        let target = (self.current_pen_size() as i64 + delta as i64).max(0) as u32;
        self.set_pen_size(target)
    }

    /// The pen for the active tool, if it draws strokes
    pub fn pen(&self) -> Option<Pen> {
        match self.tool {
            ToolKind::Brush => Some(Pen::brush(self.color, self.brush_size, self.pen_shape)),
            ToolKind::Eraser => Some(Pen::eraser(self.eraser_size, self.pen_shape)),
            ToolKind::Bucket => None,
        }
    }
}
