//! The editor session: owns the canvas, its history, the tool settings and
//! the view, and turns [`InputEvent`]s into edits.
//!
//! # Gestures
//!
//! ```text
//!             draw down              draw up
//!   ┌──────┐ ───────────► ┌─────────┐ ──────► ┌──────┐
//!   │ Idle │              │ Drawing │         │ Idle │
//!   └──────┘ ◄─────────── └─────────┘         └──────┘
//!      │  ▲    pan up     ┌─────────┐
//!      │  └────────────── │ Panning │ ◄── pan down
//!      │                  └─────────┘
//!      └─ bucket click ─► Filling ─► Idle (same event)
//! ```
//!
//! A whole stroke is one undo step: the history is recorded at button-down,
//! never for the intermediate points. Panning and zooming never touch the
//! history. A fill is committed only when it changed at least one pixel.

use std::path::Path;

use egui::{Key, Modifiers, PointerButton, Pos2, Vec2};

use crate::canvas::{Anchor, CanvasBuffer};
use crate::config::PaintConfig;
use crate::error::CanvasResult;
use crate::file_handler::{self, SaveFormat};
use crate::fill::flood_fill;
use crate::history::{EditKind, History, Snapshot};
use crate::input::InputEvent;
use crate::stroke::ActiveStroke;
use crate::tools::{ToolKind, ToolSettings};
use crate::view::ViewTransform;

/// The gesture currently in progress
#[derive(Debug, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Drawing {
        stroke: ActiveStroke,
        kind: EditKind,
    },
    Panning {
        /// Last pointer position in viewport coordinates
        last: Pos2,
    },
    /// Only observable while a fill runs
    Filling,
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "Idle",
            SessionState::Drawing { .. } => "Drawing",
            SessionState::Panning { .. } => "Panning",
            SessionState::Filling => "Filling",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, SessionState::Idle)
    }
}

fn is_pan_button(button: PointerButton) -> bool {
    matches!(button, PointerButton::Secondary | PointerButton::Middle)
}

#[derive(Debug)]
pub struct EditorSession {
    canvas: CanvasBuffer,
    history: History,
    settings: ToolSettings,
    view: ViewTransform,
    state: SessionState,
    config: PaintConfig,
    /// Pointer position over the viewport, for the brush outline
    cursor: Option<Pos2>,
    viewport_size: Vec2,
    /// Bumped on every canvas change so the renderer knows to re-upload
    revision: u64,
}

impl EditorSession {
    /// Creates a session with a transparent canvas of the configured default size
    pub fn new(config: PaintConfig) -> CanvasResult<Self> {
        let canvas = CanvasBuffer::new(config.default_width, config.default_height)?;
        Ok(Self::with_canvas(canvas, config))
    }

    pub fn with_canvas(canvas: CanvasBuffer, config: PaintConfig) -> Self {
        Self {
            canvas,
            history: History::new(config.max_undo_states),
            settings: ToolSettings::from_config(&config),
            view: ViewTransform::new(&config),
            state: SessionState::Idle,
            cursor: None,
            viewport_size: Vec2::ZERO,
            revision: 0,
            config,
        }
    }

    pub fn canvas(&self) -> &CanvasBuffer {
        &self.canvas
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut ToolSettings {
        &mut self.settings
    }

    /// Replace tool settings (e.g. restored from storage), keeping configured limits
    pub fn set_settings(&mut self, settings: ToolSettings) {
        self.settings = settings.with_limits(&self.config);
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn config(&self) -> &PaintConfig {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn cursor(&self) -> Option<Pos2> {
        self.cursor
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Tell the session how large the viewport is, for keyboard zoom anchoring
    pub fn set_viewport_size(&mut self, size: Vec2) {
        self.viewport_size = size;
    }

    fn viewport_center(&self) -> Pos2 {
        (self.viewport_size * 0.5).to_pos2()
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.end_gesture();
        self.settings.set_tool(tool);
    }

    // ---------------------------------------------------------------------
    // Strokes

    /// Start a brush or eraser stroke at a canvas position.
    ///
    /// Returns false (and stays idle) when the active tool has no pen or a
    /// gesture is already running.
    pub fn begin_stroke(&mut self, at: Pos2) -> bool {
        if !self.state.is_idle() {
            return false;
        }
        let Some(pen) = self.settings.pen() else {
            return false;
        };
        let kind = match self.settings.tool() {
            ToolKind::Eraser => EditKind::Erase,
            _ => EditKind::Stroke,
        };
        self.history.record_before_edit(&self.canvas, kind);
        let stroke = ActiveStroke::begin(&mut self.canvas, at, pen);
        if stroke.changed() > 0 {
            self.touch();
        }
        self.state = SessionState::Drawing { stroke, kind };
        true
    }

    /// Extend the current stroke. Does nothing unless drawing.
    pub fn continue_stroke(&mut self, to: Pos2) -> usize {
        let SessionState::Drawing { stroke, .. } = &mut self.state else {
            return 0;
        };
        let changed = stroke.extend_to(&mut self.canvas, to);
        if changed > 0 {
            self.touch();
        }
        changed
    }

    /// Finish the current stroke. Returns the number of pixels it changed.
    pub fn end_stroke(&mut self) -> usize {
        match std::mem::take(&mut self.state) {
            SessionState::Drawing { stroke, kind, .. } => {
                log::debug!(
                    "{} finished: {} points, {} pixels changed",
                    kind.label(),
                    stroke.points().len(),
                    stroke.changed()
                );
                stroke.changed()
            }
            other => {
                self.state = other;
                0
            }
        }
    }

    // ---------------------------------------------------------------------
    // Fill

    /// Bucket fill at a canvas position with the current color and fill options.
    ///
    /// Records one undo step unless nothing changed. An out-of-bounds seed is
    /// an error and leaves canvas and history untouched.
    pub fn fill_at(&mut self, at: Pos2) -> CanvasResult<usize> {
        let (x, y) = (at.x.floor() as i32, at.y.floor() as i32);
        let target = self.canvas.get(x, y)?;
        if target.max_channel_distance(self.settings.color) <= self.settings.fill.tolerance {
            return Ok(0);
        }
        // Only copy the canvas once the fill is known to change something
        let snapshot = Snapshot::new(&self.canvas, EditKind::Fill);

        let previous = std::mem::replace(&mut self.state, SessionState::Filling);
        let result = flood_fill(&mut self.canvas, x, y, self.settings.color, self.settings.fill);
        self.state = previous;

        let changed = result?;
        if changed > 0 {
            self.history.push(snapshot);
            self.touch();
        }
        Ok(changed)
    }

    // ---------------------------------------------------------------------
    // View

    pub fn pan_by(&mut self, delta: Vec2) {
        self.view.pan_by(delta);
    }

    pub fn zoom_in(&mut self) -> bool {
        let center = self.viewport_center();
        self.view.zoom_in(center)
    }

    pub fn zoom_out(&mut self) -> bool {
        let center = self.viewport_center();
        self.view.zoom_out(center)
    }

    pub fn reset_zoom(&mut self) -> bool {
        let center = self.viewport_center();
        self.view.reset_zoom(center)
    }

    /// Actual size, canvas centred in the viewport
    pub fn center_view(&mut self) {
        self.view
            .center(self.viewport_size, self.canvas.width(), self.canvas.height());
    }

    // ---------------------------------------------------------------------
    // Whole-canvas edits

    pub fn undo(&mut self) -> bool {
        self.end_gesture();
        let undone = self.history.undo(&mut self.canvas);
        if undone {
            self.touch();
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        self.end_gesture();
        let redone = self.history.redo(&mut self.canvas);
        if redone {
            self.touch();
        }
        redone
    }

    /// Resize the canvas as one undo step. On error nothing changes.
    pub fn resize(&mut self, width: u32, height: u32, anchor: Anchor) -> CanvasResult<()> {
        self.end_gesture();
        if width == self.canvas.width() && height == self.canvas.height() {
            return Ok(());
        }
        let resized = self.canvas.resize(width, height, anchor)?;
        log::info!(
            "Resizing canvas from {}x{} to {}x{}",
            self.canvas.width(),
            self.canvas.height(),
            width,
            height
        );
        self.history.record_before_edit(&self.canvas, EditKind::Resize);
        self.canvas = resized;
        self.touch();
        Ok(())
    }

    /// Erase everything as one undo step
    pub fn clear(&mut self) {
        self.end_gesture();
        self.history.record_before_edit(&self.canvas, EditKind::Clear);
        self.canvas.clear();
        self.touch();
    }

    /// Start over with a transparent canvas. History is discarded and the view reset.
    pub fn new_canvas(&mut self, width: u32, height: u32) -> CanvasResult<()> {
        let canvas = CanvasBuffer::new(width, height)?;
        self.load_canvas(canvas);
        Ok(())
    }

    /// Replace the canvas with loaded content. History is discarded and the view reset.
    pub fn load_canvas(&mut self, canvas: CanvasBuffer) {
        self.end_gesture();
        log::info!("Loading new image of size: {}x{}", canvas.width(), canvas.height());
        self.canvas = canvas;
        self.history.clear();
        self.center_view();
        self.touch();
    }

    /// Decode a file and load it. On failure the current canvas is kept.
    pub fn open_file(&mut self, path: &Path) -> CanvasResult<()> {
        let canvas = file_handler::load_image(path)?;
        self.load_canvas(canvas);
        Ok(())
    }

    /// Save to `path`, format chosen by extension
    pub fn save_file(&self, path: &Path) -> CanvasResult<SaveFormat> {
        file_handler::save_canvas(&self.canvas, path, self.config.jpeg_background)
    }

    /// Abandon whatever gesture is in progress; a started stroke stays applied.
    fn end_gesture(&mut self) {
        if !self.state.is_idle() {
            log::debug!("Ending {} gesture", self.state.name());
            self.end_stroke();
            self.state = SessionState::Idle;
        }
    }

    // ---------------------------------------------------------------------
    // Input

    /// Apply one input event. Returns true when the view needs repainting.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::PointerEnter { location } => {
                self.cursor = location.is_in_canvas.then_some(location.position);
                true
            }
            InputEvent::PointerLeave { .. } => {
                self.cursor = None;
                true
            }
            InputEvent::PointerMove {
                location,
                held_buttons,
            } => {
                self.cursor = location.is_in_canvas.then_some(location.position);
                let released = match &mut self.state {
                    SessionState::Panning { last } => {
                        let delta = location.position - *last;
                        *last = location.position;
                        self.view.pan_by(delta);
                        !held_buttons.iter().copied().any(is_pan_button)
                    }
                    SessionState::Drawing { .. } => {
                        let to = self.view.screen_to_canvas(location.position);
                        self.continue_stroke(to);
                        !held_buttons.contains(&PointerButton::Primary)
                    }
                    _ => false,
                };
                // A release we never saw, e.g. outside the window
                if released {
                    self.end_gesture();
                }
                true
            }
            InputEvent::PointerDown { location, button } => {
                if !location.is_in_canvas || !self.state.is_idle() {
                    return false;
                }
                if is_pan_button(*button) {
                    self.state = SessionState::Panning {
                        last: location.position,
                    };
                    return true;
                }
                if *button != PointerButton::Primary {
                    return false;
                }
                let at = self.view.screen_to_canvas(location.position);
                if self.settings.tool() == ToolKind::Bucket {
                    match self.fill_at(at) {
                        Ok(changed) => changed > 0,
                        Err(err) => {
                            log::debug!("Fill ignored: {}", err);
                            false
                        }
                    }
                } else {
                    self.begin_stroke(at)
                }
            }
            InputEvent::PointerUp { button, .. } => match self.state {
                SessionState::Drawing { .. } if *button == PointerButton::Primary => {
                    self.end_stroke();
                    true
                }
                SessionState::Panning { .. } if is_pan_button(*button) => {
                    self.state = SessionState::Idle;
                    true
                }
                _ => false,
            },
            InputEvent::Scroll { location, delta } => {
                if !location.is_in_canvas {
                    return false;
                }
                self.view.pan_by(*delta);
                true
            }
            InputEvent::Zoom { location, factor } => {
                location.is_in_canvas && self.view.zoom_at(location.position, *factor)
            }
            InputEvent::KeyDown { key, modifiers } => self.handle_key(*key, *modifiers),
        }
    }

    fn handle_key(&mut self, key: Key, modifiers: Modifiers) -> bool {
        if modifiers.command {
            return match key {
                Key::Z if modifiers.shift => self.redo(),
                Key::Z => self.undo(),
                Key::Y => self.redo(),
                Key::Num0 => self.reset_zoom(),
                Key::Plus | Key::Equals => self.zoom_in(),
                Key::Minus => self.zoom_out(),
                _ => false,
            };
        }
        if !self.settings.tool().uses_pen() {
            return false;
        }
        match key {
            Key::Plus | Key::Equals => self.settings.adjust_pen_size(1),
            Key::Minus => self.settings.adjust_pen_size(-1),
            _ => false,
        }
    }
}
