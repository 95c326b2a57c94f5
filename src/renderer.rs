// src/renderer.rs
use eframe::egui::{self, Color32, Pos2, Rect, Stroke, TextureHandle, TextureOptions, Vec2};

use crate::session::EditorSession;

const LIGHT_GRAY: Color32 = Color32::from_rgb(220, 220, 220);
const DARK_GRAY: Color32 = Color32::from_rgb(180, 180, 180);

/// Nearest sampling keeps pixels crisp when zoomed in
fn canvas_texture_options() -> TextureOptions {
    TextureOptions::NEAREST
}

fn checker_texture_options() -> TextureOptions {
    TextureOptions {
        wrap_mode: egui::TextureWrapMode::Repeat,
        ..TextureOptions::NEAREST
    }
}

/// Draws the canvas, a checkerboard behind transparent areas, and the brush outline
pub struct Renderer {
    canvas_texture: Option<TextureHandle>,
    /// Session revision the texture was last uploaded from
    uploaded_revision: Option<u64>,
    checker_texture: Option<TextureHandle>,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("uploaded_revision", &self.uploaded_revision)
            .finish_non_exhaustive()
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            canvas_texture: None,
            uploaded_revision: None,
            checker_texture: None,
        }
    }

    pub fn uploaded_revision(&self) -> Option<u64> {
        self.uploaded_revision
    }

    fn sync_canvas_texture(&mut self, ctx: &egui::Context, session: &EditorSession) -> egui::TextureId {
        let revision = session.revision();
        match &mut self.canvas_texture {
            Some(handle) if self.uploaded_revision == Some(revision) => handle.id(),
            Some(handle) => {
                handle.set(session.canvas().to_color_image(), canvas_texture_options());
                self.uploaded_revision = Some(revision);
                handle.id()
            }
            None => {
                log::debug!("Creating canvas texture at revision {}", revision);
                let handle = ctx.load_texture("canvas", session.canvas().to_color_image(), canvas_texture_options());
                let id = handle.id();
                self.canvas_texture = Some(handle);
                self.uploaded_revision = Some(revision);
                id
            }
        }
    }

    fn checker_texture(&mut self, ctx: &egui::Context) -> egui::TextureId {
        self.checker_texture
            .get_or_insert_with(|| {
                let image = egui::ColorImage {
                    size: [2, 2],
                    pixels: vec![LIGHT_GRAY, DARK_GRAY, DARK_GRAY, LIGHT_GRAY],
                };
                ctx.load_texture("checkerboard", image, checker_texture_options())
            })
            .id()
    }

    /// Renders the current frame into `viewport`
    pub fn render(&mut self, ctx: &egui::Context, painter: &egui::Painter, viewport: Rect, session: &EditorSession) {
        let view = session.view();
        let canvas = session.canvas();
        let canvas_rect = view
            .canvas_rect(canvas.width(), canvas.height())
            .translate(viewport.min.to_vec2());

        // Checkerboard squares have a fixed on-screen size and stay anchored to the canvas corner
        let checker_id = self.checker_texture(ctx);
        let repeats = checker_repeats(canvas_rect.size(), session.config().checker_size);
        let uv = Rect::from_min_max(Pos2::ZERO, repeats.to_pos2());
        painter.image(checker_id, canvas_rect, uv, Color32::WHITE);

        let canvas_id = self.sync_canvas_texture(ctx, session);
        painter.image(
            canvas_id,
            canvas_rect,
            Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
            Color32::WHITE,
        );

        self.render_brush_outline(painter, viewport, session);
    }

    fn render_brush_outline(&self, painter: &egui::Painter, viewport: Rect, session: &EditorSession) {
        let Some(cursor) = session.cursor() else {
            return;
        };
        let settings = session.settings();
        if !settings.tool().uses_pen() {
            return;
        }
        let radius = settings.current_pen_size() as f32 / 2.0 * session.view().zoom();
        let center = viewport.min + cursor.to_vec2();
        painter.circle_stroke(center, radius, Stroke::new(1.0, Color32::WHITE));
        let inner = radius - 1.0;
        if inner > 0.1 {
            painter.circle_stroke(center, inner, Stroke::new(1.0, Color32::BLACK));
        }
    }
}

/// How many times the 2x2 checker texture repeats across a canvas rect
pub fn checker_repeats(canvas_size: Vec2, checker: f32) -> Vec2 {
    canvas_size / (2.0 * checker.max(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PaintConfig;

    fn test_painter(ctx: &egui::Context, rect: Rect) -> egui::Painter {
        egui::Painter::new(ctx.clone(), egui::LayerId::background(), rect)
    }

    #[test]
    fn test_render_uploads_texture_once_per_revision() {
        let config = PaintConfig {
            default_width: 16,
            default_height: 8,
            ..PaintConfig::default()
        };
        let mut session = EditorSession::new(config).unwrap();
        let mut renderer = Renderer::new();
        let ctx = egui::Context::default();
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(100.0, 100.0));
        let painter = test_painter(&ctx, rect);

        renderer.render(&ctx, &painter, rect, &session);
        assert_eq!(renderer.uploaded_revision(), Some(0));

        session.clear();
        renderer.render(&ctx, &painter, rect, &session);
        assert_eq!(renderer.uploaded_revision(), Some(session.revision()));
    }

    #[test]
    fn test_checker_repeats_scale_with_canvas() {
        let repeats = checker_repeats(Vec2::new(400.0, 200.0), 20.0);
        assert_eq!(repeats, Vec2::new(10.0, 5.0));
    }
}
