use eframe::egui;

use crate::app::PaintApp;

pub fn central_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none().fill(egui::Color32::from_gray(48)))
        .show(ctx, |ui| {
            let (response, painter) =
                ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
            let viewport = response.rect;

            app.session.set_viewport_size(viewport.size());
            app.ensure_view_initialized();

            // Modal dialogs own the input while open
            if app.dialog.is_none() {
                let events = app.input_handler.process_input(ctx, viewport, response.hovered());
                let mut repaint = false;
                for event in &events {
                    repaint |= app.session.handle_event(event);
                }
                if repaint {
                    ctx.request_repaint();
                }
            }

            if response.hovered() && app.session.settings().tool().uses_pen() {
                ctx.set_cursor_icon(egui::CursorIcon::None);
            } else if response.hovered() {
                ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
            }

            app.renderer.render(ctx, &painter, viewport, &app.session);
        });
}

pub fn status_bar(app: &PaintApp, ctx: &egui::Context) {
    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            let session = &app.session;
            let canvas = session.canvas();

            ui.label(session.settings().tool().name());
            ui.separator();
            ui.label(format!("{} x {}", canvas.width(), canvas.height()));
            ui.separator();
            ui.label(format!("{:.0}%", session.view().zoom() * 100.0));

            if let Some(cursor) = session.cursor() {
                let at = session.view().screen_to_canvas(cursor);
                let (x, y) = (at.x.floor() as i32, at.y.floor() as i32);
                if canvas.contains(x, y) {
                    ui.separator();
                    ui.label(format!("{x}, {y}"));
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if app.has_unsaved_changes() {
                    ui.label("Modified");
                }
                if let Some(path) = &app.current_path {
                    ui.label(path.display().to_string());
                }
            });
        });
    });
}
