use eframe::egui;

use crate::app::{Dialog, PaintApp, PendingAction};
use crate::canvas::{Anchor, MAX_DIMENSION};

enum Outcome {
    Cancel,
    Resize { width: u32, height: u32, anchor: Anchor },
    Discard(PendingAction),
}

fn modal(title: &str) -> egui::Window<'static> {
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
}

/// Shows the open modal dialog and the error notification, if any
pub fn dialogs(app: &mut PaintApp, ctx: &egui::Context) {
    let mut outcome = None;

    match &mut app.dialog {
        Some(Dialog::Resize { width, height, anchor }) => {
            modal("Resize Canvas").show(ctx, |ui| {
                egui::Grid::new("resize_grid").num_columns(2).show(ui, |ui| {
                    ui.label("Width");
                    ui.add(egui::DragValue::new(width).range(1..=MAX_DIMENSION).suffix(" px"));
                    ui.end_row();
                    ui.label("Height");
                    ui.add(egui::DragValue::new(height).range(1..=MAX_DIMENSION).suffix(" px"));
                    ui.end_row();
                });

                ui.label("Anchor");
                egui::Grid::new("anchor_grid").show(ui, |ui| {
                    for (i, candidate) in Anchor::ALL.into_iter().enumerate() {
                        if ui
                            .selectable_label(*anchor == candidate, "■")
                            .on_hover_text(candidate.label())
                            .clicked()
                        {
                            *anchor = candidate;
                        }
                        if i % 3 == 2 {
                            ui.end_row();
                        }
                    }
                });

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() {
                        outcome = Some(Outcome::Resize {
                            width: *width,
                            height: *height,
                            anchor: *anchor,
                        });
                    }
                    if ui.button("Cancel").clicked() {
                        outcome = Some(Outcome::Cancel);
                    }
                });
            });
        }
        Some(Dialog::ConfirmDiscard(action)) => {
            let action = *action;
            modal("Unsaved Changes").show(ctx, |ui| {
                ui.label(format!("Discard unsaved changes before {}?", action.verb()));
                ui.horizontal(|ui| {
                    if ui.button("Discard").clicked() {
                        outcome = Some(Outcome::Discard(action));
                    }
                    if ui.button("Cancel").clicked() {
                        outcome = Some(Outcome::Cancel);
                    }
                });
            });
        }
        None => {}
    }

    match outcome {
        Some(Outcome::Cancel) => app.dialog = None,
        Some(Outcome::Resize { width, height, anchor }) => {
            app.dialog = None;
            if let Err(err) = app.session.resize(width, height, anchor) {
                app.notify_error("Could not resize canvas", &err);
            }
        }
        Some(Outcome::Discard(action)) => {
            app.dialog = None;
            app.perform(ctx, action);
        }
        None => {}
    }

    notification(app, ctx);
}

fn notification(app: &mut PaintApp, ctx: &egui::Context) {
    let Some(message) = &app.notification else {
        return;
    };
    let mut dismissed = false;
    egui::Window::new("Error")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_TOP, egui::vec2(0.0, 40.0))
        .show(ctx, |ui| {
            ui.colored_label(ui.visuals().error_fg_color, message);
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });
    if dismissed {
        app.notification = None;
    }
}
