use eframe::egui;

use crate::app::{PaintApp, PendingAction};

pub fn menu_bar(app: &mut PaintApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("New").clicked() {
                    ui.close_menu();
                    app.request(ctx, PendingAction::New);
                }
                if ui.button("Open…").clicked() {
                    ui.close_menu();
                    app.request(ctx, PendingAction::Open);
                }
                ui.separator();
                if ui.button("Save").clicked() {
                    ui.close_menu();
                    app.save();
                }
                if ui.button("Save As…").clicked() {
                    ui.close_menu();
                    app.save_with_dialog();
                }
                ui.separator();
                if ui.button("Quit").clicked() {
                    ui.close_menu();
                    app.request(ctx, PendingAction::Quit);
                }
            });

            ui.menu_button("Edit", |ui| {
                let can_undo = app.session.history().can_undo();
                let can_redo = app.session.history().can_redo();
                if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                    ui.close_menu();
                    app.session.undo();
                }
                if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                    ui.close_menu();
                    app.session.redo();
                }
                ui.separator();
                if ui.button("Resize Canvas…").clicked() {
                    ui.close_menu();
                    app.open_resize_dialog();
                }
                if ui.button("Clear Canvas").clicked() {
                    ui.close_menu();
                    app.session.clear();
                }
            });

            ui.menu_button("View", |ui| {
                // Same operations as the Ctrl shortcuts handled by the session
                if ui.add(egui::Button::new("Zoom In").shortcut_text("Ctrl+=")).clicked() {
                    ui.close_menu();
                    app.session.zoom_in();
                }
                if ui.add(egui::Button::new("Zoom Out").shortcut_text("Ctrl+-")).clicked() {
                    ui.close_menu();
                    app.session.zoom_out();
                }
                if ui.add(egui::Button::new("Actual Size").shortcut_text("Ctrl+0")).clicked() {
                    ui.close_menu();
                    app.session.reset_zoom();
                }
                if ui.button("Center Canvas").clicked() {
                    ui.close_menu();
                    app.session.center_view();
                }
            });
        });
    });
}
