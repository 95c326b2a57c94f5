use eframe::egui;

use crate::app::PaintApp;
use crate::canvas::Pixel;
use crate::components::ToolButton;
use crate::fill::Connectivity;
use crate::stroke::PenShape;
use crate::tools::ToolKind;

pub fn tools_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.heading("Tools");

            let active_tool = app.session.settings().tool();
            ui.horizontal(|ui| {
                for tool in ToolKind::ALL {
                    if ToolButton::new(tool, tool == active_tool).show(ui).clicked() {
                        log::info!("Tool selected from UI: {}", tool.name());
                        app.session.set_tool(tool);
                    }
                }
            });
            ui.separator();

            tool_options(app, ui);
            ui.separator();

            // Undo/Redo section
            ui.horizontal(|ui| {
                let can_undo = app.session.history().can_undo();
                let can_redo = app.session.history().can_redo();

                if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                    app.session.undo();
                }
                if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                    app.session.redo();
                }
            });

            ui.separator();
            history_grid(app, ui);
        });
}

fn tool_options(app: &mut PaintApp, ui: &mut egui::Ui) {
    let settings = app.session.settings_mut();
    let tool = settings.tool();

    ui.horizontal(|ui| {
        ui.label("Color");
        let mut color = egui::Color32::from(settings.color);
        if egui::color_picker::color_edit_button_srgba(
            ui,
            &mut color,
            egui::color_picker::Alpha::OnlyBlend,
        )
        .changed()
        {
            settings.color = Pixel::from(color);
        }
    });

    if tool.uses_pen() {
        let (min, max) = settings.size_limits();
        let mut size = settings.current_pen_size();
        if ui
            .add(egui::Slider::new(&mut size, min..=max).text("Size"))
            .changed()
        {
            settings.set_pen_size(size);
        }

        ui.horizontal(|ui| {
            ui.label("Shape");
            ui.radio_value(&mut settings.pen_shape, PenShape::Round, "Round");
            ui.radio_value(&mut settings.pen_shape, PenShape::Square, "Square");
        });
    } else {
        ui.add(egui::Slider::new(&mut settings.fill.tolerance, 0..=255).text("Tolerance"));
        ui.horizontal(|ui| {
            ui.label("Neighbours");
            ui.radio_value(&mut settings.fill.connectivity, Connectivity::Four, "4");
            ui.radio_value(&mut settings.fill.connectivity, Connectivity::Eight, "8");
        });
    }
}

fn history_grid(app: &PaintApp, ui: &mut egui::Ui) {
    let history = app.session.history();
    ui.horizontal(|ui| {
        ui.label(format!("Undo stack size: {}", history.undo_stack().len()));
        ui.label(format!("Redo stack size: {}", history.redo_stack().len()));
    });

    egui::ScrollArea::vertical().show(ui, |ui| {
        egui::Grid::new("edit_history_grid")
            .num_columns(2)
            .spacing([40.0, 4.0])
            .striped(true)
            .show(ui, |ui| {
                ui.strong("Undo Stack");
                ui.strong("Redo Stack");
                ui.end_row();

                // Most recent first in both columns
                let mut undo = history.undo_stack().iter().rev();
                let mut redo = history.redo_stack().iter().rev();
                loop {
                    let (u, r) = (undo.next(), redo.next());
                    if u.is_none() && r.is_none() {
                        break;
                    }
                    ui.label(u.map(|s| s.kind().label()).unwrap_or(""));
                    ui.label(r.map(|s| s.kind().label()).unwrap_or(""));
                    ui.end_row();
                }
            });
    });
}
