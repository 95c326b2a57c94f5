#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use eframe::egui;
use raster_paint::{PaintApp, PaintConfig};

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = PaintConfig::load_or_default();
    log::info!(
        "Starting with a {}x{} canvas, {} undo states",
        config.default_width,
        config.default_height,
        config.max_undo_states
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Raster Paint")
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([400.0, 300.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Raster Paint",
        options,
        Box::new(|cc| Ok(Box::new(PaintApp::new(cc, config)?))),
    )
}
