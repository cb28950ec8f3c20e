//! Entry point for the egui-based ForestCast dashboard.

use eframe::egui;
use forestcast::config::{self, DashboardConfig};
use forestcast::egui_app::ui::{EguiApp, MIN_VIEWPORT_SIZE};
use forestcast::logging;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }

    let config = match config::load_or_default() {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Falling back to default config: {err}");
            DashboardConfig::default()
        }
    };

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size(egui::vec2(1280.0, 800.0))
        .with_min_inner_size(MIN_VIEWPORT_SIZE);
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "ForestCast PH",
        native_options,
        Box::new(move |_cc| Ok(Box::new(EguiApp::new(config)))),
    )?;
    Ok(())
}
