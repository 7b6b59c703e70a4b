mod app;

use anyhow::anyhow;
use classify_core::{ClientConfig, HttpBackend};
use eframe::{NativeOptions, egui};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = ClientConfig::load();
    let backend = HttpBackend::new(&config)?;
    tracing::info!(endpoint = backend.endpoint(), "using classification service");

    let title = format!("Ship Classifier {}", env!("SHIP_CLASSIFIER_VERSION"));
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 640.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };
    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| {
            Ok::<_, Box<dyn std::error::Error + Send + Sync>>(Box::new(app::UiApp::new(backend)))
        }),
    )
    .map_err(|e| anyhow!("application stopped with error: {e}"))
}
