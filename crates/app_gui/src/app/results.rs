//! Result panel: placeholder, or the verdict with per-class bars.

use classify_core::ResultPanel;
use eframe::egui;

const BAR_WIDTH: f32 = 160.0;

pub(super) fn render_result_panel(ui: &mut egui::Ui, panel: &ResultPanel) {
    ui.heading("Result");
    ui.add_space(8.0);
    if !panel.is_showing_content() {
        ui.label("Upload an image and press Classify to see the ship type.");
        return;
    }

    ui.label(egui::RichText::new(&panel.predicted_class).size(22.0).strong());
    ui.label(&panel.confidence_text);

    if !panel.description.is_empty() {
        ui.add_space(8.0);
        ui.label(&panel.description);
    }
    if !panel.features.is_empty() {
        ui.add_space(4.0);
        for feature in &panel.features {
            ui.label(format!("• {feature}"));
        }
    }

    if !panel.bars.is_empty() {
        ui.add_space(12.0);
        ui.separator();
        ui.label(egui::RichText::new("All predictions").strong());
        egui::Grid::new("all-predictions")
            .num_columns(3)
            .striped(true)
            .show(ui, |ui| {
                for bar in &panel.bars {
                    ui.label(&bar.label);
                    ui.add(egui::ProgressBar::new(bar.fill).desired_width(BAR_WIDTH));
                    ui.label(&bar.percent_text);
                    ui.end_row();
                }
            });
    }
}
