//! Projection of a [`ClassificationResult`] onto the result panel.

use crate::result::ClassificationResult;

/// Word appended to every predicted class label.
pub const CLASS_SUFFIX: &str = "Ship";

/// One per-class confidence row.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionBar {
    pub label: String,
    /// Filled share of the bar, clamped to [0,1].
    pub fill: f32,
    pub percent_text: String,
}

/// Retained contents of the result area.
///
/// Fields other than the visibility flag keep their last rendered values
/// while the placeholder is shown, just like hidden page elements do.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultPanel {
    content_visible: bool,
    pub predicted_class: String,
    pub confidence_text: String,
    pub description: String,
    pub features: Vec<String>,
    pub bars: Vec<PredictionBar>,
}

impl ResultPanel {
    /// True when the content is shown instead of the placeholder.
    pub fn is_showing_content(&self) -> bool {
        self.content_visible
    }

    pub fn show_content(&mut self) {
        self.content_visible = true;
    }

    pub fn show_placeholder(&mut self) {
        self.content_visible = false;
    }

    /// Fill the panel from a successful result. Rendering the same result
    /// twice leaves the panel unchanged.
    pub fn render(&mut self, result: &ClassificationResult) {
        self.show_content();
        self.predicted_class = format!("{} {CLASS_SUFFIX}", result.predicted_class);
        self.confidence_text = format!("Confidence: {}", format_percent(result.confidence));

        if let Some(desc) = &result.description {
            self.description = desc.description.clone();
            self.features.clear();
            self.features.extend(desc.features.iter().cloned());
        }

        self.bars.clear();
        if let Some(preds) = &result.all_predictions {
            let mut sorted: Vec<&(String, f64)> = preds.iter().collect();
            // stable: equal confidences keep server order
            sorted.sort_by(|a, b| b.1.total_cmp(&a.1));
            self.bars.extend(sorted.into_iter().map(|&(ref label, confidence)| PredictionBar {
                label: label.clone(),
                fill: confidence.clamp(0.0, 1.0) as f32,
                percent_text: format_percent(confidence),
            }));
        }
    }
}

/// `0.873` -> `"87.3%"`.
pub fn format_percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::ShipDescription;

    fn cargo_result() -> ClassificationResult {
        ClassificationResult {
            success: true,
            predicted_class: "Cargo".into(),
            confidence: 0.873,
            description: None,
            all_predictions: Some(vec![
                ("Cargo".into(), 0.873),
                ("Tanker".into(), 0.09),
                ("Fishing".into(), 0.037),
            ]),
            error: None,
        }
    }

    #[test]
    fn renders_label_confidence_and_sorted_bars() {
        let mut panel = ResultPanel::default();
        panel.render(&cargo_result());

        assert!(panel.is_showing_content());
        assert_eq!(panel.predicted_class, "Cargo Ship");
        assert_eq!(panel.confidence_text, "Confidence: 87.3%");
        let rows: Vec<(&str, &str)> = panel
            .bars
            .iter()
            .map(|b| (b.label.as_str(), b.percent_text.as_str()))
            .collect();
        assert_eq!(
            rows,
            vec![("Cargo", "87.3%"), ("Tanker", "9.0%"), ("Fishing", "3.7%")]
        );
        assert!((panel.bars[0].fill - 0.873).abs() < 1e-6);
    }

    #[test]
    fn sorts_descending_and_keeps_order_of_ties() {
        let mut result = cargo_result();
        result.all_predictions = Some(vec![
            ("Cruise".into(), 0.1),
            ("Military".into(), 0.4),
            ("Carrier".into(), 0.1),
            ("Tanker".into(), 0.4),
        ]);
        let mut panel = ResultPanel::default();
        panel.render(&result);
        let labels: Vec<&str> = panel.bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Military", "Tanker", "Cruise", "Carrier"]);
    }

    #[test]
    fn features_replace_previous_entries() {
        let mut panel = ResultPanel::default();
        panel.features = vec!["stale".into(), "entries".into(), "here".into()];

        let mut result = cargo_result();
        result.description = Some(ShipDescription {
            description: "Carries containers".into(),
            features: vec!["steel hull".into(), "large cargo holds".into()],
        });
        panel.render(&result);

        assert_eq!(panel.description, "Carries containers");
        assert_eq!(panel.features, vec!["steel hull", "large cargo holds"]);
    }

    #[test]
    fn missing_description_leaves_previous_text() {
        let mut panel = ResultPanel::default();
        panel.description = "earlier".into();
        panel.features = vec!["kept".into()];
        panel.render(&cargo_result());
        assert_eq!(panel.description, "earlier");
        assert_eq!(panel.features, vec!["kept"]);
    }

    #[test]
    fn missing_predictions_clear_old_bars() {
        let mut panel = ResultPanel::default();
        panel.render(&cargo_result());
        assert_eq!(panel.bars.len(), 3);

        let mut result = cargo_result();
        result.all_predictions = None;
        panel.render(&result);
        assert!(panel.bars.is_empty());
    }

    #[test]
    fn rendering_twice_is_idempotent() {
        let mut result = cargo_result();
        result.description = Some(ShipDescription {
            description: "d".into(),
            features: vec!["a".into(), "b".into()],
        });
        let mut once = ResultPanel::default();
        once.render(&result);
        let mut twice = once.clone();
        twice.render(&result);
        assert_eq!(once, twice);
        assert_eq!(twice.features.len(), 2);
        assert_eq!(twice.bars.len(), 3);
    }

    #[test]
    fn bar_fill_is_clamped_for_painting() {
        let mut result = cargo_result();
        result.all_predictions = Some(vec![("Odd".into(), 1.5), ("Neg".into(), -0.2)]);
        let mut panel = ResultPanel::default();
        panel.render(&result);
        assert_eq!(panel.bars[0].fill, 1.0);
        assert_eq!(panel.bars[0].percent_text, "150.0%");
        assert_eq!(panel.bars[1].fill, 0.0);
    }

    #[test]
    fn percent_has_one_decimal() {
        assert_eq!(format_percent(0.0), "0.0%");
        assert_eq!(format_percent(1.0), "100.0%");
        assert_eq!(format_percent(0.5), "50.0%");
    }
}
