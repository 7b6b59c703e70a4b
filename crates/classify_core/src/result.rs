use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Descriptive text the backend attaches to a predicted class.
///
/// Unknown classes come back as `{}`, so both fields default to empty.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ShipDescription {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
}

/// JSON verdict returned by `POST /predict`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClassificationResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub predicted_class: String,
    /// Confidence in [0,1].
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub description: Option<ShipDescription>,
    /// Per-class confidences in the order the server sent them.
    #[serde(default, deserialize_with = "ordered_predictions")]
    pub all_predictions: Option<Vec<(String, f64)>>,
    /// Only meaningful when `success` is false.
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of a non-2xx reply.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

// A JSON object read as a list keeps document order, which decides ties later.
fn ordered_predictions<'de, D>(deserializer: D) -> Result<Option<Vec<(String, f64)>>, D::Error>
where
    D: Deserializer<'de>,
{
    struct PairsVisitor;

    impl<'de> Visitor<'de> for PairsVisitor {
        type Value = Option<Vec<(String, f64)>>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of class label to confidence, or null")
        }

        fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D2: Deserializer<'de>>(self, d: D2) -> Result<Self::Value, D2::Error> {
            d.deserialize_map(self)
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((label, confidence)) = map.next_entry::<String, f64>()? {
                pairs.push((label, confidence));
            }
            Ok(Some(pairs))
        }
    }

    deserializer.deserialize_option(PairsVisitor)
}
