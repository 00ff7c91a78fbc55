//! Rule-based diet classification.
//!
//! Classification concatenates product name, categories, and ingredients
//! into one normalized string and tests the tiered keyword taxonomy in
//! strict priority order; the first matching tier decides the label. A
//! secondary pass over product-name/category text alone can raise the
//! confidence when it corroborates the assigned label, but never changes
//! the label itself.

use serde::{Deserialize, Serialize};

use crate::diet::taxonomy::{DietTier, TAXONOMY, normalize_text};
use crate::error::Result;

/// A diet label under the Indian classification convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DietLabel {
    /// No animal products whatsoever (vegan).
    PureVegetarian,
    /// Dairy and honey allowed; no meat, fish, or eggs.
    Vegetarian,
    /// Contains meat, fish, eggs, or other animal-derived ingredients.
    NonVegetarian,
    /// No usable ingredient information.
    Unknown,
}

impl DietLabel {
    /// Human-readable label text.
    pub fn as_str(&self) -> &'static str {
        match self {
            DietLabel::PureVegetarian => "Pure Vegetarian",
            DietLabel::Vegetarian => "Vegetarian",
            DietLabel::NonVegetarian => "Non-Vegetarian",
            DietLabel::Unknown => "Unknown",
        }
    }

    /// Display color for presentation layers.
    pub fn color(&self) -> &'static str {
        match self {
            DietLabel::PureVegetarian => "green",
            DietLabel::Vegetarian => "orange",
            DietLabel::NonVegetarian => "red",
            DietLabel::Unknown => "gray",
        }
    }

    /// Indian packaged-food marking symbol (green/red dot).
    pub fn symbol(&self) -> &'static str {
        match self {
            DietLabel::PureVegetarian | DietLabel::Vegetarian => "green-dot",
            DietLabel::NonVegetarian => "red-dot",
            DietLabel::Unknown => "white-dot",
        }
    }
}

impl std::fmt::Display for DietLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of a diet classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietClassification {
    /// The assigned diet label.
    pub label: DietLabel,
    /// Confidence in [0, 1].
    pub confidence: f64,
    /// Why the label was assigned.
    pub reason: String,
}

impl DietClassification {
    /// An unknown classification with zero confidence.
    pub fn unknown<S: Into<String>>(reason: S) -> Self {
        Self {
            label: DietLabel::Unknown,
            confidence: 0.0,
            reason: reason.into(),
        }
    }
}

/// Base confidence per matched tier.
const CONFIDENCE_NON_VEG: f64 = 0.95;
const CONFIDENCE_VEGETARIAN: f64 = 0.85;
const CONFIDENCE_JAIN: f64 = 0.75;
const CONFIDENCE_PLANT_MARKER: f64 = 0.80;
const CONFIDENCE_DEFAULT: f64 = 0.65;

/// Corroboration indicators checked against product-name/category text only.
const NON_VEG_INDICATORS: &[&str] = &["meat", "chicken", "mutton", "fish", "egg", "prawn", "crab"];
const VEGETARIAN_INDICATORS: &[&str] = &["paneer", "cheese", "milk", "dairy", "ghee", "butter"];
const PLANT_INDICATORS: &[&str] = &["vegan", "plant-based", "pure veg", "no dairy", "dairy-free"];

/// Rule-based diet classifier over the shared keyword taxonomy.
///
/// Pure function over its keyword tables: no state, no side effects.
/// Note the deliberate permissive default — text matching no tier at all
/// is labeled [`DietLabel::PureVegetarian`] at the lowest confidence,
/// which can mislabel products with incomplete ingredient text.
#[derive(Debug, Clone, Default)]
pub struct DietClassifier;

impl DietClassifier {
    /// Create a new diet classifier.
    pub fn new() -> Self {
        Self
    }

    /// Classify a product from its free-text metadata.
    ///
    /// All three inputs may be empty; empty combined text yields
    /// [`DietLabel::Unknown`] with zero confidence. With `jain_mode`,
    /// root vegetables and alliums produce a Vegetarian-tier result with
    /// a distinct reason string.
    pub fn classify(
        &self,
        product_name: &str,
        categories: &str,
        ingredients: &str,
        jain_mode: bool,
    ) -> Result<DietClassification> {
        let combined = normalize_text(&format!("{product_name} {categories} {ingredients}"));
        if combined.is_empty() {
            return Ok(DietClassification::unknown(
                "No ingredient information provided",
            ));
        }

        let mut result = match TAXONOMY.first_match(&combined, jain_mode) {
            Some(DietTier::NonVegetarian) => DietClassification {
                label: DietLabel::NonVegetarian,
                confidence: CONFIDENCE_NON_VEG,
                reason: "Contains meat, fish, eggs, or other non-vegetarian ingredients"
                    .to_string(),
            },
            Some(DietTier::VegetarianOnly) => DietClassification {
                label: DietLabel::Vegetarian,
                confidence: CONFIDENCE_VEGETARIAN,
                reason: "Contains dairy products but no non-vegetarian ingredients".to_string(),
            },
            Some(DietTier::JainRestricted) => DietClassification {
                label: DietLabel::Vegetarian,
                confidence: CONFIDENCE_JAIN,
                reason: "Contains root vegetables (not suitable for Jain diet)".to_string(),
            },
            Some(DietTier::PlantBased) => DietClassification {
                label: DietLabel::PureVegetarian,
                confidence: CONFIDENCE_PLANT_MARKER,
                reason: "Contains only plant-based ingredients".to_string(),
            },
            None => DietClassification {
                label: DietLabel::PureVegetarian,
                confidence: CONFIDENCE_DEFAULT,
                reason: "No animal-derived ingredients detected".to_string(),
            },
        };

        self.corroborate(&mut result, product_name, categories);
        Ok(result)
    }

    /// Boost confidence when name/category text corroborates the label.
    ///
    /// Only product-name and category text is consulted (not the full
    /// ingredient list); the boost is capped per tier and never changes
    /// the label.
    fn corroborate(&self, result: &mut DietClassification, product_name: &str, categories: &str) {
        let product_text = normalize_text(&format!("{product_name} {categories}"));
        if product_text.is_empty() {
            return;
        }

        match result.label {
            DietLabel::NonVegetarian => {
                if contains_any(&product_text, NON_VEG_INDICATORS) {
                    result.confidence = (result.confidence + 0.10).min(0.98);
                }
            }
            DietLabel::Vegetarian => {
                if contains_any(&product_text, VEGETARIAN_INDICATORS) {
                    result.confidence = (result.confidence + 0.10).min(0.92);
                }
            }
            DietLabel::PureVegetarian => {
                if contains_any(&product_text, PLANT_INDICATORS) {
                    result.confidence = (result.confidence + 0.15).min(0.95);
                }
            }
            DietLabel::Unknown => {}
        }
    }
}

/// Whole-word containment of any indicator in already-normalized text.
fn contains_any(normalized_text: &str, indicators: &[&str]) -> bool {
    let tokens: Vec<&str> = normalized_text.split(' ').collect();
    indicators.iter().any(|indicator| {
        let normalized = normalize_text(indicator);
        let phrase: Vec<&str> = normalized.split(' ').collect();
        tokens
            .windows(phrase.len())
            .any(|window| window == phrase.as_slice())
    })
}
