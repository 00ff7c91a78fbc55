//! Product analysis orchestration.
//!
//! [`NutriAnalyzer`] fuses the diet classifier and the health-score
//! model for a single product and derives a ranked suggestion list from
//! the combined result. Failures inside one sub-analysis are isolated:
//! a classification error downgrades to an Unknown label, a scoring
//! error to an absent score — neither ever aborts the overall call.
//! Batch comparison runs the same analysis per product sequentially.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::diet::classifier::{DietClassification, DietClassifier, DietLabel};
use crate::error::{NutriScanError, Result};
use crate::nutrition::attribute::NutrientAttr;
use crate::nutrition::completer::FeatureCompleter;
use crate::nutrition::facts::{NutritionFacts, NutritionVector};
use crate::scoring::model::{HealthRating, HealthScoreModel};

/// Maximum number of suggestions per analysis.
const MAX_SUGGESTIONS: usize = 5;

/// Input for one product analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductInput {
    /// Product name, possibly empty.
    #[serde(default)]
    pub name: String,
    /// Free-text ingredient list, possibly empty.
    #[serde(default)]
    pub ingredients: String,
    /// Free-text categories, possibly empty.
    #[serde(default)]
    pub categories: String,
    /// Sparse nutrition facts, possibly empty.
    #[serde(default)]
    pub nutrition: NutritionFacts,
    /// Apply Jain dietary restrictions during classification.
    #[serde(default)]
    pub jain_mode: bool,
}

/// Whether an analysis had anything to work with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisStatus {
    /// At least one of text or nutrition input was present.
    Success,
    /// No text and no nutrition data were provided.
    NothingToAnalyze,
}

/// Health-scoring half of an analysis result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthAssessment {
    /// Predicted score in [0, 100], absent when unavailable.
    pub score: Option<f64>,
    /// Rating band for the score, or a reason it is absent.
    pub rating: HealthRating,
    /// The completed vector the score was computed from.
    pub nutrition: Option<NutritionVector>,
    /// Error text when scoring failed.
    pub error: Option<String>,
}

impl HealthAssessment {
    fn insufficient_data() -> Self {
        Self {
            score: None,
            rating: HealthRating::InsufficientData,
            nutrition: None,
            error: None,
        }
    }
}

/// The merged result of one product analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Product name as provided.
    pub product_name: String,
    /// Whether there was anything to analyze.
    pub status: AnalysisStatus,
    /// Diet classification outcome.
    pub diet: DietClassification,
    /// Health scoring outcome.
    pub health: HealthAssessment,
    /// At most five suggestion strings, in fixed rule order.
    pub suggestions: Vec<String>,
}

/// The result of comparing a batch of products.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Per-product analyses in input order.
    pub products: Vec<AnalysisResult>,
    /// The entry with the strictly highest present score, if any has one.
    pub winner: Option<AnalysisResult>,
}

/// Macro/micronutrient breakdown for chart rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionBreakdown {
    /// Calories, fat, protein, and carbohydrate (estimated when absent).
    pub macronutrients: Vec<(String, f64)>,
    /// Secondary nutrients worth charting.
    pub other_nutrients: Vec<(String, f64)>,
}

/// Orchestrates diet classification, feature completion, and scoring.
pub struct NutriAnalyzer {
    classifier: DietClassifier,
    completer: FeatureCompleter,
    model: HealthScoreModel,
}

impl NutriAnalyzer {
    /// Create an analyzer around an already-loaded (or untrained) model.
    pub fn new(model: HealthScoreModel) -> Self {
        Self {
            classifier: DietClassifier::new(),
            completer: FeatureCompleter::new(),
            model,
        }
    }

    /// Create an analyzer with no scoring capability.
    pub fn untrained() -> Self {
        Self::new(HealthScoreModel::default())
    }

    /// Create an analyzer from a persisted model artifact.
    ///
    /// A missing artifact file falls back to the untrained state (the
    /// analyzer then reports "insufficient data" instead of scores); a
    /// present but corrupt artifact is a hard error.
    pub fn with_artifact(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::untrained());
        }
        Ok(Self::new(HealthScoreModel::load(path)?))
    }

    /// Whether the underlying model can produce scores.
    pub fn can_score(&self) -> bool {
        self.model.is_trained()
    }

    /// The underlying health-score model.
    pub fn model(&self) -> &HealthScoreModel {
        &self.model
    }

    /// Analyze one product.
    ///
    /// Never fails: sub-analysis errors are captured inside the result.
    pub fn analyze(&self, input: &ProductInput) -> AnalysisResult {
        let has_text = !(input.name.trim().is_empty()
            && input.categories.trim().is_empty()
            && input.ingredients.trim().is_empty());
        let status = if has_text || !input.nutrition.is_empty() {
            AnalysisStatus::Success
        } else {
            AnalysisStatus::NothingToAnalyze
        };

        let diet = self
            .classifier
            .classify(
                &input.name,
                &input.categories,
                &input.ingredients,
                input.jain_mode,
            )
            .unwrap_or_else(|e| DietClassification::unknown(format!("Classification error: {e}")));

        let health = if input.nutrition.is_empty() || !self.model.is_trained() {
            HealthAssessment::insufficient_data()
        } else {
            let completed = self.completer.complete(&input.nutrition);
            match self.model.predict(&completed) {
                Ok(score) => HealthAssessment {
                    score: Some(score),
                    rating: HealthScoreModel::rating(score),
                    nutrition: Some(completed),
                    error: None,
                },
                Err(e) => HealthAssessment {
                    score: None,
                    rating: HealthRating::Unknown,
                    nutrition: Some(completed),
                    error: Some(e.to_string()),
                },
            }
        };

        let suggestions = build_suggestions(&diet, &health);

        AnalysisResult {
            product_name: input.name.clone(),
            status,
            diet,
            health,
            suggestions,
        }
    }

    /// Analyze a batch of products and pick the winner by health score.
    ///
    /// Requires at least two products. The winner is the entry with the
    /// strictly highest present score; when no entry has a score, no
    /// winner is designated.
    pub fn compare(&self, inputs: &[ProductInput]) -> Result<ComparisonResult> {
        if inputs.len() < 2 {
            return Err(NutriScanError::invalid_argument(
                "need at least 2 products to compare",
            ));
        }

        let products: Vec<AnalysisResult> = inputs.iter().map(|p| self.analyze(p)).collect();

        let mut winner: Option<&AnalysisResult> = None;
        for product in &products {
            if let Some(score) = product.health.score {
                let beats = winner
                    .and_then(|w| w.health.score)
                    .is_none_or(|best| score > best);
                if beats {
                    winner = Some(product);
                }
            }
        }

        Ok(ComparisonResult {
            winner: winner.cloned(),
            products,
        })
    }

    /// Break sparse nutrition facts into chartable macro/micro groups.
    ///
    /// Carbohydrate is estimated from the calorie remainder (4 kcal/g)
    /// when absent and calories are present.
    pub fn nutrition_breakdown(&self, facts: &NutritionFacts) -> NutritionBreakdown {
        let calories = facts.get(NutrientAttr::Calories).unwrap_or(0.0);
        let fat = facts.get(NutrientAttr::TotalFat).unwrap_or(0.0);
        let protein = facts.get(NutrientAttr::Protein).unwrap_or(0.0);
        let mut carbs = facts.get(NutrientAttr::Carbohydrate).unwrap_or(0.0);

        if carbs == 0.0 && calories > 0.0 {
            let remainder = calories - fat * 9.0 - protein * 4.0;
            carbs = (remainder / 4.0).max(0.0);
        }

        NutritionBreakdown {
            macronutrients: vec![
                ("Calories".to_string(), calories),
                ("Fat".to_string(), fat),
                ("Protein".to_string(), protein),
                ("Carbohydrates".to_string(), carbs),
            ],
            other_nutrients: vec![
                ("Sugar".to_string(), facts.get(NutrientAttr::Sugar).unwrap_or(0.0)),
                ("Sodium".to_string(), facts.get(NutrientAttr::Sodium).unwrap_or(0.0)),
                (
                    "Saturated Fat".to_string(),
                    facts.get(NutrientAttr::SaturatedFat).unwrap_or(0.0),
                ),
                ("Calcium".to_string(), facts.get(NutrientAttr::Calcium).unwrap_or(0.0)),
                ("Iron".to_string(), facts.get(NutrientAttr::Iron).unwrap_or(0.0)),
                ("Vitamin C".to_string(), facts.get(NutrientAttr::VitaminC).unwrap_or(0.0)),
            ],
        }
    }
}

/// Build the suggestion list in fixed rule order: diet-tier advice,
/// then score-band advice, then nutrient-threshold rules against the
/// completed vector. Truncated to the first five entries; callers rely
/// on this order and cap.
fn build_suggestions(diet: &DietClassification, health: &HealthAssessment) -> Vec<String> {
    let mut suggestions = Vec::new();

    match diet.label {
        DietLabel::PureVegetarian => {
            suggestions.push("Great choice for plant-based eating".to_string());
            suggestions
                .push("Consider pairing with protein-rich legumes or nuts".to_string());
        }
        DietLabel::Vegetarian => {
            suggestions.push("Contains dairy - a good source of complete proteins".to_string());
            suggestions.push("Add more vegetables for balanced nutrition".to_string());
        }
        DietLabel::NonVegetarian => {
            suggestions.push("Contains animal products - ensure portion control".to_string());
            suggestions.push("Balance with plant-based sides for fiber".to_string());
        }
        DietLabel::Unknown => {}
    }

    if let Some(score) = health.score {
        let advice = match HealthScoreModel::rating(score) {
            HealthRating::Excellent => "Excellent nutritional profile",
            HealthRating::Good => "Good nutritional choice",
            HealthRating::Ok => "Moderate nutrition - consume in moderation",
            _ => "Consider healthier alternatives",
        };
        suggestions.push(advice.to_string());
    }

    if let Some(nutrition) = &health.nutrition {
        if nutrition.get(NutrientAttr::Sugar) > 15.0 {
            suggestions.push("High in sugar - limit portion size".to_string());
        }
        if nutrition.get(NutrientAttr::Sodium) > 500.0 {
            suggestions.push("High sodium content - drink plenty of water".to_string());
        }
        if nutrition.get(NutrientAttr::SaturatedFat) > 5.0 {
            suggestions.push("High saturated fat - choose lean alternatives".to_string());
        }
        if nutrition.get(NutrientAttr::Protein) > 15.0 {
            suggestions.push("Good protein source".to_string());
        }
        if nutrition.get(NutrientAttr::VitaminC) > 30.0 {
            suggestions.push("Rich in vitamin C - great for immunity".to_string());
        }
        if nutrition.get(NutrientAttr::Calcium) > 150.0 {
            suggestions.push("Good source of calcium for bone health".to_string());
        }
    }

    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, ingredients: &str, nutrition: NutritionFacts) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            ingredients: ingredients.to_string(),
            nutrition,
            ..ProductInput::default()
        }
    }

    #[test]
    fn test_empty_input_does_not_fail() {
        let analyzer = NutriAnalyzer::untrained();
        let result = analyzer.analyze(&ProductInput::default());

        assert_eq!(result.status, AnalysisStatus::NothingToAnalyze);
        assert_eq!(result.diet.label, DietLabel::Unknown);
        assert_eq!(result.diet.confidence, 0.0);
        assert_eq!(result.health.score, None);
        assert_eq!(result.health.rating, HealthRating::InsufficientData);
    }

    #[test]
    fn test_untrained_model_reports_insufficient_data() {
        let analyzer = NutriAnalyzer::untrained();
        let facts = NutritionFacts::new().with(NutrientAttr::Calories, 250.0);
        let result = analyzer.analyze(&input("Biscuits", "wheat flour, sugar", facts));

        assert_eq!(result.status, AnalysisStatus::Success);
        assert_eq!(result.health.score, None);
        assert_eq!(result.health.rating, HealthRating::InsufficientData);
        // Diet classification still ran.
        assert_eq!(result.diet.label, DietLabel::PureVegetarian);
    }

    #[test]
    fn test_no_nutrition_means_no_scoring_attempt() {
        let analyzer = NutriAnalyzer::untrained();
        let result = analyzer.analyze(&input("Dal", "toor dal, turmeric", NutritionFacts::new()));
        assert_eq!(result.health.rating, HealthRating::InsufficientData);
        assert!(result.health.nutrition.is_none());
    }

    #[test]
    fn test_compare_requires_two_products() {
        let analyzer = NutriAnalyzer::untrained();
        let err = analyzer
            .compare(&[input("Solo", "rice", NutritionFacts::new())])
            .unwrap_err();
        assert!(matches!(err, NutriScanError::InvalidArgument(_)));
        assert!(err.to_string().contains("at least 2"));
    }

    #[test]
    fn test_compare_without_scores_has_no_winner() {
        let analyzer = NutriAnalyzer::untrained();
        let result = analyzer
            .compare(&[
                input("A", "rice", NutritionFacts::new()),
                input("B", "wheat", NutritionFacts::new()),
            ])
            .unwrap();
        assert_eq!(result.products.len(), 2);
        assert!(result.winner.is_none());
    }

    #[test]
    fn test_suggestion_order_and_cap() {
        // Trigger every rule family: diet advice, score band, and all six
        // nutrient rules; the list must stay at five, in rule order.
        let diet = DietClassification {
            label: DietLabel::NonVegetarian,
            confidence: 0.95,
            reason: String::new(),
        };
        let completer = FeatureCompleter::new();
        let facts = NutritionFacts::new()
            .with(NutrientAttr::Sugar, 20.0)
            .with(NutrientAttr::Sodium, 800.0)
            .with(NutrientAttr::SaturatedFat, 8.0)
            .with(NutrientAttr::Protein, 20.0)
            .with(NutrientAttr::VitaminC, 50.0)
            .with(NutrientAttr::Calcium, 200.0);
        let health = HealthAssessment {
            score: Some(50.0),
            rating: HealthRating::Ok,
            nutrition: Some(completer.complete(&facts)),
            error: None,
        };

        let suggestions = build_suggestions(&diet, &health);
        assert_eq!(suggestions.len(), MAX_SUGGESTIONS);
        assert_eq!(suggestions[0], "Contains animal products - ensure portion control");
        assert_eq!(suggestions[1], "Balance with plant-based sides for fiber");
        assert_eq!(suggestions[2], "Moderate nutrition - consume in moderation");
        assert_eq!(suggestions[3], "High in sugar - limit portion size");
        assert_eq!(suggestions[4], "High sodium content - drink plenty of water");
    }

    #[test]
    fn test_unknown_diet_gets_no_diet_advice() {
        let diet = DietClassification::unknown("no info");
        let health = HealthAssessment::insufficient_data();
        assert!(build_suggestions(&diet, &health).is_empty());
    }

    #[test]
    fn test_breakdown_estimates_carbs() {
        let analyzer = NutriAnalyzer::untrained();
        let facts = NutritionFacts::new()
            .with(NutrientAttr::Calories, 200.0)
            .with(NutrientAttr::TotalFat, 10.0)
            .with(NutrientAttr::Protein, 5.0);
        let breakdown = analyzer.nutrition_breakdown(&facts);

        // 200 kcal - 90 fat kcal - 20 protein kcal = 90 kcal -> 22.5 g.
        let carbs = breakdown
            .macronutrients
            .iter()
            .find(|(name, _)| name == "Carbohydrates")
            .map(|(_, v)| *v)
            .unwrap();
        assert!((carbs - 22.5).abs() < 1e-9);
    }
}
