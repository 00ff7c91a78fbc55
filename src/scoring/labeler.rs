//! Heuristic health-score labeler.
//!
//! Converts a dense nutrition vector into a 0-100 score with a
//! deterministic additive point system: start at 50, adjust per nutrient
//! band, clamp to [0, 100]. This is the ground-truth generator for
//! supervised training only — inference goes through the trained model
//! and never calls this function.

use crate::nutrition::attribute::NutrientAttr;
use crate::nutrition::facts::NutritionVector;

/// Base score before any nutrient adjustment.
const BASE_SCORE: f64 = 50.0;

/// Compute the heuristic 0-100 health label for a dense vector.
///
/// Band thresholds are in the canonical units of [`NutrientAttr`]
/// (sodium, calcium, iron, potassium, and vitamin C in mg per 100 g).
pub fn heuristic_label(vector: &NutritionVector) -> f64 {
    let mut score = BASE_SCORE;

    // Calories: moderate is better.
    let calories = vector.get(NutrientAttr::Calories);
    if calories <= 100.0 {
        score += 15.0;
    } else if calories <= 200.0 {
        score += 10.0;
    } else if calories <= 300.0 {
        score += 5.0;
    } else if calories > 500.0 {
        score -= 15.0;
    }

    // Protein: higher is better.
    let protein = vector.get(NutrientAttr::Protein);
    if protein >= 20.0 {
        score += 15.0;
    } else if protein >= 10.0 {
        score += 10.0;
    } else if protein >= 5.0 {
        score += 5.0;
    }

    // Total fat: moderate is better.
    let fat = vector.get(NutrientAttr::TotalFat);
    if fat <= 3.0 {
        score += 10.0;
    } else if fat <= 10.0 {
        score += 5.0;
    } else if fat > 30.0 {
        score -= 15.0;
    }

    // Saturated fat: lower is better.
    let sat_fat = vector.get(NutrientAttr::SaturatedFat);
    if sat_fat <= 1.0 {
        score += 10.0;
    } else if sat_fat <= 5.0 {
        score += 5.0;
    } else if sat_fat > 10.0 {
        score -= 15.0;
    }

    // Sugar: lower is better.
    let sugar = vector.get(NutrientAttr::Sugar);
    if sugar <= 2.0 {
        score += 10.0;
    } else if sugar <= 10.0 {
        score += 5.0;
    } else if sugar > 25.0 {
        score -= 15.0;
    }

    // Sodium (mg): lower is better.
    let sodium = vector.get(NutrientAttr::Sodium);
    if sodium <= 100.0 {
        score += 10.0;
    } else if sodium <= 300.0 {
        score += 5.0;
    } else if sodium > 1000.0 {
        score -= 15.0;
    }

    // Micronutrients: positive-only bonuses.
    let vitamin_c = vector.get(NutrientAttr::VitaminC);
    if vitamin_c >= 50.0 {
        score += 10.0;
    } else if vitamin_c >= 10.0 {
        score += 5.0;
    }

    let calcium = vector.get(NutrientAttr::Calcium);
    if calcium >= 200.0 {
        score += 8.0;
    } else if calcium >= 100.0 {
        score += 4.0;
    }

    let iron = vector.get(NutrientAttr::Iron);
    if iron >= 5.0 {
        score += 8.0;
    } else if iron >= 2.0 {
        score += 4.0;
    }

    let potassium = vector.get(NutrientAttr::Potassium);
    if potassium >= 300.0 {
        score += 8.0;
    } else if potassium >= 150.0 {
        score += 4.0;
    }

    score.clamp(0.0, 100.0)
}
