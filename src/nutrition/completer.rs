//! Default-fill completion of sparse nutrition facts.
//!
//! Scoring requires a dense 13-attribute vector. The completer starts
//! from a fixed default vector representing a typical moderate packaged
//! product and overwrites every attribute the caller actually provided.
//! No magnitude validation happens here; range validation belongs to the
//! producing collaborator.

use crate::nutrition::attribute::{NUM_ATTRS, NutrientAttr};
use crate::nutrition::facts::{NutritionFacts, NutritionVector};

/// Default values for a "typical moderate" product, per 100 g, in
/// canonical attribute order (see [`NutrientAttr::ALL`]).
const DEFAULT_VALUES: [f64; NUM_ATTRS] = [
    200.0, // Calories (kcal)
    8.0,   // Protein (g)
    5.0,   // TotalFat (g)
    25.0,  // Carbohydrate (g)
    300.0, // Sodium (mg)
    2.0,   // SaturatedFat (g)
    5.0,   // Sugar (g)
    50.0,  // Calcium (mg)
    2.0,   // Iron (mg)
    200.0, // Potassium (mg)
    5.0,   // VitaminC (mg)
    1.0,   // VitaminE (mg)
    0.0,   // VitaminD (µg)
];

/// Completes sparse nutrition facts into a dense feature vector.
#[derive(Debug, Clone, Default)]
pub struct FeatureCompleter;

impl FeatureCompleter {
    /// Create a new feature completer.
    pub fn new() -> Self {
        Self
    }

    /// The default dense vector used as the completion baseline.
    pub fn default_vector(&self) -> NutritionVector {
        NutritionVector::from_values(DEFAULT_VALUES)
    }

    /// Fill a sparse mapping into a dense vector.
    ///
    /// Every provided attribute overwrites its default; completion is
    /// idempotent over the provided keys.
    pub fn complete(&self, facts: &NutritionFacts) -> NutritionVector {
        let mut values = DEFAULT_VALUES;
        for (attr, value) in facts.iter() {
            values[attr.index()] = value;
        }
        NutritionVector::from_values(values)
    }
}
