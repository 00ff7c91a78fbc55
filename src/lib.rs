//! # NutriScan
//!
//! A nutrition analysis engine for packaged food products: rule-based
//! diet classification (vegan / vegetarian / non-vegetarian under Indian
//! dietary conventions) and machine-learned health scoring from sparse
//! nutrition-facts data.
//!
//! ## Features
//!
//! - Tiered keyword taxonomy with word-boundary matching and
//!   first-match-wins priority resolution
//! - Sparse-to-dense nutrition vector completion over the 13 canonical
//!   nutrient attributes
//! - Heuristic 0-100 label synthesis for supervised training
//! - Seeded random-forest regression with a standard scaler, persisted
//!   as a single matched artifact
//! - Orchestrated per-product analysis with ranked suggestions and
//!   batch comparison

pub mod analyzer;
pub mod cli;
pub mod diet;
pub mod error;
pub mod nutrition;
pub mod scoring;

/// Commonly used types, re-exported for convenience.
pub mod prelude {
    pub use crate::analyzer::{AnalysisResult, ComparisonResult, NutriAnalyzer, ProductInput};
    pub use crate::diet::classifier::{DietClassification, DietClassifier, DietLabel};
    pub use crate::error::{NutriScanError, Result};
    pub use crate::nutrition::attribute::NutrientAttr;
    pub use crate::nutrition::completer::FeatureCompleter;
    pub use crate::nutrition::facts::{NutritionFacts, NutritionVector};
    pub use crate::scoring::model::{HealthRating, HealthScoreModel, ModelConfig};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
