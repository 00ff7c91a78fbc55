//! The trained health-scoring model.
//!
//! A seeded random-forest regressor over scaled nutrition features,
//! trained against heuristic labels (see [`crate::scoring::labeler`]).
//! The model is a one-way `Untrained -> Trained` state machine:
//! prediction before training fails with `ModelNotTrained`, and a
//! training run replaces the fitted state wholesale. The fitted forest,
//! scaler, and preprocessing statistics persist together as one artifact
//! so they can never load out of step with each other.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::{NutriScanError, Result};
use crate::nutrition::attribute::{NUM_ATTRS, NutrientAttr};
use crate::nutrition::facts::NutritionVector;
use crate::scoring::dataset::ReferenceDataset;
use crate::scoring::forest::RandomForestRegressor;
use crate::scoring::labeler::heuristic_label;
use crate::scoring::scaler::StandardScaler;

/// Artifact file magic bytes.
const ARTIFACT_MAGIC: [u8; 8] = *b"NUTRISCN";

/// Artifact format version; bumped on any incompatible layout change.
const ARTIFACT_VERSION: u32 = 1;

/// Hyperparameters and training policy for the health-score model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Number of trees in the forest.
    pub n_trees: usize,
    /// Maximum tree depth.
    pub max_depth: usize,
    /// Minimum samples required to split a node.
    pub min_samples_split: usize,
    /// Held-out evaluation fraction in (0, 1).
    pub test_split: f64,
    /// Seed for the row split and per-tree bootstrap sampling.
    pub seed: u64,
    /// Minimum usable rows required after cleaning.
    pub min_rows: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            n_trees: 60,
            max_depth: 12,
            min_samples_split: 5,
            test_split: 0.2,
            seed: 42,
            min_rows: 100,
        }
    }
}

/// Median-impute and 99th-percentile clip statistics, computed on the
/// training data and applied identically to every scored row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preprocessor {
    medians: [f64; NUM_ATTRS],
    caps: [f64; NUM_ATTRS],
}

impl Preprocessor {
    /// Compute statistics over complete feature rows.
    fn fit(rows: &[[f64; NUM_ATTRS]]) -> Preprocessor {
        let mut medians = [0.0; NUM_ATTRS];
        let mut caps = [0.0; NUM_ATTRS];
        for feature in 0..NUM_ATTRS {
            let mut values: Vec<f64> = rows
                .iter()
                .map(|row| row[feature])
                .filter(|v| v.is_finite())
                .collect();
            values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            medians[feature] = percentile(&values, 0.5);
            caps[feature] = percentile(&values, 0.99);
        }
        Preprocessor { medians, caps }
    }

    /// Impute non-finite values with the median, then clip at the cap.
    fn transform(&self, row: &mut [f64; NUM_ATTRS]) {
        for i in 0..NUM_ATTRS {
            if !row[i].is_finite() {
                row[i] = self.medians[i];
            }
            if row[i] > self.caps[i] {
                row[i] = self.caps[i];
            }
        }
    }
}

/// Linear-interpolated percentile of sorted values; 0.0 when empty.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = p * (sorted.len() - 1) as f64;
    let low = rank.floor() as usize;
    let high = rank.ceil() as usize;
    let weight = rank - low as f64;
    sorted[low] * (1.0 - weight) + sorted[high] * weight
}

/// Descriptive rating bands over the 0-100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthRating {
    /// Score >= 80.
    Excellent,
    /// Score >= 65.
    Good,
    /// Score >= 45.
    Ok,
    /// Score < 45.
    Poor,
    /// Scoring failed for this product.
    Unknown,
    /// No nutrition data, or no trained model available.
    InsufficientData,
}

impl HealthRating {
    /// Human-readable rating text.
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthRating::Excellent => "Excellent",
            HealthRating::Good => "Good",
            HealthRating::Ok => "OK",
            HealthRating::Poor => "Poor",
            HealthRating::Unknown => "Unknown",
            HealthRating::InsufficientData => "Insufficient data",
        }
    }
}

impl std::fmt::Display for HealthRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Importance of one attribute in the fitted forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub attribute: NutrientAttr,
    pub importance: f64,
}

/// Evaluation summary of a training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Rows used for fitting.
    pub training_rows: usize,
    /// Rows held out for evaluation.
    pub test_rows: usize,
    /// Coefficient of determination on the held-out split.
    pub r2: f64,
    /// Root mean squared error on the held-out split.
    pub rmse: f64,
    /// Normalized impurity importance per attribute, highest first.
    pub feature_importance: Vec<FeatureImportance>,
}

/// Metadata stored with a trained artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// When training finished.
    pub trained_at: DateTime<Utc>,
    /// Rows used for fitting.
    pub training_rows: usize,
    /// Held-out R².
    pub r2: f64,
    /// Held-out RMSE.
    pub rmse: f64,
}

/// The fitted state: always saved and loaded as one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct TrainedState {
    preprocessor: Preprocessor,
    scaler: StandardScaler,
    forest: RandomForestRegressor,
    metadata: ModelMetadata,
}

/// On-disk artifact layout.
#[derive(Debug, Serialize, Deserialize)]
struct ModelArtifact {
    magic: [u8; 8],
    version: u32,
    config: ModelConfig,
    state: TrainedState,
}

/// The health-score regression model.
#[derive(Debug, Clone)]
pub struct HealthScoreModel {
    config: ModelConfig,
    state: Option<TrainedState>,
}

impl Default for HealthScoreModel {
    fn default() -> Self {
        Self::new(ModelConfig::default())
    }
}

impl HealthScoreModel {
    /// Create an untrained model with the given configuration.
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Whether the model has been trained or loaded.
    pub fn is_trained(&self) -> bool {
        self.state.is_some()
    }

    /// The model configuration.
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Metadata of the fitted state, if trained.
    pub fn metadata(&self) -> Option<&ModelMetadata> {
        self.state.as_ref().map(|s| &s.metadata)
    }

    /// Train on a reference dataset, replacing any previous fitted state.
    ///
    /// Rows missing any of the 13 attributes are dropped; remaining
    /// values are median-imputed for residual gaps and clipped at the
    /// per-attribute 99th percentile. Labels come from the heuristic
    /// labeler; a seeded split holds out `test_split` of the rows for
    /// the R²/RMSE evaluation. Fails without touching the current state
    /// when fewer than `min_rows` usable rows remain.
    pub fn train(&mut self, dataset: &ReferenceDataset) -> Result<TrainingReport> {
        if !(self.config.test_split > 0.0 && self.config.test_split < 1.0) {
            return Err(NutriScanError::invalid_argument(format!(
                "test_split must be in (0, 1), got {}",
                self.config.test_split
            )));
        }

        let complete: Vec<[f64; NUM_ATTRS]> = dataset
            .rows()
            .iter()
            .filter_map(|row| row.complete_values())
            .collect();
        if complete.len() < self.config.min_rows {
            return Err(NutriScanError::InsufficientTrainingData {
                min_rows: self.config.min_rows,
                actual: complete.len(),
            });
        }

        // Labels are computed from the raw values; preprocessing applies
        // to the features only.
        let labels: Vec<f64> = complete
            .iter()
            .map(|values| heuristic_label(&NutritionVector::from_values(*values)))
            .collect();

        let preprocessor = Preprocessor::fit(&complete);
        let features: Vec<[f64; NUM_ATTRS]> = complete
            .iter()
            .map(|row| {
                let mut processed = *row;
                preprocessor.transform(&mut processed);
                processed
            })
            .collect();

        let mut indices: Vec<usize> = (0..features.len()).collect();
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        indices.shuffle(&mut rng);
        let test_len = ((features.len() as f64 * self.config.test_split).round() as usize)
            .clamp(1, features.len() - 1);
        let (test_idx, train_idx) = indices.split_at(test_len);

        let train_features: Vec<[f64; NUM_ATTRS]> =
            train_idx.iter().map(|&i| features[i]).collect();
        let train_labels: Vec<f64> = train_idx.iter().map(|&i| labels[i]).collect();

        let scaler = StandardScaler::fit(&train_features)?;
        let train_scaled = scaler.transform_all(&train_features);

        let (forest, importance) = RandomForestRegressor::fit(
            &train_scaled,
            &train_labels,
            self.config.n_trees,
            self.config.max_depth,
            self.config.min_samples_split,
            self.config.seed,
        )?;

        // Evaluate on the held-out split.
        let test_labels: Vec<f64> = test_idx.iter().map(|&i| labels[i]).collect();
        let predictions: Vec<f64> = test_idx
            .iter()
            .map(|&i| {
                let mut row = features[i];
                scaler.transform(&mut row);
                forest.predict(&row)
            })
            .collect();
        let (r2, rmse) = evaluate(&test_labels, &predictions);

        let mut feature_importance: Vec<FeatureImportance> = NutrientAttr::ALL
            .iter()
            .map(|attr| FeatureImportance {
                attribute: *attr,
                importance: importance[attr.index()],
            })
            .collect();
        feature_importance.sort_by(|a, b| {
            b.importance
                .partial_cmp(&a.importance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        self.state = Some(TrainedState {
            preprocessor,
            scaler,
            forest,
            metadata: ModelMetadata {
                trained_at: Utc::now(),
                training_rows: train_idx.len(),
                r2,
                rmse,
            },
        });

        Ok(TrainingReport {
            training_rows: train_idx.len(),
            test_rows: test_idx.len(),
            r2,
            rmse,
            feature_importance,
        })
    }

    /// Predict the health score for a dense nutrition vector.
    ///
    /// Applies the same median-impute-then-clip preprocessing as
    /// training, scales with the fitted scaler, and clamps the forest
    /// output to [0, 100]. Deterministic for identical inputs against
    /// the same artifact.
    pub fn predict(&self, vector: &NutritionVector) -> Result<f64> {
        let state = self.state.as_ref().ok_or_else(|| {
            NutriScanError::not_trained("train the model or load an artifact before predicting")
        })?;

        let mut row = *vector.as_array();
        state.preprocessor.transform(&mut row);
        state.scaler.transform(&mut row);
        Ok(state.forest.predict(&row).clamp(0.0, 100.0))
    }

    /// Map a score to its rating band.
    pub fn rating(score: f64) -> HealthRating {
        if score >= 80.0 {
            HealthRating::Excellent
        } else if score >= 65.0 {
            HealthRating::Good
        } else if score >= 45.0 {
            HealthRating::Ok
        } else {
            HealthRating::Poor
        }
    }

    /// Persist the fitted model and scaler as one artifact file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let state = self.state.as_ref().ok_or_else(|| {
            NutriScanError::not_trained("cannot save an untrained model")
        })?;

        let artifact = ModelArtifact {
            magic: ARTIFACT_MAGIC,
            version: ARTIFACT_VERSION,
            config: self.config.clone(),
            state: state.clone(),
        };
        let bytes = bincode::serialize(&artifact)
            .map_err(|e| NutriScanError::serialization(format!("artifact encoding failed: {e}")))?;
        fs::write(path, bytes)?;
        Ok(())
    }

    /// Load a fitted model and scaler from an artifact file.
    ///
    /// A missing, truncated, or version-mismatched artifact fails
    /// loudly; the model never operates on a partial pair.
    pub fn load(path: &Path) -> Result<HealthScoreModel> {
        let bytes = fs::read(path).map_err(|e| {
            NutriScanError::artifact(format!("cannot read artifact {}: {e}", path.display()))
        })?;
        let artifact: ModelArtifact = bincode::deserialize(&bytes).map_err(|e| {
            NutriScanError::artifact(format!("corrupt artifact {}: {e}", path.display()))
        })?;

        if artifact.magic != ARTIFACT_MAGIC {
            return Err(NutriScanError::artifact(format!(
                "{} is not a NutriScan model artifact",
                path.display()
            )));
        }
        if artifact.version != ARTIFACT_VERSION {
            return Err(NutriScanError::artifact(format!(
                "unsupported artifact version {} (expected {})",
                artifact.version, ARTIFACT_VERSION
            )));
        }

        Ok(HealthScoreModel {
            config: artifact.config,
            state: Some(artifact.state),
        })
    }
}

/// R² and RMSE of predictions against true labels.
fn evaluate(labels: &[f64], predictions: &[f64]) -> (f64, f64) {
    let n = labels.len() as f64;
    let mean = labels.iter().sum::<f64>() / n;
    let ss_res: f64 = labels
        .iter()
        .zip(predictions.iter())
        .map(|(y, p)| (y - p).powi(2))
        .sum();
    let ss_tot: f64 = labels.iter().map(|y| (y - mean).powi(2)).sum();
    let r2 = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 0.0 };
    (r2, (ss_res / n).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::completer::FeatureCompleter;
    use crate::nutrition::facts::NutritionFacts;
    use crate::scoring::dataset::ReferenceRow;

    /// Deterministic synthetic reference dataset spanning the feature space.
    pub(crate) fn synthetic_dataset(n: usize) -> ReferenceDataset {
        use rand::Rng;
        let mut rng = StdRng::seed_from_u64(7);
        let mut rows = Vec::with_capacity(n);
        for i in 0..n {
            let values = [
                rng.random_range(20.0..700.0),  // Calories
                rng.random_range(0.0..40.0),    // Protein
                rng.random_range(0.0..40.0),    // TotalFat
                rng.random_range(0.0..80.0),    // Carbohydrate
                rng.random_range(0.0..1500.0),  // Sodium
                rng.random_range(0.0..15.0),    // SaturatedFat
                rng.random_range(0.0..40.0),    // Sugar
                rng.random_range(0.0..400.0),   // Calcium
                rng.random_range(0.0..10.0),    // Iron
                rng.random_range(0.0..600.0),   // Potassium
                rng.random_range(0.0..80.0),    // VitaminC
                rng.random_range(0.0..5.0),     // VitaminE
                rng.random_range(0.0..3.0),     // VitaminD
            ];
            rows.push(ReferenceRow::new(
                format!("synthetic item {i}"),
                values.map(Some),
            ));
        }
        ReferenceDataset::from_rows(rows)
    }

    #[test]
    fn test_predict_before_training_fails() {
        let model = HealthScoreModel::default();
        let vector = FeatureCompleter::new().complete(&NutritionFacts::new());
        let err = model.predict(&vector).unwrap_err();
        assert!(matches!(err, NutriScanError::ModelNotTrained { .. }));
    }

    #[test]
    fn test_insufficient_rows_is_a_hard_error() {
        let mut model = HealthScoreModel::default();
        let err = model.train(&synthetic_dataset(50)).unwrap_err();
        assert!(matches!(
            err,
            NutriScanError::InsufficientTrainingData { min_rows: 100, actual: 50 }
        ));
        assert!(!model.is_trained());
    }

    #[test]
    fn test_train_and_predict() {
        let mut model = HealthScoreModel::default();
        let report = model.train(&synthetic_dataset(400)).unwrap();
        assert!(model.is_trained());
        assert_eq!(report.training_rows + report.test_rows, 400);
        assert!(report.r2 > 0.4, "r2 too low: {}", report.r2);
        assert!(report.rmse < 18.0, "rmse too high: {}", report.rmse);
        assert_eq!(report.feature_importance.len(), NUM_ATTRS);

        let vector = FeatureCompleter::new().complete(
            &NutritionFacts::new()
                .with(NutrientAttr::Calories, 165.0)
                .with(NutrientAttr::Protein, 31.0),
        );
        let score = model.predict(&vector).unwrap();
        assert!((0.0..=100.0).contains(&score));
    }

    #[test]
    fn test_predict_is_deterministic() {
        let mut model = HealthScoreModel::default();
        model.train(&synthetic_dataset(200)).unwrap();
        let vector = FeatureCompleter::new().complete(&NutritionFacts::new());
        let a = model.predict(&vector).unwrap();
        let b = model.predict(&vector).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_outliers_cannot_explode_the_score() {
        let mut model = HealthScoreModel::default();
        model.train(&synthetic_dataset(200)).unwrap();
        let vector = FeatureCompleter::new().complete(
            &NutritionFacts::new()
                .with(NutrientAttr::Calories, 1.0e9)
                .with(NutrientAttr::Sodium, 1.0e12)
                .with(NutrientAttr::Protein, 1.0e6),
        );
        let score = model.predict(&vector).unwrap();
        assert!((0.0..=100.0).contains(&score));
    }

    #[test]
    fn test_rating_bands() {
        assert_eq!(HealthScoreModel::rating(92.0), HealthRating::Excellent);
        assert_eq!(HealthScoreModel::rating(80.0), HealthRating::Excellent);
        assert_eq!(HealthScoreModel::rating(70.0), HealthRating::Good);
        assert_eq!(HealthScoreModel::rating(50.0), HealthRating::Ok);
        assert_eq!(HealthScoreModel::rating(44.9), HealthRating::Poor);
        assert_eq!(HealthScoreModel::rating(0.0), HealthRating::Poor);
    }

    #[test]
    fn test_save_requires_training() {
        let model = HealthScoreModel::default();
        let dir = tempfile::tempdir().unwrap();
        let err = model.save(&dir.path().join("model.bin")).unwrap_err();
        assert!(matches!(err, NutriScanError::ModelNotTrained { .. }));
    }

    #[test]
    fn test_artifact_round_trip_preserves_predictions() {
        let mut model = HealthScoreModel::default();
        model.train(&synthetic_dataset(200)).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");
        model.save(&path).unwrap();
        let loaded = HealthScoreModel::load(&path).unwrap();
        assert!(loaded.is_trained());

        let vector = FeatureCompleter::new().complete(
            &NutritionFacts::new()
                .with(NutrientAttr::Calories, 120.0)
                .with(NutrientAttr::Sugar, 22.0),
        );
        let before = model.predict(&vector).unwrap();
        let after = loaded.predict(&vector).unwrap();
        assert_eq!(before.to_bits(), after.to_bits());
    }

    #[test]
    fn test_corrupt_artifact_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");

        // Missing file.
        assert!(matches!(
            HealthScoreModel::load(&path).unwrap_err(),
            NutriScanError::Artifact(_)
        ));

        // Truncated file.
        std::fs::write(&path, b"NUTRISCN").unwrap();
        assert!(matches!(
            HealthScoreModel::load(&path).unwrap_err(),
            NutriScanError::Artifact(_)
        ));

        // Wrong magic.
        std::fs::write(&path, vec![0u8; 256]).unwrap();
        assert!(HealthScoreModel::load(&path).is_err());
    }
}
