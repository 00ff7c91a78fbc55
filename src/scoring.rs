//! Health scoring for NutriScan.
//!
//! Training-time label synthesis, feature preprocessing, and the
//! regression model. The heuristic labeler generates 0-100 targets from
//! a reference nutrition dataset; the random-forest model learns to
//! approximate it from raw nutrient values and is the only scoring path
//! at inference time. The fitted model and its feature scaler persist
//! together as one artifact.

pub mod dataset;
pub mod forest;
pub mod labeler;
pub mod model;
pub mod scaler;
