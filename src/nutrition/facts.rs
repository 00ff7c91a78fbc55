//! Sparse and dense nutrition vector types.
//!
//! [`NutritionFacts`] is the sparse caller-facing mapping: only the
//! attributes a label or collaborator actually provided. A dense
//! [`NutritionVector`] carries all 13 attributes and is only produced by
//! the feature completer, the reference dataset loader, or
//! deserialization — the two representations never share a type, so
//! nothing can accidentally treat "absent" as zero.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::nutrition::attribute::{NUM_ATTRS, NutrientAttr};

/// Sparse nutrition facts: only explicitly provided attributes.
///
/// Values are per 100 g in the canonical units of [`NutrientAttr`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NutritionFacts {
    values: BTreeMap<NutrientAttr, f64>,
}

impl NutritionFacts {
    /// Create empty nutrition facts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute value, returning `self` for chaining.
    pub fn with(mut self, attr: NutrientAttr, value: f64) -> Self {
        self.values.insert(attr, value);
        self
    }

    /// Set an attribute value.
    pub fn set(&mut self, attr: NutrientAttr, value: f64) {
        self.values.insert(attr, value);
    }

    /// Get an attribute value, if provided.
    pub fn get(&self, attr: NutrientAttr) -> Option<f64> {
        self.values.get(&attr).copied()
    }

    /// Whether no attribute was provided at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of provided attributes.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Iterate over provided attributes in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (NutrientAttr, f64)> + '_ {
        self.values.iter().map(|(a, v)| (*a, *v))
    }
}

impl FromIterator<(NutrientAttr, f64)> for NutritionFacts {
    fn from_iter<I: IntoIterator<Item = (NutrientAttr, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Dense nutrition vector: all 13 attributes present, canonical order.
///
/// Immutable once produced; scorers read it, never modify it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionVector {
    values: [f64; NUM_ATTRS],
}

impl NutritionVector {
    /// Build a vector from values in canonical attribute order.
    ///
    /// Only the completer and the dataset loader construct vectors; the
    /// crate-internal visibility keeps the sparse/dense split honest.
    pub(crate) fn from_values(values: [f64; NUM_ATTRS]) -> Self {
        Self { values }
    }

    /// Get the value for an attribute.
    pub fn get(&self, attr: NutrientAttr) -> f64 {
        self.values[attr.index()]
    }

    /// The raw values in canonical attribute order.
    pub fn as_array(&self) -> &[f64; NUM_ATTRS] {
        &self.values
    }

    /// Iterate over (attribute, value) pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (NutrientAttr, f64)> + '_ {
        NutrientAttr::ALL.iter().map(|a| (*a, self.get(*a)))
    }

    /// Convert back to a (fully populated) sparse representation.
    pub fn to_facts(&self) -> NutritionFacts {
        self.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_absent_is_none() {
        let facts = NutritionFacts::new().with(NutrientAttr::Protein, 12.0);
        assert_eq!(facts.get(NutrientAttr::Protein), Some(12.0));
        assert_eq!(facts.get(NutrientAttr::Sugar), None);
        assert!(!facts.is_empty());
        assert_eq!(facts.len(), 1);
    }

    #[test]
    fn test_dense_vector_access() {
        let mut values = [0.0; NUM_ATTRS];
        values[NutrientAttr::Calories.index()] = 165.0;
        values[NutrientAttr::Protein.index()] = 31.0;
        let vector = NutritionVector::from_values(values);

        assert_eq!(vector.get(NutrientAttr::Calories), 165.0);
        assert_eq!(vector.get(NutrientAttr::Protein), 31.0);
        assert_eq!(vector.get(NutrientAttr::Sugar), 0.0);
        assert_eq!(vector.iter().count(), NUM_ATTRS);
    }

    #[test]
    fn test_facts_json_round_trip() {
        let facts = NutritionFacts::new()
            .with(NutrientAttr::Calories, 165.0)
            .with(NutrientAttr::Sodium, 74.0);
        let json = serde_json::to_string(&facts).unwrap();
        assert!(json.contains("\"Calories\""));
        let back: NutritionFacts = serde_json::from_str(&json).unwrap();
        assert_eq!(back, facts);
    }
}
