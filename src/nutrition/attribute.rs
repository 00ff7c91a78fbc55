//! The canonical nutrient attribute set.
//!
//! Every nutrition vector in the engine is keyed by these 13 attributes,
//! unit-normalized to "per 100 g of product". Canonical units are fixed
//! here and every producer converts at the boundary: kcal for
//! [`NutrientAttr::Calories`]; grams for protein, fats, carbohydrate and
//! sugar; milligrams for sodium, calcium, iron, potassium, vitamin C and
//! vitamin E; micrograms for vitamin D.

use serde::{Deserialize, Serialize};

use crate::error::{NutriScanError, Result};

/// Number of canonical nutrient attributes.
pub const NUM_ATTRS: usize = 13;

/// A canonical nutrient attribute, per 100 g of product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NutrientAttr {
    /// Energy in kcal.
    Calories,
    /// Protein in g.
    Protein,
    /// Total fat in g.
    TotalFat,
    /// Carbohydrate in g.
    Carbohydrate,
    /// Sodium in mg.
    Sodium,
    /// Saturated fat in g.
    SaturatedFat,
    /// Sugar in g.
    Sugar,
    /// Calcium in mg.
    Calcium,
    /// Iron in mg.
    Iron,
    /// Potassium in mg.
    Potassium,
    /// Vitamin C in mg.
    VitaminC,
    /// Vitamin E in mg.
    VitaminE,
    /// Vitamin D in µg.
    VitaminD,
}

impl NutrientAttr {
    /// All attributes in canonical declaration order.
    ///
    /// This order defines the layout of every dense feature vector and
    /// of the reference dataset columns.
    pub const ALL: [NutrientAttr; NUM_ATTRS] = [
        NutrientAttr::Calories,
        NutrientAttr::Protein,
        NutrientAttr::TotalFat,
        NutrientAttr::Carbohydrate,
        NutrientAttr::Sodium,
        NutrientAttr::SaturatedFat,
        NutrientAttr::Sugar,
        NutrientAttr::Calcium,
        NutrientAttr::Iron,
        NutrientAttr::Potassium,
        NutrientAttr::VitaminC,
        NutrientAttr::VitaminE,
        NutrientAttr::VitaminD,
    ];

    /// The canonical column/key name for this attribute.
    pub fn name(&self) -> &'static str {
        match self {
            NutrientAttr::Calories => "Calories",
            NutrientAttr::Protein => "Protein",
            NutrientAttr::TotalFat => "TotalFat",
            NutrientAttr::Carbohydrate => "Carbohydrate",
            NutrientAttr::Sodium => "Sodium",
            NutrientAttr::SaturatedFat => "SaturatedFat",
            NutrientAttr::Sugar => "Sugar",
            NutrientAttr::Calcium => "Calcium",
            NutrientAttr::Iron => "Iron",
            NutrientAttr::Potassium => "Potassium",
            NutrientAttr::VitaminC => "VitaminC",
            NutrientAttr::VitaminE => "VitaminE",
            NutrientAttr::VitaminD => "VitaminD",
        }
    }

    /// The measurement unit for this attribute (per 100 g).
    pub fn unit(&self) -> &'static str {
        match self {
            NutrientAttr::Calories => "kcal",
            NutrientAttr::Protein
            | NutrientAttr::TotalFat
            | NutrientAttr::Carbohydrate
            | NutrientAttr::SaturatedFat
            | NutrientAttr::Sugar => "g",
            NutrientAttr::Sodium
            | NutrientAttr::Calcium
            | NutrientAttr::Iron
            | NutrientAttr::Potassium
            | NutrientAttr::VitaminC
            | NutrientAttr::VitaminE => "mg",
            NutrientAttr::VitaminD => "µg",
        }
    }

    /// Position of this attribute in the canonical order.
    pub fn index(&self) -> usize {
        Self::ALL
            .iter()
            .position(|a| a == self)
            .unwrap_or_default()
    }

    /// Parse an attribute from its canonical name (case-insensitive).
    pub fn parse(name: &str) -> Result<NutrientAttr> {
        let lower = name.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.name().to_lowercase() == lower)
            .ok_or_else(|| {
                NutriScanError::invalid_argument(format!("unknown nutrient attribute: {name}"))
            })
    }
}

impl std::fmt::Display for NutrientAttr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
