//! Tiered keyword taxonomy for diet classification.
//!
//! Keywords are partitioned into diet tiers and matched in strict
//! priority order: non-vegetarian first, then vegetarian-only
//! (dairy/honey), then the optional Jain-restricted set, then explicit
//! plant-based markers. Each tier compiles once into a single
//! word-boundary regex over normalized text, so "egg" never matches
//! inside "eggplant".

use lazy_static::lazy_static;
use regex::Regex;

use serde::{Deserialize, Serialize};

/// A diet tier, in strict matching priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DietTier {
    /// Meat, fish/seafood, eggs (Indian convention), animal-derived additives.
    NonVegetarian,
    /// Dairy, honey and other bee products.
    VegetarianOnly,
    /// Root vegetables and alliums, restricted under Jain dietary rules.
    JainRestricted,
    /// Explicit plant-based/vegan markers and common plant ingredients.
    PlantBased,
}

/// Meat, fish, eggs, and other animal-derived ingredients.
const NON_VEG_KEYWORDS: &[&str] = &[
    // Meat products
    "beef", "pork", "chicken", "turkey", "duck", "lamb", "mutton", "veal",
    "ham", "bacon", "sausage", "pepperoni", "salami", "prosciutto",
    "meat", "poultry", "game", "venison", "goat", "buffalo",
    // Fish and seafood
    "fish", "salmon", "tuna", "cod", "mackerel", "sardine", "anchovy",
    "shrimp", "prawn", "lobster", "crab", "oyster", "mussel", "clam",
    "scallop", "squid", "octopus", "seafood", "caviar", "hilsa", "rohu",
    // Eggs (non-veg under the Indian convention)
    "egg", "eggs", "albumin", "egg white", "egg yolk", "whole egg",
    "egg powder", "dried egg", "liquid egg", "mayonnaise", "mayo",
    // Other animal products
    "gelatin", "gelatine", "carmine", "cochineal", "isinglass",
    "lard", "tallow", "suet", "rennet", "pepsin", "bone meal",
    // Animal fats
    "animal fat", "beef fat", "pork fat", "chicken fat", "fish oil",
    // Animal-derived additives
    "l-cysteine", "shellac", "lanolin", "stearic acid", "glycerin from animal",
];

/// Dairy, honey, and other ingredients allowed for vegetarians but not vegans.
const VEGETARIAN_KEYWORDS: &[&str] = &[
    // Dairy products
    "milk", "cream", "butter", "cheese", "yogurt", "yoghurt",
    "whey", "casein", "lactose", "dairy", "ghee", "paneer",
    "mozzarella", "cheddar", "parmesan", "feta", "ricotta",
    "condensed milk", "evaporated milk", "milk powder", "buttermilk",
    "khoya", "mawa", "rabri", "malai", "dahi", "lassi",
    // Honey and bee products
    "honey", "beeswax", "propolis", "royal jelly",
];

/// Root vegetables and alliums restricted under Jain dietary rules.
const JAIN_RESTRICTED_KEYWORDS: &[&str] = &[
    "onion", "garlic", "potato", "carrot", "radish", "beetroot",
    "ginger", "turnip", "leek", "shallot", "scallion",
];

/// Plant ingredients and explicit vegan markers.
const PLANT_BASED_KEYWORDS: &[&str] = &[
    // Vegetables and fruits
    "vegetable", "fruit", "tomato", "potato", "carrot", "spinach",
    "cauliflower", "broccoli", "cabbage", "peas", "beans",
    // Grains and cereals
    "rice", "wheat", "flour", "oat", "barley", "corn", "millet",
    "quinoa", "buckwheat", "ragi", "bajra", "jowar",
    // Legumes and pulses
    "dal", "lentil", "chickpea", "kidney bean", "black bean",
    "moong", "masoor", "chana", "rajma", "urad", "toor",
    // Plant proteins
    "soy", "tofu", "tempeh", "seitan", "plant protein",
    // Nuts and seeds
    "almond", "cashew", "walnut", "peanut", "pistachio",
    "sesame", "sunflower seed", "pumpkin seed", "chia seed",
    // Plant oils
    "coconut oil", "olive oil", "sunflower oil", "mustard oil",
    "sesame oil", "groundnut oil", "vegetable oil",
    // Spices and herbs
    "turmeric", "cumin", "coriander", "cardamom", "cinnamon",
    "clove", "black pepper", "mint", "basil",
    // Explicit markers
    "plant-based", "vegan", "pure vegetarian", "no animal products",
];

/// Normalize free text for keyword matching.
///
/// Lower-cases, maps punctuation to whitespace, and collapses whitespace
/// runs. Keywords go through the same normalization at table-build time,
/// so hyphenated and multi-word keywords match phrase-wise.
pub fn normalize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_space = true;
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
            last_was_space = false;
        } else if !last_was_space {
            out.push(' ');
            last_was_space = true;
        }
    }
    if out.ends_with(' ') {
        out.pop();
    }
    out
}

/// A compiled keyword set matched with word boundaries.
#[derive(Debug)]
pub struct KeywordSet {
    pattern: Regex,
}

impl KeywordSet {
    /// Compile a keyword set into a single alternation regex.
    ///
    /// Construction cannot fail for the static tables: every keyword is
    /// escaped, and the alternation is anchored with `\b` on both sides.
    fn compile(keywords: &[&str]) -> KeywordSet {
        let mut alternatives: Vec<String> = keywords
            .iter()
            .map(|kw| regex::escape(&normalize_text(kw)))
            .collect();
        // Longest-first so multi-word phrases are preferred by the engine.
        alternatives.sort_by_key(|a| std::cmp::Reverse(a.len()));
        let pattern = format!(r"\b(?:{})\b", alternatives.join("|"));
        KeywordSet {
            pattern: Regex::new(&pattern).unwrap_or_else(|_| {
                // Static tables are known-good; an empty-match regex is the
                // safe fallback if a table edit ever breaks compilation.
                Regex::new(r"\bnutriscan_unmatchable\b").unwrap()
            }),
        }
    }

    /// Whether any keyword occurs as a whole word in normalized text.
    pub fn matches(&self, normalized_text: &str) -> bool {
        self.pattern.is_match(normalized_text)
    }
}

/// The immutable, priority-ordered keyword taxonomy.
#[derive(Debug)]
pub struct KeywordTaxonomy {
    tiers: Vec<(DietTier, KeywordSet)>,
}

impl KeywordTaxonomy {
    /// Build the taxonomy from the static tables.
    fn build() -> Self {
        Self {
            tiers: vec![
                (DietTier::NonVegetarian, KeywordSet::compile(NON_VEG_KEYWORDS)),
                (DietTier::VegetarianOnly, KeywordSet::compile(VEGETARIAN_KEYWORDS)),
                (DietTier::JainRestricted, KeywordSet::compile(JAIN_RESTRICTED_KEYWORDS)),
                (DietTier::PlantBased, KeywordSet::compile(PLANT_BASED_KEYWORDS)),
            ],
        }
    }

    /// Tiers in strict matching priority order.
    pub fn tiers(&self) -> &[(DietTier, KeywordSet)] {
        &self.tiers
    }

    /// Return the first tier whose keyword set matches the normalized
    /// text, skipping [`DietTier::JainRestricted`] unless requested.
    pub fn first_match(&self, normalized_text: &str, include_jain: bool) -> Option<DietTier> {
        self.tiers
            .iter()
            .filter(|(tier, _)| include_jain || *tier != DietTier::JainRestricted)
            .find(|(_, set)| set.matches(normalized_text))
            .map(|(tier, _)| *tier)
    }
}

lazy_static! {
    /// The shared taxonomy, built once at first use and read-only after.
    pub static ref TAXONOMY: KeywordTaxonomy = KeywordTaxonomy::build();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("Chicken, Breast!"), "chicken breast");
        assert_eq!(normalize_text("  Plant-Based   Protein "), "plant based protein");
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text("   \t  "), "");
    }

    #[test]
    fn test_word_boundary_matching() {
        let tier = TAXONOMY.first_match(&normalize_text("eggplant, rice"), false);
        assert_eq!(tier, Some(DietTier::PlantBased));

        let tier = TAXONOMY.first_match(&normalize_text("egg, rice"), false);
        assert_eq!(tier, Some(DietTier::NonVegetarian));
    }

    #[test]
    fn test_tier_priority_order() {
        // Non-veg wins over dairy and plant keywords in the same text.
        let text = normalize_text("chicken, butter, rice, spinach");
        assert_eq!(TAXONOMY.first_match(&text, false), Some(DietTier::NonVegetarian));

        // Dairy wins over plant keywords.
        let text = normalize_text("paneer, rice, spinach");
        assert_eq!(TAXONOMY.first_match(&text, false), Some(DietTier::VegetarianOnly));
    }

    #[test]
    fn test_jain_tier_only_when_requested() {
        let text = normalize_text("onion, turmeric");
        assert_eq!(TAXONOMY.first_match(&text, false), Some(DietTier::PlantBased));
        assert_eq!(TAXONOMY.first_match(&text, true), Some(DietTier::JainRestricted));
    }

    #[test]
    fn test_multi_word_keywords() {
        let text = normalize_text("water, condensed milk, sugar");
        assert_eq!(TAXONOMY.first_match(&text, false), Some(DietTier::VegetarianOnly));

        let text = normalize_text("certified plant-based snack");
        assert_eq!(TAXONOMY.first_match(&text, false), Some(DietTier::PlantBased));
    }
}
