//! Diet classification for NutriScan.
//!
//! This module classifies products as pure vegetarian (vegan),
//! vegetarian, or non-vegetarian under Indian dietary conventions, from
//! free-text product metadata. The taxonomy is an immutable, explicitly
//! ordered list of (tier, keyword set) pairs built once at start-up;
//! classification is a pure first-match-wins pass over it.

pub mod classifier;
pub mod taxonomy;
