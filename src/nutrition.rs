//! Nutrition data model for NutriScan.
//!
//! This module defines the 13 canonical nutrient attributes, the sparse
//! and dense nutrition vector types, and the default-fill completer that
//! turns sparse caller input into a dense feature vector. Sparse and
//! dense representations are deliberately distinct types: an absent
//! attribute means "not provided", never zero.

pub mod attribute;
pub mod completer;
pub mod facts;
