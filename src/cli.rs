//! Command line interface for the `nutriscan` binary.

pub mod args;
pub mod commands;
pub mod output;
