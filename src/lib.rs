//! Flagship: fleet construction and legality engine for a miniatures wargame.
//!
//! Merges upgrade/ship/squadron card data from optional content sources into
//! one errata-resolved catalog, evaluates upgrade eligibility per ship, and
//! validates assembled fleets against named gamemode rulesets.

pub mod cli;
pub mod content;
pub mod fleet;
pub mod parallel;
pub mod server;
