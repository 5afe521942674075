//! Prompt Template Registry — versioned, bias-evaluated prompt templates
//! with an approval workflow and a single-active-version-per-name invariant.

pub mod handlers;
pub mod models;
pub mod repo;
