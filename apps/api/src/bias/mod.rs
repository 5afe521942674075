//! Bias Audit Engine — inspects generated candidate content, prompts, and
//! job descriptions for demographic and linguistic bias, records versioned
//! audit evidence, and applies term-level mitigation.

pub mod audit;
pub mod classifier;
pub mod detection;
pub mod handlers;
pub mod lexicon;
pub mod models;
