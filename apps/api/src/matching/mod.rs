//! Matching Engine — scores candidate-job fit by blending embedding
//! similarity with importance-weighted skill comparison, and persists the
//! result with a structured explanation.

pub mod engine;
pub mod handlers;
pub mod models;
pub mod service;
