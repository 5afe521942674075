//! Fairness Metrics Aggregator — periodic, immutable rollups of bias-audit
//! history for trend reporting.

pub mod aggregate;
pub mod handlers;
pub mod models;
pub mod service;
