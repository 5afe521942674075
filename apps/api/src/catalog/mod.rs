//! Skill catalog and the candidate/job skill association layer.

pub mod handlers;
pub mod models;
pub mod repo;
