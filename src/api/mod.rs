pub mod client;
pub mod models;

#[cfg(test)]
pub(crate) mod stub;

pub use client::{AnalysisApi, AnalysisClient};
