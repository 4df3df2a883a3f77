//! Workplace wellness risk monitor
//!
//! Classifies per-person health readings (heart rate, stress, sleep) into
//! Low, Moderate and High risk tiers, attaches a recommended intervention,
//! and renders the annotated table, a stress vs heart-rate scatter plot and
//! a CSV export.

pub mod analysis;
pub mod error;
pub mod export;
pub mod ingest;
pub mod models;
pub mod plot;
pub mod report;
pub mod risk;
