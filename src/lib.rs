//! Grade band analytics: normalize an uploaded grade sheet, sort students
//! into user-defined bands, and derive the statistics and exports built on
//! that categorization.

pub mod categorize;
pub mod config;
pub mod export;
pub mod ingest;
pub mod locale;
pub mod models;
pub mod normalize;
pub mod ranges;
pub mod report;
pub mod roster;
pub mod session;
pub mod stats;
