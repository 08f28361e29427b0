//! Core domain types and logic.

pub mod config;
pub mod config_validation;
pub mod error;
pub mod ledger;
pub mod normalizer;
pub mod price_series;
pub mod quote;
pub mod schedule;
pub mod summary;
