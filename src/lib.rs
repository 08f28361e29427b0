//! dcasim: monthly dollar-cost-averaging simulator.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`], command orchestration in [`cli`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
