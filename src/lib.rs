//! barsim — deterministic backtester for rule-based trading strategies.
//!
//! Hexagonal architecture: simulation core in [`domain`], port traits in
//! [`ports`], concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
