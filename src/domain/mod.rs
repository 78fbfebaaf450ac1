pub mod bar;
pub mod config_validation;
pub mod engine;
pub mod error;
pub mod indicator;
pub mod ledger;
pub mod signal;
pub mod stats;
pub mod strategy;
