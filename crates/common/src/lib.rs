//! Common types and utilities for Rubric Royale

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;

pub use catalog::Catalog;
pub use config::Config;
pub use error::{Error, Result};
