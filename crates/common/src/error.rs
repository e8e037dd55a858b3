//! Error types

use thiserror::Error;

/// Main error type for Rubric Royale
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown sample: {0}")]
    UnknownSample(String),

    #[error("Incomplete submission: missing score for {missing}")]
    IncompleteSubmission { missing: String },

    #[error("Missing criterion in stored scores: {0}")]
    MissingCriterion(String),

    #[error("Sample {sample_id} already reviewed by {user_id}")]
    DuplicateSubmission { user_id: String, sample_id: String },

    #[error("Score {score} for {criterion} outside [{min}, {max}]")]
    InvalidScoreRange {
        criterion: String,
        score: f64,
        min: f64,
        max: f64,
    },

    #[error("Unknown criterion: {0}")]
    UnknownCriterion(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
