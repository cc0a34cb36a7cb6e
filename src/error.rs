// src/error.rs

use std::fmt;

/// Global Application Error Enum.
/// Only the boundaries of a session can fail: loading configuration, loading the
/// exam paper and handing the payload to the results collaborator. Operations on
/// a running session never error, they are ignored instead (see `handlers::Outcome`).
#[derive(Debug)]
pub enum AppError {
    // Bad or unparsable environment value
    Config(String),

    // Exam paper has no usable question
    InvalidQuestionSet(String),

    // Reading the paper or writing the payload failed
    Io(String),

    // Malformed JSON
    Parse(String),

    // The results collaborator refused the payload
    Delivery(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "configuration error: {}", msg),
            AppError::InvalidQuestionSet(msg) => write!(f, "invalid question set: {}", msg),
            AppError::Io(msg) => write!(f, "io error: {}", msg),
            AppError::Parse(msg) => write!(f, "parse error: {}", msg),
            AppError::Delivery(msg) => write!(f, "delivery failed: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Parse(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::InvalidQuestionSet(err.to_string())
    }
}
