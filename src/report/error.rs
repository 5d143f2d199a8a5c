//! Rendering error types

use std::error::Error;
use std::fmt;

use crate::diff::MissingKeyError;

/// A whole-document rendering failure
#[derive(Debug)]
pub enum RenderError {
    /// The input (plan content or user template) cannot be rendered
    InvalidInput(String),

    /// An internal rendering defect, independent of the input
    Internal(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::InvalidInput(message) => write!(f, "invalid input: {message}"),
            RenderError::Internal(message) => write!(f, "internal rendering error: {message}"),
        }
    }
}

impl Error for RenderError {}

impl From<MissingKeyError> for RenderError {
    fn from(error: MissingKeyError) -> Self {
        RenderError::InvalidInput(error.to_string())
    }
}
