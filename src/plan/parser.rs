//! Plan JSON parsing

use std::error::Error;
use std::fmt;

use super::types::TerraformPlan;

/// Failure to parse a plan JSON document
#[derive(Debug)]
pub struct PlanParseError {
    message: String,
    source: Option<serde_json::Error>,
}

impl fmt::Display for PlanParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse plan JSON: {}", self.message)
    }
}

impl Error for PlanParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn Error + 'static))
    }
}

/// Parser for plan JSON documents
#[derive(Debug, Default)]
pub struct PlanParser;

impl PlanParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a plan from its JSON text.
    pub fn parse(&self, json: &str) -> Result<TerraformPlan, PlanParseError> {
        serde_json::from_str(json).map_err(|error| PlanParseError {
            message: error.to_string(),
            source: Some(error),
        })
    }
}
