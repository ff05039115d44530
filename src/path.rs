use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::AuthzError;

static PLAIN_STEP_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\w+)$").unwrap());
static INDIRECT_STEP_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[(\w+),(\w+)\]$").unwrap());

/// One traversal step of an owning-field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub alias: String,

    /// Set for `[alias,Model]` steps: the field holds the ID of a `Model`
    /// that has to be loaded before continuing.
    pub model: Option<String>,
}

/// Parsed owning-field path such as `[packageID,Package].ownerID`.
///
/// Paths are static per protected field, so parse them once and reuse the
/// result for every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    steps: Vec<Step>,
}

impl FieldPath {
    pub fn parse(s: &str) -> Result<Self, AuthzError> {
        if s.is_empty() {
            return Err(AuthzError::InvalidDirective(String::from(
                "owning field path is empty",
            )));
        }

        let mut steps = Vec::new();
        for segment in s.split('.') {
            steps.push(Self::parse_step(segment).ok_or_else(|| {
                AuthzError::InvalidDirective(format!(
                    "invalid segment '{segment}' in owning field path '{s}'"
                ))
            })?);
        }

        Ok(Self { steps })
    }

    fn parse_step(segment: &str) -> Option<Step> {
        if let Some(caps) = INDIRECT_STEP_REGEX.captures(segment) {
            return Some(Step {
                alias: caps[1].to_string(),
                model: Some(caps[2].to_string()),
            });
        }

        PLAIN_STEP_REGEX.captures(segment).map(|caps| Step {
            alias: caps[1].to_string(),
            model: None,
        })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

impl FromStr for FieldPath {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.model {
            Some(ref model) => write!(f, "[{},{}]", self.alias, model),
            None => write!(f, "{}", self.alias),
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, step) in self.steps.iter().enumerate() {
            if idx > 0 {
                write!(f, ".")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}
