//! `journey~brand` target grammar.

use std::str::FromStr;

/// Separator between the journey and brand components.
pub const TARGET_SEPARATOR: char = '~';

/// Errors parsing a target.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    #[error("target is empty")]
    Empty,

    #[error("target '{0}' has an empty journey")]
    EmptyJourney(String),

    #[error("target '{0}' has an empty brand after '~'")]
    EmptyBrand(String),

    #[error("target '{0}' has more than two components")]
    TooManyComponents(String),
}

/// A journey with an optional brand, written `journey` or `journey~brand`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoutTarget {
    pub journey: String,
    pub brand: Option<String>,
}

impl ScoutTarget {
    /// Brand component, or `""` when absent.
    pub fn brand_or_empty(&self) -> &str {
        self.brand.as_deref().unwrap_or("")
    }
}

impl FromStr for ScoutTarget {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TargetError::Empty);
        }

        let parts: Vec<&str> = s.split(TARGET_SEPARATOR).collect();
        match parts.as_slice() {
            [journey] => Ok(Self {
                journey: (*journey).to_string(),
                brand: None,
            }),
            [journey, brand] => {
                if journey.is_empty() {
                    return Err(TargetError::EmptyJourney(s.to_string()));
                }
                if brand.is_empty() {
                    return Err(TargetError::EmptyBrand(s.to_string()));
                }
                Ok(Self {
                    journey: (*journey).to_string(),
                    brand: Some((*brand).to_string()),
                })
            }
            _ => Err(TargetError::TooManyComponents(s.to_string())),
        }
    }
}

impl std::fmt::Display for ScoutTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.brand {
            Some(brand) => write!(f, "{}{}{}", self.journey, TARGET_SEPARATOR, brand),
            None => f.write_str(&self.journey),
        }
    }
}
