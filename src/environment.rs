//! Build environment selector.

use serde::{Deserialize, Serialize};

/// Environment a configuration is composed for.
///
/// Selects the rule set, plugin set and output naming policy, and is the
/// execution mode exported to spawned tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
    Test,
}

/// Error for an unrecognised environment name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown environment '{0}' (expected development, production or test)")]
pub struct UnknownEnvironment(pub String);

impl Environment {
    pub const ALL: [Environment; 3] = [
        Environment::Development,
        Environment::Production,
        Environment::Test,
    ];

    /// Canonical lowercase name, as used in settings keys and `NODE_ENV`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Environment {
    type Err = UnknownEnvironment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            _ => Err(UnknownEnvironment(s.to_string())),
        }
    }
}
