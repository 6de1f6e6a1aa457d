//! Join secret value object.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Shared password required to join a room.
///
/// Compared by plain equality. The baseline policy is a 6-digit numeric
/// code; any human-typable token works as long as it is stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JoinSecret(String);

impl JoinSecret {
    /// Generates a random 6-digit numeric secret.
    pub fn generate() -> Self {
        let code = rand::thread_rng().gen_range(100_000..1_000_000);
        Self(code.to_string())
    }

    /// Wraps an existing secret loaded from persistence.
    pub fn from_string(value: String) -> Self {
        Self(value)
    }

    /// Returns the secret as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the presented password matches this secret.
    pub fn matches(&self, presented: &str) -> bool {
        self.0 == presented
    }
}

impl std::fmt::Display for JoinSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
