//! Deterministic match identity keys using SHA256 hashing.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use super::MatchResult;

/// A deterministic identity key for a match row, derived from its content.
///
/// The key covers both participants, the character, and the parsed time.
/// Two distinct matches with identical fields therefore share a key and
/// the second one is never flagged as new; this ambiguity is part of the
/// contract, not a bug to fix here.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryKey(String);

impl EntryKey {
    /// Generate a key from input fields.
    /// Uses SHA256 and takes the first 16 characters for brevity.
    pub fn generate(fields: &[&str]) -> Self {
        let mut hasher = Sha256::new();
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                hasher.update(b"|");
            }
            hasher.update(field.as_bytes());
        }
        let result = hasher.finalize();
        let hash = hex::encode(result);
        Self(hash[..16].to_string())
    }

    /// Identity key for a match row.
    pub fn for_result(result: &MatchResult) -> Self {
        let time = match result.time_seconds {
            Some(t) => t.to_string(),
            None => String::new(),
        };
        Self::generate(&[
            &result.p1,
            &result.p2,
            result.character.as_deref().unwrap_or(""),
            &time,
        ])
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntryKey({})", self.0)
    }
}
