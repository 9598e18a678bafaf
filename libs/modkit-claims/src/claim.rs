use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ClaimsError;

/// An immutable `(type, value)` assertion about an identity.
///
/// Both parts are non-empty; [`Claim::new`] rejects anything else, and
/// deserialization goes through the same check. Two claims are equal when
/// their type and value are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawClaim")]
pub struct Claim {
    #[serde(rename = "type")]
    claim_type: String,
    value: String,
}

impl Claim {
    /// Create a claim.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimsError::InvalidArgument`] if `claim_type` or `value` is empty.
    pub fn new(
        claim_type: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, ClaimsError> {
        let claim_type = claim_type.into();
        let value = value.into();
        ClaimsError::require_non_empty("type", &claim_type)?;
        ClaimsError::require_non_empty("value", &value)?;
        Ok(Self { claim_type, value })
    }

    #[must_use]
    pub fn claim_type(&self) -> &str {
        &self.claim_type
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether this claim has exactly the given type and value (case-sensitive).
    #[inline]
    #[must_use]
    pub fn matches(&self, claim_type: &str, value: &str) -> bool {
        self.claim_type == claim_type && self.value == value
    }
}

impl fmt::Display for Claim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.claim_type, self.value)
    }
}

#[derive(Deserialize)]
struct RawClaim {
    #[serde(rename = "type")]
    claim_type: String,
    value: String,
}

impl TryFrom<RawClaim> for Claim {
    type Error = ClaimsError;

    fn try_from(raw: RawClaim) -> Result<Self, Self::Error> {
        Self::new(raw.claim_type, raw.value)
    }
}
