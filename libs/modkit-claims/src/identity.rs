use serde::{Deserialize, Serialize};

use crate::claim::Claim;
use crate::claim_types;
use crate::error::ClaimsError;

/// `Identity` is the set of claims describing who is acting, plus how that
/// was established.
///
/// Built by an authenticator from verified claims and then owned by a
/// [`Principal`](crate::Principal). Claims keep their insertion order and may
/// repeat. The identity does no internal locking; one identity belongs to one
/// execution flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawIdentity")]
pub struct Identity {
    /// Authentication method (e.g. "password"). `None` means unauthenticated.
    authentication_type: Option<String>,
    /// Claim type that provides [`Identity::name`].
    name_claim_type: String,
    /// Claim type interpreted as a role.
    role_claim_type: String,
    claims: Vec<Claim>,
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            authentication_type: None,
            name_claim_type: claim_types::NAME.to_owned(),
            role_claim_type: claim_types::ROLE.to_owned(),
            claims: Vec::new(),
        }
    }
}

impl Identity {
    /// Create an unauthenticated identity with no claims and default claim types.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn builder() -> IdentityBuilder {
        IdentityBuilder::default()
    }

    /// Create an identity authenticated by `authentication_type`, populated with `claims`.
    #[must_use]
    pub fn from_claims(
        claims: impl IntoIterator<Item = Claim>,
        authentication_type: impl Into<String>,
    ) -> Self {
        Self {
            authentication_type: Some(authentication_type.into()),
            claims: claims.into_iter().collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn authentication_type(&self) -> Option<&str> {
        self.authentication_type.as_deref()
    }

    /// `true` when an authentication type is present and non-empty.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authentication_type
            .as_deref()
            .is_some_and(|method| !method.is_empty())
    }

    /// `true` when no claim of the name claim type exists.
    ///
    /// This only looks at the name claim; an authenticated identity without a
    /// name claim is still anonymous.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.name().is_none()
    }

    /// Value of the first claim whose type is the name claim type.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.claims
            .iter()
            .find(|c| c.claim_type() == self.name_claim_type)
            .map(Claim::value)
    }

    #[must_use]
    pub fn name_claim_type(&self) -> &str {
        &self.name_claim_type
    }

    #[must_use]
    pub fn role_claim_type(&self) -> &str {
        &self.role_claim_type
    }

    /// Change which claim type provides the name.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimsError::InvalidArgument`] if `claim_type` is empty.
    pub fn set_name_claim_type(
        &mut self,
        claim_type: impl Into<String>,
    ) -> Result<(), ClaimsError> {
        let claim_type = claim_type.into();
        ClaimsError::require_non_empty("name_claim_type", &claim_type)?;
        self.name_claim_type = claim_type;
        Ok(())
    }

    /// Change which claim type is interpreted as a role.
    ///
    /// Role checks made afterwards compare against the new type.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimsError::InvalidArgument`] if `claim_type` is empty.
    pub fn set_role_claim_type(
        &mut self,
        claim_type: impl Into<String>,
    ) -> Result<(), ClaimsError> {
        let claim_type = claim_type.into();
        ClaimsError::require_non_empty("role_claim_type", &claim_type)?;
        self.role_claim_type = claim_type;
        Ok(())
    }

    /// All claims, in insertion order.
    #[must_use]
    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    /// Append a single claim. Duplicates are kept.
    pub fn add_claim(&mut self, claim: Claim) {
        self.claims.push(claim);
    }

    /// Append claims in iteration order.
    pub fn add_claims(&mut self, claims: impl IntoIterator<Item = Claim>) {
        self.claims.extend(claims);
    }

    /// Remove the first claim equal to `claim`.
    ///
    /// Returns whether a claim was removed. If duplicates exist only one is removed.
    pub fn remove_claim(&mut self, claim: &Claim) -> bool {
        let Some(index) = self.claims.iter().position(|c| c == claim) else {
            return false;
        };
        self.claims.remove(index);
        true
    }

    /// Whether a claim with exactly this type and value exists.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimsError::InvalidArgument`] if `claim_type` or `value` is empty.
    pub fn has_claim(&self, claim_type: &str, value: &str) -> Result<bool, ClaimsError> {
        ClaimsError::require_non_empty("type", claim_type)?;
        ClaimsError::require_non_empty("value", value)?;
        Ok(self.claims.iter().any(|c| c.matches(claim_type, value)))
    }

    /// Whether any claim satisfies `predicate`.
    #[must_use]
    pub fn has_claim_where<P>(&self, predicate: P) -> bool
    where
        P: FnMut(&Claim) -> bool,
    {
        self.claims.iter().any(predicate)
    }

    /// Snapshot of every claim satisfying `predicate`.
    ///
    /// The returned claims are copies; later changes to the identity do not
    /// affect them.
    #[must_use]
    pub fn find_all<P>(&self, mut predicate: P) -> Vec<Claim>
    where
        P: FnMut(&Claim) -> bool,
    {
        self.claims
            .iter()
            .filter(|&c| predicate(c))
            .cloned()
            .collect()
    }

    /// First claim satisfying `predicate`.
    #[must_use]
    pub fn find_first<P>(&self, mut predicate: P) -> Option<&Claim>
    where
        P: FnMut(&Claim) -> bool,
    {
        self.claims.iter().find(|&c| predicate(c))
    }
}

/// Builder for [`Identity`].
#[derive(Default)]
pub struct IdentityBuilder {
    authentication_type: Option<String>,
    name_claim_type: Option<String>,
    role_claim_type: Option<String>,
    claims: Vec<Claim>,
}

impl IdentityBuilder {
    #[must_use]
    pub fn authentication_type(mut self, authentication_type: &str) -> Self {
        self.authentication_type = Some(authentication_type.to_owned());
        self
    }

    #[must_use]
    pub fn name_claim_type(mut self, claim_type: &str) -> Self {
        self.name_claim_type = Some(claim_type.to_owned());
        self
    }

    #[must_use]
    pub fn role_claim_type(mut self, claim_type: &str) -> Self {
        self.role_claim_type = Some(claim_type.to_owned());
        self
    }

    #[must_use]
    pub fn claim(mut self, claim: Claim) -> Self {
        self.claims.push(claim);
        self
    }

    #[must_use]
    pub fn claims(mut self, claims: impl IntoIterator<Item = Claim>) -> Self {
        self.claims.extend(claims);
        self
    }

    /// Build the identity.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimsError::InvalidArgument`] if a name or role claim type
    /// was set to an empty string.
    pub fn build(self) -> Result<Identity, ClaimsError> {
        let name_claim_type = self
            .name_claim_type
            .unwrap_or_else(|| claim_types::NAME.to_owned());
        let role_claim_type = self
            .role_claim_type
            .unwrap_or_else(|| claim_types::ROLE.to_owned());
        ClaimsError::require_non_empty("name_claim_type", &name_claim_type)?;
        ClaimsError::require_non_empty("role_claim_type", &role_claim_type)?;

        Ok(Identity {
            authentication_type: self.authentication_type,
            name_claim_type,
            role_claim_type,
            claims: self.claims,
        })
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawIdentity {
    #[serde(default)]
    authentication_type: Option<String>,
    #[serde(default)]
    name_claim_type: Option<String>,
    #[serde(default)]
    role_claim_type: Option<String>,
    #[serde(default)]
    claims: Vec<Claim>,
}

impl TryFrom<RawIdentity> for Identity {
    type Error = ClaimsError;

    fn try_from(raw: RawIdentity) -> Result<Self, Self::Error> {
        IdentityBuilder {
            authentication_type: raw.authentication_type,
            name_claim_type: raw.name_claim_type,
            role_claim_type: raw.role_claim_type,
            claims: raw.claims,
        }
        .build()
    }
}
