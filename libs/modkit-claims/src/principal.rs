use serde::{Deserialize, Serialize};

use crate::claim::Claim;
use crate::error::ClaimsError;
use crate::identity::Identity;

/// `Principal` holds the active [`Identity`] and answers role and claim
/// queries against it.
///
/// The principal exclusively owns its identity. Replacing it with
/// [`Principal::set_identity`] drops the previous one, and every query made
/// afterwards sees the new identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    identity: Identity,
}

impl Principal {
    #[must_use]
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }

    #[must_use]
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Mutable access to the held identity (e.g. to add claims in place).
    pub fn identity_mut(&mut self) -> &mut Identity {
        &mut self.identity
    }

    #[must_use]
    pub fn into_identity(self) -> Identity {
        self.identity
    }

    /// Replace the held identity.
    pub fn set_identity(&mut self, identity: Identity) {
        self.identity = identity;
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.identity.name()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_authenticated()
    }

    /// Whether the identity has a claim of its role claim type with value `role`.
    ///
    /// The role claim type is read from the identity on every call.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimsError::InvalidArgument`] if `role` is empty.
    pub fn is_in_role(&self, role: &str) -> Result<bool, ClaimsError> {
        ClaimsError::require_non_empty("role", role)?;
        self.identity.has_claim(self.identity.role_claim_type(), role)
    }

    /// # Errors
    ///
    /// Returns [`ClaimsError::InvalidArgument`] if `claim_type` or `value` is empty.
    pub fn has_claim(&self, claim_type: &str, value: &str) -> Result<bool, ClaimsError> {
        self.identity.has_claim(claim_type, value)
    }

    #[must_use]
    pub fn has_claim_where<P>(&self, predicate: P) -> bool
    where
        P: FnMut(&Claim) -> bool,
    {
        self.identity.has_claim_where(predicate)
    }
}

impl From<Identity> for Principal {
    fn from(identity: Identity) -> Self {
        Self::new(identity)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::claim_types;

    fn identity(name: &str, role: &str) -> Identity {
        Identity::from_claims(
            [
                Claim::new(claim_types::NAME, name).unwrap(),
                Claim::new(claim_types::ROLE, role).unwrap(),
            ],
            "password",
        )
    }

    #[test]
    fn principal_answers_role_and_claim_queries() {
        let principal = Principal::new(identity("Adi", "admin"));

        assert!(principal.is_in_role("admin").unwrap());
        assert!(!principal.is_in_role("user").unwrap());
        assert!(principal.has_claim(claim_types::NAME, "Adi").unwrap());
        assert!(principal.has_claim_where(|c| c.matches(claim_types::ROLE, "admin")));
        assert_eq!(principal.name(), Some("Adi"));
        assert!(principal.is_authenticated());
    }

    #[test]
    fn role_value_under_other_claim_type_is_not_a_role() {
        let principal = Principal::new(Identity::from_claims(
            [Claim::new(claim_types::NAME, "admin").unwrap()],
            "password",
        ));

        assert!(!principal.is_in_role("admin").unwrap());
    }

    #[test]
    fn is_in_role_rejects_empty_role() {
        let principal = Principal::new(identity("Adi", "admin"));

        assert!(matches!(
            principal.is_in_role(""),
            Err(ClaimsError::InvalidArgument {
                argument: "role",
                ..
            })
        ));
    }

    #[test]
    fn has_claim_rejects_empty_arguments() {
        let principal = Principal::new(identity("Adi", "admin"));

        assert!(principal.has_claim("", "Adi").is_err());
        assert!(principal.has_claim(claim_types::NAME, "").is_err());
    }

    #[test]
    fn set_identity_is_observed_immediately() {
        let mut principal = Principal::new(identity("Adi", "admin"));
        assert!(principal.is_in_role("admin").unwrap());

        principal.set_identity(identity("Anita", "user"));

        assert!(!principal.is_in_role("admin").unwrap());
        assert!(principal.is_in_role("user").unwrap());
        assert!(principal.has_claim(claim_types::NAME, "Anita").unwrap());
        assert!(!principal.has_claim(claim_types::NAME, "Adi").unwrap());
    }

    #[test]
    fn role_check_follows_role_claim_type_change() {
        let mut principal = Principal::new(identity("Adi", "admin"));
        principal
            .identity_mut()
            .add_claim(Claim::new("group", "operators").unwrap());

        assert!(!principal.is_in_role("operators").unwrap());

        principal.identity_mut().set_role_claim_type("group").unwrap();

        assert!(principal.is_in_role("operators").unwrap());
        assert!(!principal.is_in_role("admin").unwrap());
    }
}
