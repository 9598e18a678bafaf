use std::sync::Arc;

use modkit_claims::{Claim, ClaimsError, Identity, Principal};

/// Source of the principal for the current execution flow.
///
/// The authorization manager only ever reads the principal through this
/// trait, so any request- or task-scoped value that carries one can be
/// passed to it.
pub trait PrincipalSource {
    /// The installed principal, or `None` when nobody is signed in.
    fn current_principal(&self) -> Option<&Principal>;
}

/// `ExecutionContext` carries the principal established for one logical
/// execution flow (a request, a task).
///
/// Created by the authenticator once the caller is verified and passed
/// explicitly to every guarded call. The principal is immutable once
/// installed; the context is cheap to clone and can be shared across
/// threads.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    principal: Option<Arc<Principal>>,
}

impl ExecutionContext {
    /// Context with no principal installed. Every permission check fails.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Context carrying `principal`.
    #[must_use]
    pub fn for_principal(principal: Principal) -> Self {
        Self {
            principal: Some(Arc::new(principal)),
        }
    }

    /// Build the identity and principal for verified `claims` and install it.
    ///
    /// This is the hand-off point for an external authenticator: the claims
    /// must already be verified.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimsError::InvalidArgument`] if `authentication_type` is empty.
    pub fn establish(
        claims: impl IntoIterator<Item = Claim>,
        authentication_type: &str,
    ) -> Result<Self, ClaimsError> {
        if authentication_type.is_empty() {
            return Err(ClaimsError::invalid_argument(
                "authentication_type",
                "cannot be empty",
            ));
        }

        let identity = Identity::from_claims(claims, authentication_type);
        tracing::debug!(
            authentication_type,
            name = identity.name(),
            claims = identity.claims().len(),
            "Principal established for execution context"
        );

        Ok(Self::for_principal(Principal::new(identity)))
    }

    #[must_use]
    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_deref()
    }

    /// `true` when a principal with an authenticated identity is installed.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.principal().is_some_and(Principal::is_authenticated)
    }
}

impl PrincipalSource for ExecutionContext {
    fn current_principal(&self) -> Option<&Principal> {
        self.principal()
    }
}

impl PrincipalSource for Principal {
    fn current_principal(&self) -> Option<&Principal> {
        Some(self)
    }
}

impl<T: PrincipalSource + ?Sized> PrincipalSource for Arc<T> {
    fn current_principal(&self) -> Option<&Principal> {
        (**self).current_principal()
    }
}
