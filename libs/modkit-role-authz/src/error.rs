//! Error types for role authorization.

use modkit_claims::ClaimsError;
use thiserror::Error;

/// Errors that can occur while resolving authorization markers.
///
/// These represent malformed calls and configuration problems only.
/// Access denial is expressed as a `false` decision, never as an error.
#[derive(Debug, Error)]
pub enum AuthzError {
    /// A required argument (role, call site, member name) was empty.
    #[error(transparent)]
    InvalidArgument(#[from] ClaimsError),

    /// No resource type with this name is registered.
    #[error("resource type '{resource}' is not registered")]
    ResourceNotFound { resource: String },

    /// The resource type exists but declares no such member.
    #[error("resource type '{resource}' has no member '{member}'")]
    MemberNotFound { resource: String, member: String },

    /// The authorization configuration could not be loaded.
    #[error("invalid authorization config: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl AuthzError {
    pub(crate) fn member_not_found(resource: &str, member: &str) -> Self {
        Self::MemberNotFound {
            resource: resource.to_owned(),
            member: member.to_owned(),
        }
    }

    /// `true` for lookup failures (unknown resource type or member).
    #[must_use]
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            Self::ResourceNotFound { .. } | Self::MemberNotFound { .. }
        )
    }
}

impl From<figment::Error> for AuthzError {
    fn from(e: figment::Error) -> Self {
        Self::Config(Box::new(e))
    }
}
