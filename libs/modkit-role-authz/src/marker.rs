//! Declarative role requirement attached to a guarded method or member.

use std::borrow::Cow;
use std::fmt;

use modkit_claims::Principal;

/// Separator between role names in [`AuthorizeMarker::roles`].
pub const ROLE_SEPARATOR: char = ',';

/// Role requirement for a guarded element: a comma-delimited list of roles,
/// any one of which grants access.
///
/// Role names are split on `,` without trimming, so `"admin, user"` names the
/// roles `"admin"` and `" user"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AuthorizeMarker {
    roles: Cow<'static, str>,
}

impl AuthorizeMarker {
    /// Marker for a statically known role list.
    #[must_use]
    pub const fn from_static(roles: &'static str) -> Self {
        Self {
            roles: Cow::Borrowed(roles),
        }
    }

    #[must_use]
    pub fn new(roles: impl Into<Cow<'static, str>>) -> Self {
        Self {
            roles: roles.into(),
        }
    }

    /// The raw comma-delimited role list.
    #[must_use]
    pub fn roles(&self) -> &str {
        &self.roles
    }

    /// Individual role names, in declaration order. Empty segments are skipped.
    pub fn roles_iter(&self) -> impl Iterator<Item = &str> {
        self.roles.split(ROLE_SEPARATOR).filter(|role| !role.is_empty())
    }

    /// Whether `role` is one of the listed roles.
    #[must_use]
    pub fn allows(&self, role: &str) -> bool {
        self.roles_iter().any(|r| r == role)
    }

    /// Whether `principal` is in at least one of the listed roles.
    ///
    /// Stops at the first matching role. No principal never satisfies a marker.
    #[must_use]
    pub fn is_satisfied_by(&self, principal: Option<&Principal>) -> bool {
        let Some(principal) = principal else {
            return false;
        };
        self.roles_iter()
            .any(|role| matches!(principal.is_in_role(role), Ok(true)))
    }
}

impl fmt::Display for AuthorizeMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.roles)
    }
}
