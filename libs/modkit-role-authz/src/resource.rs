//! Static descriptors for guarded resource types and their members.

use crate::error::AuthzError;
use crate::marker::AuthorizeMarker;

/// A named member (property, field or method) of a resource type and the
/// roles it requires, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberDescriptor {
    pub name: &'static str,
    /// Comma-delimited role list; `None` means the member carries no marker.
    pub roles: Option<&'static str>,
}

impl MemberDescriptor {
    /// Member guarded by `roles`.
    #[must_use]
    pub const fn guarded(name: &'static str, roles: &'static str) -> Self {
        Self {
            name,
            roles: Some(roles),
        }
    }

    /// Member without a marker.
    #[must_use]
    pub const fn open(name: &'static str) -> Self {
        Self { name, roles: None }
    }

    #[must_use]
    pub fn marker(&self) -> Option<AuthorizeMarker> {
        self.roles.map(AuthorizeMarker::from_static)
    }
}

/// Static descriptor for a resource type: its name and every member the
/// authorization manager may be asked about.
///
/// ```ignore
/// const REPORTS: ResourceType = ResourceType {
///     name: "reports.report",
///     members: &[
///         MemberDescriptor::guarded("export", "admin,auditor"),
///         MemberDescriptor::open("title"),
///     ],
/// };
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ResourceType {
    pub name: &'static str,
    pub members: &'static [MemberDescriptor],
}

impl ResourceType {
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&MemberDescriptor> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Marker declared on the member called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthzError::MemberNotFound`] if the resource type declares no such member.
    pub fn member_marker(&self, name: &str) -> Result<Option<AuthorizeMarker>, AuthzError> {
        self.member(name)
            .map(MemberDescriptor::marker)
            .ok_or_else(|| AuthzError::member_not_found(self.name, name))
    }
}

inventory::collect!(ResourceType);

/// A Rust type that exposes a [`ResourceType`] descriptor.
///
/// Enables the typed `has_permission_for::<T>(ctx, member)` check.
pub trait SecuredResource {
    const RESOURCE_TYPE: ResourceType;
}

/// Register a [`SecuredResource`]'s descriptor with the static marker registry.
#[macro_export]
macro_rules! register_resource {
    ($resource:ty) => {
        $crate::inventory::submit! {
            <$resource as $crate::SecuredResource>::RESOURCE_TYPE
        }
    };
}
