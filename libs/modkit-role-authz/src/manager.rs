//! Role-based authorization manager.

use std::sync::Arc;

use modkit_claims::ClaimsError;

use crate::call_site::CallSite;
use crate::context::PrincipalSource;
use crate::error::AuthzError;
use crate::marker::AuthorizeMarker;
use crate::registry::MarkerRegistry;
use crate::resource::SecuredResource;

/// Decides whether the principal of an execution context may proceed.
///
/// Every "no" is an ordinary `false`: no marker, no principal, or no
/// matching role. Errors are reserved for malformed calls (empty role,
/// unknown resource type or member).
pub trait AuthorizationManager: Send + Sync {
    /// Whether the principal satisfies the marker registered for `call_site`.
    ///
    /// A guarded function passes its own [`call_site!`](crate::call_site).
    fn check_permission(&self, ctx: &dyn PrincipalSource, call_site: &CallSite) -> bool;

    /// Whether the principal satisfies the marker on `member` of `resource_type`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthzError::ResourceNotFound`] or [`AuthzError::MemberNotFound`]
    /// if the member cannot be resolved.
    fn has_permission(
        &self,
        ctx: &dyn PrincipalSource,
        resource_type: &str,
        member: &str,
    ) -> Result<bool, AuthzError>;

    /// Whether the principal is in `role`. `Ok(false)` when no principal is installed.
    ///
    /// # Errors
    ///
    /// Returns [`AuthzError::InvalidArgument`] if `role` is empty.
    fn is_in_role(&self, ctx: &dyn PrincipalSource, role: &str) -> Result<bool, AuthzError>;

    /// Typed form of [`has_permission`](Self::has_permission).
    ///
    /// The default resolves against `T`'s own descriptor. Managers that hold
    /// a registry resolve through it instead, so configured markers apply.
    ///
    /// # Errors
    ///
    /// Returns [`AuthzError::MemberNotFound`] if `T` declares no such member.
    fn has_permission_for<T>(
        &self,
        ctx: &dyn PrincipalSource,
        member: &str,
    ) -> Result<bool, AuthzError>
    where
        T: SecuredResource,
        Self: Sized,
    {
        descriptor_permission::<T>(ctx, member)
    }
}

/// [`AuthorizationManager`] backed by a [`MarkerRegistry`].
///
/// Holds no per-call state; cheap to clone and share.
#[derive(Debug, Clone, Default)]
pub struct RoleAuthorizationManager {
    registry: Arc<MarkerRegistry>,
}

impl RoleAuthorizationManager {
    #[must_use]
    pub fn new(registry: Arc<MarkerRegistry>) -> Self {
        Self { registry }
    }

    /// Manager over every statically declared marker.
    #[must_use]
    pub fn from_static() -> Self {
        Self::new(Arc::new(MarkerRegistry::from_static()))
    }

    #[must_use]
    pub fn registry(&self) -> &MarkerRegistry {
        &self.registry
    }

    /// Whether the principal satisfies an explicitly supplied marker.
    #[must_use]
    pub fn authorize(&self, ctx: &dyn PrincipalSource, marker: &AuthorizeMarker) -> bool {
        marker.is_satisfied_by(ctx.current_principal())
    }
}

impl AuthorizationManager for RoleAuthorizationManager {
    fn check_permission(&self, ctx: &dyn PrincipalSource, call_site: &CallSite) -> bool {
        let Some(marker) = self.registry.method_marker(call_site) else {
            tracing::debug!(%call_site, "No authorization marker registered for call site");
            return false;
        };

        let decision = marker.is_satisfied_by(ctx.current_principal());
        tracing::debug!(
            %call_site,
            roles = marker.roles(),
            decision,
            "Call site permission checked"
        );
        decision
    }

    fn has_permission(
        &self,
        ctx: &dyn PrincipalSource,
        resource_type: &str,
        member: &str,
    ) -> Result<bool, AuthzError> {
        let marker = self
            .registry
            .member_marker(resource_type, member)
            .inspect_err(|e| {
                tracing::debug!(
                    resource = resource_type,
                    member,
                    error = %e,
                    "Member lookup failed"
                );
            })?;
        Ok(decide(ctx, marker, resource_type, member))
    }

    /// Resolves through the registry when it knows `T`'s resource type,
    /// otherwise through `T`'s descriptor.
    fn has_permission_for<T>(
        &self,
        ctx: &dyn PrincipalSource,
        member: &str,
    ) -> Result<bool, AuthzError>
    where
        T: SecuredResource,
    {
        let resource = T::RESOURCE_TYPE.name;
        if self.registry.contains_resource(resource) {
            self.has_permission(ctx, resource, member)
        } else {
            descriptor_permission::<T>(ctx, member)
        }
    }

    fn is_in_role(&self, ctx: &dyn PrincipalSource, role: &str) -> Result<bool, AuthzError> {
        if role.is_empty() {
            return Err(ClaimsError::invalid_argument("role", "cannot be empty").into());
        }
        match ctx.current_principal() {
            Some(principal) => principal.is_in_role(role).map_err(AuthzError::from),
            None => Ok(false),
        }
    }
}

fn descriptor_permission<T: SecuredResource>(
    ctx: &dyn PrincipalSource,
    member: &str,
) -> Result<bool, AuthzError> {
    let resource = T::RESOURCE_TYPE;
    let marker = resource.member_marker(member).inspect_err(|e| {
        tracing::debug!(resource = resource.name, member, error = %e, "Member lookup failed");
    })?;
    Ok(decide(ctx, marker.as_ref(), resource.name, member))
}

fn decide(
    ctx: &dyn PrincipalSource,
    marker: Option<&AuthorizeMarker>,
    resource: &str,
    member: &str,
) -> bool {
    let Some(marker) = marker else {
        tracing::debug!(resource, member, "Member carries no authorization marker");
        return false;
    };

    let decision = marker.is_satisfied_by(ctx.current_principal());
    tracing::debug!(
        resource,
        member,
        roles = marker.roles(),
        decision,
        "Member permission checked"
    );
    decision
}
