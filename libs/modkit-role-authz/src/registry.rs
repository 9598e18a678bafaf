//! Registry mapping guarded elements to their authorization markers.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use modkit_claims::ClaimsError;

use crate::call_site::{CallSite, MethodMarker};
use crate::config::AuthzConfig;
use crate::error::AuthzError;
use crate::marker::AuthorizeMarker;
use crate::resource::ResourceType;

/// Members of one registered resource type.
type MemberMarkers = HashMap<String, Option<AuthorizeMarker>>;

/// Maps call sites and `(resource type, member)` pairs to their markers.
///
/// Populated once at startup from static declarations, configuration, or
/// explicit registration, then shared read-only (typically behind an `Arc`)
/// by the authorization manager.
#[derive(Debug, Clone, Default)]
pub struct MarkerRegistry {
    methods: HashMap<String, AuthorizeMarker>,
    resources: HashMap<String, MemberMarkers>,
}

impl MarkerRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every marker declared with `authorize!` and
    /// `register_resource!` in the linked crates.
    ///
    /// A call site or resource type declared more than once keeps its first
    /// declaration.
    #[must_use]
    pub fn from_static() -> Self {
        let mut registry = Self::new();
        registry.collect_static();
        registry
    }

    /// Registry built from configuration, merged over static declarations
    /// when `include_static` is set.
    ///
    /// Configured markers win. A configured resource type keeps the statically
    /// declared members it does not mention.
    ///
    /// # Errors
    ///
    /// Returns [`AuthzError::InvalidArgument`] if a configured call site,
    /// resource name, member name or role list is empty.
    pub fn from_config(cfg: &AuthzConfig) -> Result<Self, AuthzError> {
        let mut registry = if cfg.include_static {
            Self::from_static()
        } else {
            Self::new()
        };

        for method in &cfg.methods {
            require_non_empty("roles", &method.roles)?;
            registry.register_method(
                CallSite::new(method.call_site.clone()),
                AuthorizeMarker::new(method.roles.clone()),
            )?;
        }

        for resource in &cfg.resources {
            require_non_empty("resource", &resource.name)?;
            registry.resources.entry(resource.name.clone()).or_default();
            for member in &resource.members {
                if let Some(roles) = &member.roles {
                    require_non_empty("roles", roles)?;
                }
                registry.register_member(
                    &resource.name,
                    &member.name,
                    member.roles.clone().map(AuthorizeMarker::new),
                )?;
            }
        }

        tracing::info!(
            methods = registry.methods.len(),
            resources = registry.resources.len(),
            "Authorization marker registry built"
        );
        Ok(registry)
    }

    fn collect_static(&mut self) {
        for marker in inventory::iter::<MethodMarker> {
            match self.methods.entry(marker.call_site.to_owned()) {
                Entry::Vacant(slot) => {
                    slot.insert(AuthorizeMarker::from_static(marker.roles));
                }
                Entry::Occupied(existing) => {
                    tracing::warn!(
                        call_site = marker.call_site,
                        kept = %existing.get(),
                        ignored = marker.roles,
                        "Duplicate authorization marker for call site"
                    );
                }
            }
        }

        for resource in inventory::iter::<ResourceType> {
            if self.resources.contains_key(resource.name) {
                tracing::warn!(
                    resource = resource.name,
                    "Duplicate resource type declaration ignored"
                );
                continue;
            }
            self.register_resource(resource);
        }
    }

    /// Register (or replace) the marker for a call site.
    ///
    /// Returns the marker previously registered for it.
    ///
    /// # Errors
    ///
    /// Returns [`AuthzError::InvalidArgument`] if the call site is empty.
    pub fn register_method(
        &mut self,
        call_site: CallSite,
        marker: AuthorizeMarker,
    ) -> Result<Option<AuthorizeMarker>, AuthzError> {
        require_non_empty("call_site", call_site.as_str())?;
        Ok(self.methods.insert(call_site.into_string(), marker))
    }

    /// Register a resource type with all of its members, replacing any
    /// previous registration under the same name.
    pub fn register_resource(&mut self, resource: &ResourceType) {
        let members = resource
            .members
            .iter()
            .map(|m| (m.name.to_owned(), m.marker()))
            .collect();
        self.resources.insert(resource.name.to_owned(), members);
    }

    /// Register (or replace) one member of a resource type, creating the
    /// resource type if needed.
    ///
    /// # Errors
    ///
    /// Returns [`AuthzError::InvalidArgument`] if `resource` or `member` is empty.
    pub fn register_member(
        &mut self,
        resource: &str,
        member: &str,
        marker: Option<AuthorizeMarker>,
    ) -> Result<(), AuthzError> {
        require_non_empty("resource", resource)?;
        require_non_empty("member", member)?;
        self.resources
            .entry(resource.to_owned())
            .or_default()
            .insert(member.to_owned(), marker);
        Ok(())
    }

    /// Marker registered for `call_site`, if any.
    #[must_use]
    pub fn method_marker(&self, call_site: &CallSite) -> Option<&AuthorizeMarker> {
        self.methods.get(call_site.as_str())
    }

    /// Marker declared on `member` of `resource`.
    ///
    /// `Ok(None)` means the member exists but carries no marker.
    ///
    /// # Errors
    ///
    /// Returns [`AuthzError::ResourceNotFound`] or [`AuthzError::MemberNotFound`]
    /// if the resource type or member is not registered.
    pub fn member_marker(
        &self,
        resource: &str,
        member: &str,
    ) -> Result<Option<&AuthorizeMarker>, AuthzError> {
        let members = self
            .resources
            .get(resource)
            .ok_or_else(|| AuthzError::ResourceNotFound {
                resource: resource.to_owned(),
            })?;

        members
            .get(member)
            .map(Option::as_ref)
            .ok_or_else(|| AuthzError::member_not_found(resource, member))
    }

    #[must_use]
    pub fn contains_resource(&self, resource: &str) -> bool {
        self.resources.contains_key(resource)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty() && self.resources.is_empty()
    }
}

fn require_non_empty(argument: &'static str, value: &str) -> Result<(), AuthzError> {
    if value.is_empty() {
        return Err(ClaimsError::invalid_argument(argument, "cannot be empty").into());
    }
    Ok(())
}
