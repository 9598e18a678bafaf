#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Role-based authorization for ModKit services.
//!
//! - [`ExecutionContext`] / [`PrincipalSource`] - the principal of the current flow
//! - [`AuthorizeMarker`] - a comma-delimited role requirement
//! - [`authorize!`] / [`call_site!`] - declare and resolve markers on guarded functions
//! - [`ResourceType`], [`SecuredResource`], [`register_resource!`] - markers on resource members
//! - [`MarkerRegistry`] - markers collected from code, configuration, or startup registration
//! - [`AuthorizationManager`], [`RoleAuthorizationManager`] - the decision procedure
//! - [`AuthzConfig`] - YAML/env configuration for the registry
//!
//! ## Usage
//!
//! ```ignore
//! use modkit_role_authz::{
//!     AuthorizationManager, ExecutionContext, RoleAuthorizationManager, authorize, call_site,
//! };
//!
//! authorize!(rotate_keys => "admin");
//!
//! fn rotate_keys(ctx: &ExecutionContext, authz: &RoleAuthorizationManager) -> Result<(), Error> {
//!     if !authz.check_permission(ctx, &call_site!()) {
//!         return Err(Error::Forbidden);
//!     }
//!     // ...
//!     Ok(())
//! }
//!
//! // Once per request, after the caller has been verified:
//! let ctx = ExecutionContext::establish(verified_claims, "password")?;
//! let authz = RoleAuthorizationManager::from_static();
//! rotate_keys(&ctx, &authz)?;
//! ```

pub mod call_site;
pub mod config;
pub mod context;
pub mod error;
pub mod manager;
pub mod marker;
pub mod registry;
pub mod resource;

pub use call_site::{CallSite, MethodMarker};
pub use config::AuthzConfig;
pub use context::{ExecutionContext, PrincipalSource};
pub use error::AuthzError;
pub use manager::{AuthorizationManager, RoleAuthorizationManager};
pub use marker::AuthorizeMarker;
pub use registry::MarkerRegistry;
pub use resource::{MemberDescriptor, ResourceType, SecuredResource};

#[doc(hidden)]
pub use inventory;
