//! Configuration for the marker registry.

use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use serde::Deserialize;

use crate::error::AuthzError;

/// Prefix for environment overrides, e.g. `MODKIT_AUTHZ__INCLUDE_STATIC=false`.
pub const ENV_PREFIX: &str = "MODKIT_AUTHZ__";

/// Authorization marker configuration.
///
/// ```yaml
/// include_static: true
/// methods:
///   - call_site: "billing::invoices::void_invoice"
///     roles: "admin,accountant"
/// resources:
///   - name: "billing.invoice"
///     members:
///       - name: "amount"
///         roles: "accountant"
///       - name: "number"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthzConfig {
    /// Merge markers declared in code (`authorize!`, `register_resource!`).
    pub include_static: bool,

    /// Method markers keyed by call-site path.
    pub methods: Vec<MethodMarkerConfig>,

    /// Resource types and their member markers.
    pub resources: Vec<ResourceConfig>,
}

impl Default for AuthzConfig {
    fn default() -> Self {
        Self {
            include_static: true,
            methods: Vec::new(),
            resources: Vec::new(),
        }
    }
}

/// Roles required by one guarded function.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodMarkerConfig {
    /// Full path of the guarded function.
    pub call_site: String,
    /// Comma-delimited role list.
    pub roles: String,
}

/// A resource type declared in configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceConfig {
    pub name: String,
    #[serde(default)]
    pub members: Vec<MemberConfig>,
}

/// A member of a configured resource type.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemberConfig {
    pub name: String,
    /// Comma-delimited role list; absent means the member has no marker.
    #[serde(default)]
    pub roles: Option<String>,
}

impl AuthzConfig {
    /// Load configuration from a YAML file, with `MODKIT_AUTHZ__*` environment overrides.
    ///
    /// A missing file contributes nothing, leaving defaults and overrides.
    ///
    /// # Errors
    ///
    /// Returns [`AuthzError::Config`] if the merged sources do not match the
    /// expected shape.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AuthzError> {
        let path = path.as_ref();
        let config: Self = Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        tracing::debug!(
            path = %path.display(),
            methods = config.methods.len(),
            resources = config.resources.len(),
            "Authorization config loaded"
        );
        Ok(config)
    }

    /// Parse configuration from a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`AuthzError::Config`] if the document does not match the expected shape.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, AuthzError> {
        Ok(Figment::new().merge(Yaml::string(yaml)).extract()?)
    }
}
