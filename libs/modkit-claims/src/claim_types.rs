//! Well-known claim type URIs.
//!
//! These are the identifiers an authenticator uses when it turns verified
//! credentials into claims. [`NAME`] and [`ROLE`] are the defaults for an
//! [`Identity`](crate::Identity)'s name and role claim types.

/// The display name of the subject.
pub const NAME: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/name";

/// A role the subject belongs to.
pub const ROLE: &str = "http://schemas.microsoft.com/ws/2008/06/identity/claims/role";

/// Stable subject identifier.
pub const NAME_IDENTIFIER: &str =
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier";

pub const EMAIL: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/emailaddress";

pub const MOBILE_PHONE: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/mobilephone";

pub const HOME_PHONE: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/homephone";

/// The method used to authenticate the subject.
pub const AUTHENTICATION_METHOD: &str =
    "http://schemas.microsoft.com/ws/2008/06/identity/claims/authenticationmethod";
