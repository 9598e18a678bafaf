#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Claims-based identity model.
//!
//! - [`Claim`] - an immutable `(type, value)` assertion
//! - [`Identity`] - an ordered claim collection plus authentication metadata
//! - [`Principal`] - the holder of the active identity, answering role queries
//! - [`claim_types`] - well-known claim type URIs
//!
//! ```ignore
//! use modkit_claims::{Claim, Identity, Principal, claim_types};
//!
//! let identity = Identity::builder()
//!     .authentication_type("password")
//!     .claim(Claim::new(claim_types::NAME, "alice")?)
//!     .claim(Claim::new(claim_types::ROLE, "admin")?)
//!     .build()?;
//!
//! let principal = Principal::new(identity);
//! assert!(principal.is_in_role("admin")?);
//! ```

pub mod claim;
pub mod claim_types;
pub mod error;
pub mod identity;
pub mod principal;

pub use claim::Claim;
pub use error::ClaimsError;
pub use identity::{Identity, IdentityBuilder};
pub use principal::Principal;
