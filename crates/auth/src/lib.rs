//! `kanmind-auth` — authentication boundary and authorization engine.
//!
//! This crate is intentionally decoupled from HTTP and storage: it takes an
//! authenticated actor plus already-resolved relation facts and returns a
//! decision. Signature verification is the only IO-adjacent concern here and
//! lives behind the [`JwtValidator`] trait.

pub mod claims;
pub mod policy;
pub mod validator;

pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use policy::{
    AccessError, CreateTarget, ParentRef, RelationFacts, ResourceKind, Verb, check, precheck,
};
pub use validator::{Hs256JwtValidator, JwtValidator};
