//! Authentication module
//!
//! Supplies the headers every data store request carries:
//! - the caller's bearer token (validated before anything else happens)
//! - a service-to-service token from a `ServiceTokenGenerator`
//! - the JSON content type
//!
//! Also resolves the caseworker id embedded in data store URLs.

mod headers;
mod service_token;
mod types;
mod user;

pub use headers::{validate_auth_token, HeaderBuilder, SERVICE_AUTHORIZATION};
pub use service_token::{
    JwtServiceToken, LeaseServiceToken, ServiceTokenGenerator, StaticServiceToken,
};
pub use types::{CachedToken, UserDetails};
pub use user::{IdamUserResolver, StaticUserResolver, UserResolver};
