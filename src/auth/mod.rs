//! Authentication module
//!
//! Supports: none, static bearer token, Google service account (JWT bearer grant)
//!
//! The `Authenticator` applies credentials to Drive requests and caches the
//! access token obtained from a service account key until it expires.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{AuthConfig, CachedToken, ServiceAccountKey};

#[cfg(test)]
mod tests;
