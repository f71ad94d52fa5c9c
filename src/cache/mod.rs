//! Caching subsystem.
//!
//! - [`key`]: deterministic [`CacheKey`] derivation from a resource path
//!   and a flat [`Params`] set.
//!
//! - [`response::ResponseCache`]: in-memory TTL cache in front of the
//!   content API. Owned by [`ContentClient`](crate::ContentClient); each
//!   client (and each test) gets its own instance. See the [`response`]
//!   module docs for expiry and concurrency notes.

pub mod key;
pub mod response;

pub use key::{CacheKey, Params};
pub use response::{CacheConfig, ResponseCache, TtlTier};
