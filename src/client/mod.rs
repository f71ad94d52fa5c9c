//! Access layer for the content API.

pub mod builder;
pub mod content;
pub mod resource;
pub mod transport;

pub use builder::{Lyceum, LyceumBuilder};
pub use content::ContentClient;
pub use resource::{Invalidation, Resource};
pub use transport::{HttpTransport, Transport};
