//! Lyceum - cached client for a training institute's content API
//!
//! This crate talks to the institute site's REST API (courses, placements,
//! blog posts, page content, enquiries) and keeps idempotent reads in a
//! time-bounded in-memory [`ResponseCache`](cache::ResponseCache). Writes
//! evict whatever they made stale.
//!
//! # Example
//!
//! ```rust,no_run
//! use lyceum::{Lyceum, cache::Params};
//!
//! #[tokio::main]
//! async fn main() -> lyceum::Result<()> {
//!     let client = Lyceum::builder()
//!         .base_url("https://institute.example.com/api")
//!         .build()?;
//!
//!     // First call hits the network, the second is served from cache.
//!     let courses = client.courses().await?;
//!     let again = client.courses().await?;
//!     assert_eq!(courses, again);
//!
//!     let posts = client
//!         .blog_posts(&Params::new().with("page", 2).with("category", "cloud"))
//!         .await?;
//!     println!("{posts:#}");
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod telemetry;
pub mod types;
mod version;

// Re-export main types at crate root
pub use client::{ContentClient, Lyceum, LyceumBuilder, Resource};
pub use error::{LyceumError, Result};
pub use version::{GIT_BRANCH, GIT_SHA, PKG_VERSION, version_string};

pub use types::{AdminCredentials, AdminSession, Enquiry};
