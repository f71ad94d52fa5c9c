//! Public request/response types for the content API.
//!
//! Read endpoints return raw JSON (`serde_json::Value`) unmodified; only
//! the payloads this crate builds itself are typed.

mod admin;
mod enquiry;

pub use admin::{AdminCredentials, AdminSession};
pub use enquiry::Enquiry;
