//! Content collections exposed by the API and their caching policy.

use std::fmt;

use crate::cache::TtlTier;
use crate::{LyceumError, Result};

/// What a successful write to a resource evicts from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalidation {
    /// Nothing was ever cached for this resource.
    Nothing,
    /// Every key of the written resource (all params, all items).
    Resource,
    /// The whole cache. Used where the data is rendered across every page.
    All,
}

/// A content collection on the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Courses,
    Placements,
    Blogs,
    Navbar,
    Footer,
    About,
    Home,
    Enquiries,
}

impl Resource {
    pub const ALL: [Resource; 8] = [
        Resource::Courses,
        Resource::Placements,
        Resource::Blogs,
        Resource::Navbar,
        Resource::Footer,
        Resource::About,
        Resource::Home,
        Resource::Enquiries,
    ];

    /// Path segment under the API base.
    pub fn path(self) -> &'static str {
        match self {
            Resource::Courses => "courses",
            Resource::Placements => "placements",
            Resource::Blogs => "blogs",
            Resource::Navbar => "navbar",
            Resource::Footer => "footer",
            Resource::About => "about",
            Resource::Home => "home",
            Resource::Enquiries => "enquiries",
        }
    }

    /// Freshness tier for reads, or `None` if reads bypass the cache.
    ///
    /// Enquiries are admin-only personal data and are always fetched live.
    pub fn ttl_tier(self) -> Option<TtlTier> {
        match self {
            Resource::Courses | Resource::Placements | Resource::Blogs => Some(TtlTier::Medium),
            Resource::Navbar | Resource::Footer | Resource::About | Resource::Home => {
                Some(TtlTier::Long)
            }
            Resource::Enquiries => None,
        }
    }

    /// Eviction scope after a successful write.
    ///
    /// Navbar, footer and page content are embedded in every rendered page,
    /// so a write there clears everything.
    pub fn invalidation(self) -> Invalidation {
        match self {
            Resource::Courses | Resource::Placements | Resource::Blogs => Invalidation::Resource,
            Resource::Navbar | Resource::Footer | Resource::About | Resource::Home => {
                Invalidation::All
            }
            Resource::Enquiries => Invalidation::Nothing,
        }
    }

    /// Path of one item, e.g. `courses/42`.
    ///
    /// Rejects empty ids and ids that would escape the item segment.
    pub fn item_path(self, id: &str) -> Result<String> {
        if id.is_empty() || id.contains(['/', '?', '#']) {
            return Err(LyceumError::InvalidInput(format!(
                "invalid {} id: '{id}'",
                self.path()
            )));
        }
        Ok(format!("{}/{id}", self.path()))
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
