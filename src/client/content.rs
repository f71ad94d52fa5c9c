//! Cached access layer over the content API.
//!
//! [`ContentClient`] is the only component that touches the
//! [`ResponseCache`]: reads go through
//! [`fetch_with_cache`](ResponseCache::fetch_with_cache), and every
//! successful write evicts what it made stale (see
//! [`Resource::invalidation`]). Presentation code only sees the read and
//! write methods below.

use std::sync::{Arc, PoisonError, RwLock};

use reqwest::Method;
use serde_json::Value;
use tracing::info;

use super::resource::{Invalidation, Resource};
use super::transport::Transport;
use crate::cache::{CacheConfig, CacheKey, Params, ResponseCache};
use crate::types::{AdminCredentials, AdminSession, Enquiry};
use crate::{LyceumError, Result};

/// Admin login endpoint, relative to the API base.
const LOGIN_PATH: &str = "admin/login";

/// Content API client with a response cache.
///
/// Construct through [`Lyceum::builder()`](crate::Lyceum::builder).
pub struct ContentClient {
    transport: Arc<dyn Transport>,
    cache: ResponseCache,
    session: RwLock<Option<AdminSession>>,
}

impl ContentClient {
    pub(crate) fn new(transport: Arc<dyn Transport>, cache_config: &CacheConfig) -> Self {
        Self {
            transport,
            cache: ResponseCache::new(cache_config),
            session: RwLock::new(None),
        }
    }

    /// Read-only view of the response cache.
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    // ===== Generic reads =====

    /// List a collection (or read a singleton page) with query parameters.
    pub async fn list(&self, resource: Resource, params: &Params) -> Result<Value> {
        self.read(resource, resource.path(), params).await
    }

    /// Read a single item by id or slug.
    pub async fn get_item(&self, resource: Resource, id: &str) -> Result<Value> {
        let path = resource.item_path(id)?;
        self.read(resource, &path, &Params::new()).await
    }

    async fn read(&self, resource: Resource, path: &str, params: &Params) -> Result<Value> {
        let token = self.token();
        let Some(tier) = resource.ttl_tier() else {
            return self.transport.get(path, params, token.as_deref()).await;
        };

        let key = CacheKey::new(path, params);
        let ttl = self.cache.ttl(tier);
        self.cache
            .fetch_with_cache(key, ttl, || {
                self.transport.get(path, params, token.as_deref())
            })
            .await
    }

    // ===== Site content =====

    pub async fn courses(&self) -> Result<Value> {
        self.list(Resource::Courses, &Params::new()).await
    }

    pub async fn course(&self, id: &str) -> Result<Value> {
        self.get_item(Resource::Courses, id).await
    }

    pub async fn placements(&self) -> Result<Value> {
        self.list(Resource::Placements, &Params::new()).await
    }

    /// Blog listing; typical params are `page`, `limit` and `category`.
    pub async fn blog_posts(&self, params: &Params) -> Result<Value> {
        self.list(Resource::Blogs, params).await
    }

    pub async fn blog_post(&self, slug: &str) -> Result<Value> {
        self.get_item(Resource::Blogs, slug).await
    }

    pub async fn navbar(&self) -> Result<Value> {
        self.list(Resource::Navbar, &Params::new()).await
    }

    pub async fn footer(&self) -> Result<Value> {
        self.list(Resource::Footer, &Params::new()).await
    }

    pub async fn about(&self) -> Result<Value> {
        self.list(Resource::About, &Params::new()).await
    }

    pub async fn home(&self) -> Result<Value> {
        self.list(Resource::Home, &Params::new()).await
    }

    // ===== Writes =====

    /// Create an item in a collection.
    pub async fn create(&self, resource: Resource, body: &Value) -> Result<Value> {
        self.write(resource, Method::POST, resource.path(), Some(body))
            .await
    }

    /// Replace a singleton resource (navbar, footer, about, home).
    pub async fn update(&self, resource: Resource, body: &Value) -> Result<Value> {
        self.write(resource, Method::PUT, resource.path(), Some(body))
            .await
    }

    /// Update one item of a collection.
    pub async fn update_item(&self, resource: Resource, id: &str, body: &Value) -> Result<Value> {
        let path = resource.item_path(id)?;
        self.write(resource, Method::PUT, &path, Some(body)).await
    }

    /// Delete one item of a collection.
    pub async fn delete(&self, resource: Resource, id: &str) -> Result<Value> {
        let path = resource.item_path(id)?;
        self.write(resource, Method::DELETE, &path, None).await
    }

    /// Submit a contact-form enquiry. Validated locally before sending.
    pub async fn submit_enquiry(&self, enquiry: &Enquiry) -> Result<Value> {
        enquiry.validate()?;
        let body = serde_json::to_value(enquiry)?;
        self.create(Resource::Enquiries, &body).await
    }

    /// The cache is only touched once the server has accepted the write.
    async fn write(
        &self,
        resource: Resource,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value> {
        let token = self.token();
        let response = self
            .transport
            .send(method, path, body, token.as_deref())
            .await?;

        match resource.invalidation() {
            Invalidation::Nothing => {}
            Invalidation::Resource => {
                self.cache.invalidate_resource(resource.path());
            }
            Invalidation::All => self.cache.invalidate_all(),
        }
        Ok(response)
    }

    // ===== Admin =====

    /// All enquiries received. Requires an admin session; never cached.
    pub async fn enquiries(&self) -> Result<Value> {
        if !self.is_admin() {
            return Err(LyceumError::AuthenticationFailed);
        }
        self.list(Resource::Enquiries, &Params::new()).await
    }

    /// Log in as admin. Clears the cache: admin reads may differ from
    /// public ones.
    pub async fn login(&self, credentials: &AdminCredentials) -> Result<()> {
        let body = serde_json::to_value(credentials)?;
        let response = self
            .transport
            .send(Method::POST, LOGIN_PATH, Some(&body), None)
            .await?;
        let session: AdminSession = serde_json::from_value(response)?;

        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
        self.cache.invalidate_all();
        info!(email = %credentials.email, "admin logged in");
        Ok(())
    }

    /// Drop the admin session and clear the cache.
    pub fn logout(&self) {
        let previous = self
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        self.cache.invalidate_all();
        if previous.is_some() {
            info!("admin logged out");
        }
    }

    /// Whether an admin session is active.
    pub fn is_admin(&self) -> bool {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn token(&self) -> Option<String> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|session| session.token.clone())
    }
}
