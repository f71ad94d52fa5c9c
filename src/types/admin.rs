//! Admin login types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Credentials posted to the admin login endpoint.
#[derive(Clone, Serialize, Deserialize)]
pub struct AdminCredentials {
    pub email: String,
    pub password: String,
}

impl AdminCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Session returned by a successful login.
#[derive(Clone, Deserialize)]
pub struct AdminSession {
    pub token: String,
}

impl fmt::Debug for AdminSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminSession")
            .field("token", &"<redacted>")
            .finish()
    }
}
