//! Enquiry submitted from the contact form.

use serde::{Deserialize, Serialize};

use crate::{LyceumError, Result};

/// A prospective student's enquiry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Enquiry {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Course the enquiry is about, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}

impl Enquiry {
    /// Create an enquiry with the required fields.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: None,
            course: None,
            message: String::new(),
        }
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn course(mut self, course: impl Into<String>) -> Self {
        self.course = Some(course.into());
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Reject enquiries the server would bounce anyway.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(LyceumError::InvalidInput("enquiry name is empty".to_string()));
        }
        if !looks_like_email(self.email.trim()) {
            return Err(LyceumError::InvalidInput(format!(
                "invalid email address: '{}'",
                self.email
            )));
        }
        Ok(())
    }
}

/// `local@domain.tld`, no whitespace. Deliverability is the server's problem.
fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        && !email.chars().any(char::is_whitespace)
}
