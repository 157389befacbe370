//! User identities
//!
//! Users belong to the surrounding auth subsystem: the API only reads them,
//! authenticates against them and lists the articles they own.

use crate::core::entity::Entity;
use serde::Serialize;
use sha2::{Digest, Sha256};

pub type UserId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: String,

    /// Hex-encoded SHA-256 digest of the password
    #[serde(skip_serializing)]
    pub password_sha256: String,
}

impl User {
    pub fn new(
        id: UserId,
        username: impl Into<String>,
        password_sha256: impl Into<String>,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            password_sha256: password_sha256.into(),
        }
    }

    pub fn check_password(&self, password: &str) -> bool {
        self.password_sha256.eq_ignore_ascii_case(&hash_password(password))
    }
}

impl Entity for User {
    fn resource_name() -> &'static str {
        "users"
    }

    fn lookup_key(&self) -> String {
        self.id.to_string()
    }
}

/// Hex-encoded SHA-256 digest of a password
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}
