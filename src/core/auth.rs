//! Authentication and authorization
//!
//! Provides context-based authorization:
//! - [`AuthProvider`] turns request headers into an [`AuthContext`]
//! - [`AuthPolicy`] decides whether a context may perform an operation,
//!   optionally against the owner of the target resource
//! - [`BasicAuthProvider`] verifies HTTP Basic credentials against the
//!   [`UserDirectory`]

use crate::core::error::{BlogError, BlogResult, RequestError};
use crate::core::service::UserDirectory;
use crate::entities::user::{User, UserId};
use async_trait::async_trait;
use axum::http::{HeaderMap, header};
use base64::{Engine, engine::general_purpose::STANDARD};
use std::sync::Arc;

/// Authorization context extracted from a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthContext {
    /// Authenticated user
    User { user_id: UserId, username: String },

    /// No credentials supplied (public access)
    Anonymous,
}

impl AuthContext {
    /// Build the context for a verified user
    pub fn for_user(user: &User) -> Self {
        AuthContext::User {
            user_id: user.id,
            username: user.username.clone(),
        }
    }

    /// Get user_id if available
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            AuthContext::User { user_id, .. } => Some(*user_id),
            AuthContext::Anonymous => None,
        }
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            AuthContext::User { username, .. } => Some(username),
            AuthContext::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !matches!(self, AuthContext::Anonymous)
    }
}

/// Authorization policy for an operation
#[derive(Debug, Clone)]
pub enum AuthPolicy {
    /// Any authenticated user
    Authenticated,

    /// The authenticated user owns the resource
    Owner,
}

impl AuthPolicy {
    /// Check if the context satisfies this policy.
    ///
    /// `owner` is the owner of the target resource, `None` for collection
    /// operations.
    pub fn check(&self, context: &AuthContext, owner: Option<UserId>) -> bool {
        match self {
            AuthPolicy::Authenticated => context.is_authenticated(),

            AuthPolicy::Owner => match (context.user_id(), owner) {
                (Some(user_id), Some(owner)) => user_id == owner,
                _ => false,
            },
        }
    }

    /// Check the policy and turn a refusal into the matching request error:
    /// 401 for anonymous callers, 403 for authenticated ones.
    pub fn enforce(&self, context: &AuthContext, owner: Option<UserId>) -> BlogResult<()> {
        if self.check(context, owner) {
            return Ok(());
        }
        let err = if context.is_authenticated() {
            RequestError::Forbidden {
                message: "You do not have permission to perform this action.".to_string(),
            }
        } else {
            RequestError::Unauthorized {
                message: "Authentication credentials were not provided.".to_string(),
            }
        };
        Err(err.into())
    }
}

/// Trait for auth providers
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Extract the auth context from request headers.
    ///
    /// Absent credentials yield [`AuthContext::Anonymous`]; credentials that
    /// are present but invalid are an error.
    async fn extract_context(&self, headers: &HeaderMap) -> BlogResult<AuthContext>;
}

/// HTTP Basic authentication against a [`UserDirectory`]
#[derive(Clone)]
pub struct BasicAuthProvider {
    users: Arc<dyn UserDirectory>,
}

impl BasicAuthProvider {
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl AuthProvider for BasicAuthProvider {
    async fn extract_context(&self, headers: &HeaderMap) -> BlogResult<AuthContext> {
        let Some(value) = headers.get(header::AUTHORIZATION) else {
            return Ok(AuthContext::Anonymous);
        };
        let (username, password) = parse_basic_credentials(value.as_bytes())?;

        match self.users.verify_password(&username, &password).await? {
            Some(user) => {
                tracing::debug!(user = %user.username, "authenticated request");
                Ok(AuthContext::for_user(&user))
            }
            None => {
                tracing::warn!(user = %username, "rejected credentials");
                Err(unauthorized("Invalid username/password."))
            }
        }
    }
}

fn unauthorized(message: &str) -> BlogError {
    RequestError::Unauthorized {
        message: message.to_string(),
    }
    .into()
}

/// Decode an `Authorization: Basic <base64(user:pass)>` header value
pub fn parse_basic_credentials(value: &[u8]) -> BlogResult<(String, String)> {
    let value = std::str::from_utf8(value)
        .map_err(|_| unauthorized("Invalid basic header. Credentials not correctly encoded."))?;
    let mut parts = value.trim().splitn(2, ' ');
    let scheme = parts.next().unwrap_or_default();
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(unauthorized("Unsupported authorization scheme."));
    }
    let encoded = parts
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| unauthorized("Invalid basic header. No credentials provided."))?;

    let decoded = STANDARD.decode(encoded).map_err(|_| {
        unauthorized("Invalid basic header. Credentials not correctly base64 encoded.")
    })?;
    let decoded = String::from_utf8(decoded)
        .map_err(|_| unauthorized("Invalid basic header. Credentials not correctly encoded."))?;

    let (username, password) = decoded
        .split_once(':')
        .ok_or_else(|| unauthorized("Invalid basic header. Credentials not correctly encoded."))?;
    Ok((username.to_string(), password.to_string()))
}

/// Build an `Authorization` header value for the given credentials
pub fn basic_header(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", username, password)))
}
