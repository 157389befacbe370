//! Absolute hyperlinks between resources
//!
//! Representations reference each other by absolute URL. The base of those
//! URLs comes from the configured public URL when there is one, otherwise
//! from the request itself (`X-Forwarded-Proto` and `Host`).

use crate::core::entity::Entity;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::{HeaderMap, Uri, header, request::Parts};
use std::convert::Infallible;

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Externally visible base URL configured for the server, if any
#[derive(Debug, Clone, Default)]
pub struct PublicUrl(pub Option<String>);

/// URL builder bound to the base URL of the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Links {
    base: String,
}

impl Links {
    /// Build from a base such as `https://blog.example.com`.
    /// Trailing slashes are ignored.
    pub fn new(base: impl AsRef<str>) -> Self {
        Self {
            base: base.as_ref().trim_end_matches('/').to_string(),
        }
    }

    /// Derive the base from request headers, falling back to the URI
    /// authority and finally `localhost`
    pub fn from_request(headers: &HeaderMap, uri: &Uri) -> Self {
        let scheme = headers
            .get(FORWARDED_PROTO)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .or_else(|| uri.scheme_str())
            .unwrap_or("http");

        let host = headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .or_else(|| uri.authority().map(|a| a.to_string()))
            .unwrap_or_else(|| "localhost".to_string());

        Self::new(format!("{}://{}", scheme, host))
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// `{base}/{resource}/`
    pub fn collection_named(&self, resource: &str) -> String {
        format!("{}/{}/", self.base, resource)
    }

    /// `{base}/{resource}/{lookup_key}/`
    pub fn detail<E: Entity>(&self, entity: &E) -> String {
        format!("{}/{}/{}/", self.base, E::resource_name(), entity.lookup_key())
    }
}

impl<S> FromRequestParts<S> for Links
where
    PublicUrl: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match PublicUrl::from_ref(state).0 {
            Some(url) => Ok(Links::new(url)),
            None => Ok(Links::from_request(&parts.headers, &parts.uri)),
        }
    }
}
