//! `Identity` extractor: reads the caller principal from the configured header.
//!
//! ResHub trusts whatever the fronting proxy puts in the header. Values are
//! opaque and compared byte-for-byte.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated caller as asserted by the proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity(pub String);

impl std::ops::Deref for Identity {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for Identity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = state.config.auth.identity_header.as_str();

        let value = parts
            .headers
            .get(header)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ApiError::unknown_identity(header))?;

        Ok(Identity(value.to_string()))
    }
}
