//! Identity configuration.
//!
//! ResHub does not authenticate anyone. A fronting proxy (SSO gateway,
//! ingress with OIDC, ...) authenticates the caller and forwards the
//! resulting principal in a request header.

use serde::{Deserialize, Serialize};

/// Identity extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Request header carrying the authenticated principal.
    #[serde(default = "default_identity_header")]
    pub identity_header: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            identity_header: default_identity_header(),
        }
    }
}

fn default_identity_header() -> String {
    "x-remote-user".to_string()
}
