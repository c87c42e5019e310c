//! Request DTOs.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/resources/{id}/reservation`.
///
/// The whole body is optional; an absent or blank `until` means midnight.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReserveRequest {
    /// Wall-clock deadline as `HH:MM`.
    #[serde(default)]
    pub until: Option<String>,
}

impl ReserveRequest {
    /// Parses a possibly empty JSON body.
    pub fn from_body(body: &[u8]) -> Result<Self, serde_json::Error> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_means_default() {
        assert!(ReserveRequest::from_body(b"").unwrap().until.is_none());
        assert!(ReserveRequest::from_body(b" \n").unwrap().until.is_none());
        assert!(ReserveRequest::from_body(b"{}").unwrap().until.is_none());
    }

    #[test]
    fn test_parses_until() {
        let req = ReserveRequest::from_body(br#"{"until":"17:30"}"#).unwrap();
        assert_eq!(req.until.as_deref(), Some("17:30"));
        assert!(ReserveRequest::from_body(br#"{"untill":"17:30"}"#).is_err());
    }
}
