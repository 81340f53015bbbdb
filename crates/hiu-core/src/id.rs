//! Identifiers carried across the two gateway legs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, Result};

/// Identifier linking an outbound gateway request to its eventual callback.
///
/// A fresh random (v4) value is generated for every outbound call, so a retry
/// never collides with a stale reply from an earlier attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Key under which the correlated reply is cached.
    pub fn cache_key(&self) -> String {
        self.0.to_string()
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CorrelationId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| CoreError::invalid_correlation_id(s))
    }
}

impl From<Uuid> for CorrelationId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Generates a new request id for messages that are not awaited
/// (acknowledgements, notifications).
pub fn generate_request_id() -> Uuid {
    Uuid::new_v4()
}

/// Extracts the consent manager suffix used to route a message through the
/// gateway, e.g. `"sbx"` for `"alice@sbx"`.
pub fn routing_suffix(health_id: &str) -> Result<&str> {
    match health_id.split_once('@') {
        Some((user, suffix)) if !user.is_empty() && !suffix.is_empty() => Ok(suffix),
        _ => Err(CoreError::invalid_health_id(health_id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correlation_ids_are_unique() {
        let a = CorrelationId::new();
        let b = CorrelationId::new();
        assert_ne!(a, b);
        assert_ne!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn test_correlation_id_parse_and_display() {
        let id = CorrelationId::new();
        let parsed: CorrelationId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);

        let err = "nope".parse::<CorrelationId>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidCorrelationId(_)));
    }

    #[test]
    fn test_correlation_id_serializes_as_plain_uuid() {
        let uuid = Uuid::parse_str("5f7a535d-a3fd-416b-b069-c97d021fbacd").unwrap();
        let json = serde_json::to_string(&CorrelationId::from(uuid)).unwrap();
        assert_eq!(json, "\"5f7a535d-a3fd-416b-b069-c97d021fbacd\"");
    }

    #[test]
    fn test_routing_suffix() {
        assert_eq!(routing_suffix("alice@sbx").unwrap(), "sbx");
        assert!(routing_suffix("alice").is_err());
        assert!(routing_suffix("alice@").is_err());
        assert!(routing_suffix("@sbx").is_err());
    }
}
