use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::permissions::PermissionSet;

/// Verified payload decoded from a bearer credential.
///
/// The payload is returned to route handlers unmodified; fields this system
/// does not interpret are preserved in `extra`. The `permissions` field stays
/// optional so a token that carries no permissions claim at all remains
/// distinguishable from one carrying an empty list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Stable subject claim from the identity provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Permission strings granted to the credential, if the claim exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
    /// All remaining claims, proxied without interpretation.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    /// Creates a claims payload granting exactly the given permissions.
    #[must_use]
    pub fn with_permissions(permissions: &[&str]) -> Self {
        Self {
            permissions: Some(permissions.iter().map(|value| (*value).to_owned()).collect()),
            ..Self::default()
        }
    }

    /// Returns the permission set, or an empty set when the claim is absent.
    #[must_use]
    pub fn permission_set(&self) -> PermissionSet {
        PermissionSet::new(self.permissions.clone().unwrap_or_default())
    }

    /// Returns whether a permissions claim is present at all.
    #[must_use]
    pub fn has_permissions_claim(&self) -> bool {
        self.permissions.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::Claims;

    #[test]
    fn absent_claim_differs_from_empty_list() {
        let absent = Claims::default();
        let empty = Claims {
            permissions: Some(Vec::new()),
            ..Claims::default()
        };

        assert!(!absent.has_permissions_claim());
        assert!(empty.has_permissions_claim());
        assert!(absent.permission_set().is_empty());
        assert!(empty.permission_set().is_empty());
    }

    #[test]
    fn unknown_claims_survive_a_round_trip() {
        let json = serde_json::json!({
            "sub": "auth0|abc",
            "permissions": ["get:movies"],
            "azp": "client-id",
            "iss": "https://tenant.example.com/"
        });
        let claims: Claims = serde_json::from_value(json.clone()).unwrap_or_default();
        assert_eq!(claims.sub.as_deref(), Some("auth0|abc"));
        assert_eq!(serde_json::to_value(&claims).ok(), Some(json));
    }
}
