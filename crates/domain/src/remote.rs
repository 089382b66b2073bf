use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identity-provider user document, proxied rather than stored.
///
/// Only the fields the hierarchy engine reads are typed; everything else the
/// provider returns is carried through `extra` unmodified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteUser {
    /// Provider-assigned user identifier.
    pub user_id: String,
    /// Primary email, when the provider returns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Display name, when the provider returns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Permission strings attached to the user document, when present.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,
    /// All remaining provider fields, proxied without interpretation.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Identity-provider role document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRole {
    /// Provider-assigned role identifier.
    pub id: String,
    /// Role display name; matched against the fixed three-tier roles.
    pub name: String,
    /// Role description, when the provider returns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
