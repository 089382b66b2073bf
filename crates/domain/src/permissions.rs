use serde::{Deserialize, Serialize};

/// Permission granting read access to movies.
pub const GET_MOVIES: &str = "get:movies";
/// Permission granting movie creation.
pub const POST_MOVIES: &str = "post:movies";
/// Permission granting movie updates.
pub const PATCH_MOVIES: &str = "patch:movies";
/// Permission granting movie deletion.
pub const DELETE_MOVIES: &str = "delete:movies";
/// Permission granting read access to actors.
pub const GET_ACTORS: &str = "get:actors";
/// Permission granting actor creation.
pub const POST_ACTORS: &str = "post:actors";
/// Permission granting actor updates.
pub const PATCH_ACTORS: &str = "patch:actors";
/// Permission granting actor deletion.
pub const DELETE_ACTORS: &str = "delete:actors";
/// Permission granting cast assignment.
pub const POST_CASTING: &str = "post:casting";
/// Permission granting cast removal.
pub const DELETE_CASTING: &str = "delete:casting";
/// Permission granting read access to remote users.
pub const GET_USERS: &str = "get:users";
/// Permission granting remote user creation.
pub const POST_USERS: &str = "post:users";
/// Permission granting remote user updates.
pub const PATCH_USERS: &str = "patch:users";
/// Permission granting remote user deletion.
pub const DELETE_USERS: &str = "delete:users";

/// Permissions that may be exercised without a credential.
pub const PUBLIC: &[&str] = &[GET_MOVIES, GET_ACTORS];

/// The full fixed permission vocabulary.
pub const ALL: &[&str] = &[
    GET_MOVIES,
    POST_MOVIES,
    PATCH_MOVIES,
    DELETE_MOVIES,
    GET_ACTORS,
    POST_ACTORS,
    PATCH_ACTORS,
    DELETE_ACTORS,
    POST_CASTING,
    DELETE_CASTING,
    GET_USERS,
    POST_USERS,
    PATCH_USERS,
    DELETE_USERS,
];

/// A set of opaque permission tokens carried by a verified credential.
///
/// Permission strings are never interpreted beyond exact, case-sensitive
/// membership checks. Tokens issued by the identity provider may carry
/// values outside the fixed vocabulary; those are retained but grant
/// nothing here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(Vec<String>);

impl PermissionSet {
    /// Creates a permission set from raw permission strings.
    #[must_use]
    pub fn new(permissions: Vec<String>) -> Self {
        Self(permissions)
    }

    /// Creates a permission set from the fixed vocabulary slices above.
    #[must_use]
    pub fn from_static(permissions: &[&str]) -> Self {
        Self(permissions.iter().map(|value| (*value).to_owned()).collect())
    }

    /// Returns whether the set contains the permission, by exact match.
    #[must_use]
    pub fn contains(&self, permission: &str) -> bool {
        self.0.iter().any(|value| value == permission)
    }

    /// Returns whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the raw permission strings.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        self.0.as_slice()
    }
}

impl From<Vec<String>> for PermissionSet {
    fn from(permissions: Vec<String>) -> Self {
        Self(permissions)
    }
}

#[cfg(test)]
mod tests {
    use super::{ALL, GET_MOVIES, PUBLIC, PermissionSet};

    #[test]
    fn membership_is_exact_match_only() {
        let set = PermissionSet::from_static(&[GET_MOVIES]);
        assert!(set.contains("get:movies"));
        assert!(!set.contains("get:Movies"));
        assert!(!set.contains("get:movie"));
        assert!(!set.contains("get:"));
    }

    #[test]
    fn unknown_tokens_are_retained_but_opaque() {
        let set = PermissionSet::new(vec!["custom:thing".to_owned()]);
        assert!(set.contains("custom:thing"));
        assert!(!set.contains("custom:*"));
    }

    #[test]
    fn public_set_is_a_subset_of_the_vocabulary() {
        for permission in PUBLIC {
            assert!(ALL.contains(permission));
        }
    }
}
