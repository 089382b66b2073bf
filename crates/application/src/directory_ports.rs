use async_trait::async_trait;
use marquee_core::AppResult;
use marquee_domain::{RemoteRole, RemoteUser};
use serde_json::Value;

/// Pagination and search parameters for a user listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPage {
    /// Zero-based page index.
    pub page: u32,
    /// Page size.
    pub per_page: u32,
    /// Provider-side search query, when given.
    pub search: Option<String>,
}

impl Default for UserPage {
    fn default() -> Self {
        Self {
            page: 0,
            per_page: 50,
            search: None,
        }
    }
}

/// Input for creating a user at the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRemoteUser {
    /// Primary email for the new account.
    pub email: String,
    /// Initial password.
    pub password: String,
    /// Optional display name.
    pub name: Option<String>,
}

/// Port for the identity provider's management surface.
///
/// Implementations own management-credential acquisition; callers never see
/// a management token. User and role documents are proxied, not stored.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Fetches one page of users.
    async fn list_users(&self, page: &UserPage) -> AppResult<Vec<RemoteUser>>;

    /// Fetches a single user document; absent users are a not-found error.
    async fn find_user(&self, user_id: &str) -> AppResult<RemoteUser>;

    /// Creates a user and returns the provider's document for it.
    async fn create_user(&self, user: NewRemoteUser) -> AppResult<RemoteUser>;

    /// Applies a partial update, passed through to the provider unmodified.
    async fn update_user(&self, user_id: &str, updates: Value) -> AppResult<RemoteUser>;

    /// Deletes a user; absent users are a not-found error.
    async fn delete_user(&self, user_id: &str) -> AppResult<()>;

    /// Lists the roles currently attached to a user.
    async fn user_roles(&self, user_id: &str) -> AppResult<Vec<RemoteRole>>;

    /// Attaches roles to a user by provider role id.
    async fn assign_roles(&self, user_id: &str, role_ids: &[String]) -> AppResult<()>;

    /// Lists every role defined at the provider.
    async fn list_roles(&self) -> AppResult<Vec<RemoteRole>>;
}
