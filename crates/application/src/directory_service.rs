use std::sync::Arc;

use marquee_core::{AppError, AppResult};
use marquee_domain::{
    Decision, PermissionSet, RemoteRole, RemoteUser, hierarchy,
};
use serde_json::Value;

use crate::directory_ports::{IdentityProvider, NewRemoteUser, UserPage};

/// Default role granted to newly created users when none is requested.
const DEFAULT_ROLE: &str = "Casting Assistant";

/// A user listing scoped to what the manager may observe.
#[derive(Debug, Clone, PartialEq)]
pub struct UserListing {
    /// The visible users.
    pub users: Vec<RemoteUser>,
    /// Count of visible users (after filtering, not the provider total).
    pub total: usize,
    /// Echo of the requested page index.
    pub page: u32,
    /// Echo of the requested page size.
    pub per_page: u32,
    /// The manager's own derived role level.
    pub your_role_level: u8,
}

/// A role listing scoped to what the manager may grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleListing {
    /// The grantable roles.
    pub roles: Vec<RemoteRole>,
    /// Count of grantable roles.
    pub total: usize,
    /// The manager's own derived role level.
    pub your_role_level: u8,
}

/// Input for user creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateUserInput {
    /// Primary email; required.
    pub email: Option<String>,
    /// Initial password; required.
    pub password: Option<String>,
    /// Optional display name.
    pub name: Option<String>,
    /// Role to grant; defaults to Casting Assistant when absent.
    pub role: Option<String>,
}

/// Result of user creation.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedUser {
    /// The provider's document for the new user.
    pub user: RemoteUser,
    /// Name of the role that was granted.
    pub role_assigned: String,
}

/// Application service proxying the identity provider's user directory,
/// with every mutation gated by the role hierarchy.
#[derive(Clone)]
pub struct DirectoryService {
    provider: Arc<dyn IdentityProvider>,
}

impl DirectoryService {
    /// Creates a directory service from a provider implementation.
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    /// Lists users, restricted to those the manager may observe.
    pub async fn list_users(
        &self,
        manager: &PermissionSet,
        page: UserPage,
    ) -> AppResult<UserListing> {
        let users = self.provider.list_users(&page).await?;
        let users = hierarchy::filter_users(users, manager);

        Ok(UserListing {
            total: users.len(),
            page: page.page,
            per_page: page.per_page,
            your_role_level: hierarchy::derive_level(manager),
            users,
        })
    }

    /// Fetches a single user the manager is allowed to manage.
    pub async fn get_user(&self, manager: &PermissionSet, user_id: &str) -> AppResult<RemoteUser> {
        let user = self.provider.find_user(user_id).await?;
        self.enforce_manage(manager, user_id).await?;
        Ok(user)
    }

    /// Creates a user and grants the requested role (Casting Assistant by
    /// default).
    ///
    /// The assignment check runs before any provider call, so a manager who
    /// may not grant the role never creates the account either.
    pub async fn create_user(
        &self,
        manager: &PermissionSet,
        input: CreateUserInput,
    ) -> AppResult<CreatedUser> {
        let (Some(email), Some(password)) = (input.email, input.password) else {
            return Err(AppError::BadRequest(
                "Email and password are required".to_owned(),
            ));
        };

        let role_name = input.role.unwrap_or_else(|| DEFAULT_ROLE.to_owned());
        enforce(hierarchy::can_assign(manager, role_name.as_str()))?;

        let user = self
            .provider
            .create_user(NewRemoteUser {
                email,
                password,
                name: input.name,
            })
            .await?;

        // Role names map to provider role ids via the role listing; a role
        // missing at the provider leaves the user roleless rather than
        // failing creation.
        let role_id = self
            .provider
            .list_roles()
            .await?
            .into_iter()
            .find(|role| role.name == role_name)
            .map(|role| role.id);
        if let Some(role_id) = role_id {
            self.provider
                .assign_roles(user.user_id.as_str(), &[role_id])
                .await?;
        }

        Ok(CreatedUser {
            user,
            role_assigned: role_name,
        })
    }

    /// Applies a partial update to a user the manager may manage. The update
    /// document is forwarded to the provider unmodified.
    pub async fn update_user(
        &self,
        manager: &PermissionSet,
        user_id: &str,
        updates: Value,
    ) -> AppResult<RemoteUser> {
        self.enforce_manage(manager, user_id).await?;
        self.provider.update_user(user_id, updates).await
    }

    /// Deletes a user the manager may manage; returns the deleted id.
    pub async fn delete_user(&self, manager: &PermissionSet, user_id: &str) -> AppResult<String> {
        self.enforce_manage(manager, user_id).await?;
        self.provider.delete_user(user_id).await?;
        Ok(user_id.to_owned())
    }

    /// Lists the roles attached to a user. Read-only and unfiltered.
    pub async fn user_roles(&self, user_id: &str) -> AppResult<Vec<RemoteRole>> {
        self.provider.user_roles(user_id).await
    }

    /// Attaches roles to a user by provider role id.
    ///
    /// The manager must be allowed to manage the target, and to grant every
    /// requested role that resolves to a known name. Ids the provider does
    /// not know pass through for the provider itself to reject.
    pub async fn assign_roles(
        &self,
        manager: &PermissionSet,
        user_id: &str,
        role_ids: Vec<String>,
    ) -> AppResult<()> {
        self.enforce_manage(manager, user_id).await?;

        let all_roles = self.provider.list_roles().await?;
        for role_id in &role_ids {
            if let Some(role) = all_roles.iter().find(|role| &role.id == role_id) {
                enforce(hierarchy::can_assign(manager, role.name.as_str()))?;
            }
        }

        self.provider.assign_roles(user_id, &role_ids).await
    }

    /// Lists the roles the manager may grant.
    pub async fn list_roles(&self, manager: &PermissionSet) -> AppResult<RoleListing> {
        let roles = self.provider.list_roles().await?;
        let roles = hierarchy::assignable_roles(manager, roles);

        Ok(RoleListing {
            total: roles.len(),
            your_role_level: hierarchy::derive_level(manager),
            roles,
        })
    }

    async fn enforce_manage(&self, manager: &PermissionSet, user_id: &str) -> AppResult<()> {
        let target_roles = self.provider.user_roles(user_id).await?;
        enforce(hierarchy::can_manage(manager, &target_roles))
    }
}

fn enforce(decision: Decision) -> AppResult<()> {
    match decision {
        Decision::Allow => Ok(()),
        Decision::Deny(reason) => Err(AppError::Forbidden(reason)),
    }
}
