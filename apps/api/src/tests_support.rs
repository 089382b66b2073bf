use async_trait::async_trait;
use marquee_application::{IdentityProvider, NewRemoteUser, UserPage};
use marquee_core::{AppError, AppResult};
use marquee_domain::{RemoteRole, RemoteUser};
use serde_json::Value;

/// Identity provider stub for handler tests that never reach the directory.
pub struct NullIdentityProvider;

#[async_trait]
impl IdentityProvider for NullIdentityProvider {
    async fn list_users(&self, _page: &UserPage) -> AppResult<Vec<RemoteUser>> {
        Ok(Vec::new())
    }

    async fn find_user(&self, _user_id: &str) -> AppResult<RemoteUser> {
        Err(AppError::NotFound("User not found".to_owned()))
    }

    async fn create_user(&self, user: NewRemoteUser) -> AppResult<RemoteUser> {
        Ok(RemoteUser {
            user_id: format!("auth0|{}", user.email),
            email: Some(user.email),
            name: user.name,
            ..RemoteUser::default()
        })
    }

    async fn update_user(&self, _user_id: &str, _updates: Value) -> AppResult<RemoteUser> {
        Err(AppError::NotFound("User not found".to_owned()))
    }

    async fn delete_user(&self, _user_id: &str) -> AppResult<()> {
        Err(AppError::NotFound("User not found".to_owned()))
    }

    async fn user_roles(&self, _user_id: &str) -> AppResult<Vec<RemoteRole>> {
        Ok(Vec::new())
    }

    async fn assign_roles(&self, _user_id: &str, _role_ids: &[String]) -> AppResult<()> {
        Ok(())
    }

    async fn list_roles(&self) -> AppResult<Vec<RemoteRole>> {
        Ok(Vec::new())
    }
}
