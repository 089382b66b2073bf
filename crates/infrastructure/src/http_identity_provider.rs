use async_trait::async_trait;
use marquee_application::{IdentityProvider, NewRemoteUser, UserPage};
use marquee_core::{AppError, AppResult};
use marquee_domain::{RemoteRole, RemoteUser};
use serde::Deserialize;
use serde_json::{Value, json};

/// Connection name used for password-based accounts at the provider.
const DEFAULT_CONNECTION: &str = "Username-Password-Authentication";

/// HTTP client for the identity provider's management API.
///
/// Each operation acquires a short-lived management token via the
/// client-credentials grant; the credential never leaves this adapter.
pub struct HttpIdentityProvider {
    http_client: reqwest::Client,
    token_url: String,
    api_base: String,
    audience: String,
    client_id: String,
    client_secret: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct UsersEnvelope {
    #[serde(default)]
    users: Vec<RemoteUser>,
}

impl HttpIdentityProvider {
    /// Creates a management client for `https://{domain}/api/v2/`.
    #[must_use]
    pub fn new(
        http_client: reqwest::Client,
        domain: &str,
        client_id: String,
        client_secret: String,
    ) -> Self {
        Self {
            http_client,
            token_url: format!("https://{domain}/oauth/token"),
            api_base: format!("https://{domain}/api/v2"),
            audience: format!("https://{domain}/api/v2/"),
            client_id,
            client_secret,
        }
    }

    async fn management_token(&self) -> AppResult<String> {
        let response = self
            .http_client
            .post(self.token_url.as_str())
            .json(&json!({
                "client_id": self.client_id,
                "client_secret": self.client_secret,
                "audience": self.audience,
                "grant_type": "client_credentials",
            }))
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|error| upstream(500, "Failed to get management API token", &error))?;

        let token = response
            .json::<TokenResponse>()
            .await
            .map_err(|error| upstream(500, "Failed to get management API token", &error))?;

        Ok(token.access_token)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        failure: &str,
    ) -> AppResult<T> {
        let token = self.management_token().await?;
        let response = self
            .http_client
            .get(format!("{}{path}", self.api_base))
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .map_err(|error| upstream(500, failure, &error))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound("User not found".to_owned()));
        }
        let response = response
            .error_for_status()
            .map_err(|error| upstream(500, failure, &error))?;

        response
            .json::<T>()
            .await
            .map_err(|error| upstream(500, failure, &error))
    }
}

fn upstream(status: u16, context: &str, error: &dyn std::fmt::Display) -> AppError {
    AppError::Upstream {
        status,
        message: format!("{context}: {error}"),
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn list_users(&self, page: &UserPage) -> AppResult<Vec<RemoteUser>> {
        let mut query = vec![
            ("page", page.page.to_string()),
            ("per_page", page.per_page.to_string()),
            ("include_totals", "true".to_owned()),
        ];
        if let Some(search) = page.search.as_ref() {
            query.push(("q", search.clone()));
        }

        let envelope: UsersEnvelope = self
            .get_json("/users", &query, "Failed to fetch users")
            .await?;
        Ok(envelope.users)
    }

    async fn find_user(&self, user_id: &str) -> AppResult<RemoteUser> {
        self.get_json(&format!("/users/{user_id}"), &[], "Failed to fetch user")
            .await
    }

    async fn create_user(&self, user: NewRemoteUser) -> AppResult<RemoteUser> {
        let token = self.management_token().await?;

        let mut payload = json!({
            "email": user.email,
            "password": user.password,
            "connection": DEFAULT_CONNECTION,
            "email_verified": false,
        });
        if let (Some(name), Some(object)) = (user.name, payload.as_object_mut()) {
            object.insert("name".to_owned(), Value::String(name));
        }

        self.http_client
            .post(format!("{}/users", self.api_base))
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|error| upstream(400, "Failed to create user", &error))?
            .json::<RemoteUser>()
            .await
            .map_err(|error| upstream(400, "Failed to create user", &error))
    }

    async fn update_user(&self, user_id: &str, updates: Value) -> AppResult<RemoteUser> {
        let token = self.management_token().await?;

        let response = self
            .http_client
            .patch(format!("{}/users/{user_id}", self.api_base))
            .bearer_auth(token)
            .json(&updates)
            .send()
            .await
            .map_err(|error| upstream(400, "Failed to update user", &error))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound("User not found".to_owned()));
        }

        response
            .error_for_status()
            .map_err(|error| upstream(400, "Failed to update user", &error))?
            .json::<RemoteUser>()
            .await
            .map_err(|error| upstream(400, "Failed to update user", &error))
    }

    async fn delete_user(&self, user_id: &str) -> AppResult<()> {
        let token = self.management_token().await?;

        let response = self
            .http_client
            .delete(format!("{}/users/{user_id}", self.api_base))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|error| upstream(500, "Failed to delete user", &error))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound("User not found".to_owned()));
        }

        response
            .error_for_status()
            .map_err(|error| upstream(500, "Failed to delete user", &error))?;
        Ok(())
    }

    async fn user_roles(&self, user_id: &str) -> AppResult<Vec<RemoteRole>> {
        self.get_json(
            &format!("/users/{user_id}/roles"),
            &[],
            "Failed to fetch user roles",
        )
        .await
    }

    async fn assign_roles(&self, user_id: &str, role_ids: &[String]) -> AppResult<()> {
        let token = self.management_token().await?;

        self.http_client
            .post(format!("{}/users/{user_id}/roles", self.api_base))
            .bearer_auth(token)
            .json(&json!({ "roles": role_ids }))
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|error| upstream(400, "Failed to assign roles", &error))?;

        Ok(())
    }

    async fn list_roles(&self) -> AppResult<Vec<RemoteRole>> {
        self.get_json("/roles", &[], "Failed to fetch roles").await
    }
}
