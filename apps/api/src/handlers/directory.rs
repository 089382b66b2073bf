use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use marquee_application::{CreateUserInput, UserPage};
use marquee_core::AppError;
use marquee_domain::permissions;
use serde_json::Value;

use crate::auth;
use crate::dto::{
    AssignRolesRequest, CreateUserRequest, CreatedUserResponse, DeletedUserResponse,
    MessageResponse, RolesResponse, UserListQuery, UserResponse, UserRolesResponse, UsersResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_users_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<UserListQuery>,
) -> ApiResult<Json<UsersResponse>> {
    let claims = auth::authorize(&state, permissions::GET_USERS, &headers).await?;

    let page = UserPage {
        page: query.page.unwrap_or(0),
        per_page: query.per_page.unwrap_or(50),
        search: query.search,
    };
    let listing = state
        .directory_service
        .list_users(&claims.permission_set(), page)
        .await?;

    Ok(Json(UsersResponse::from(listing)))
}

pub async fn get_user_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    let claims = auth::authorize(&state, permissions::GET_USERS, &headers).await?;

    let user = state
        .directory_service
        .get_user(&claims.permission_set(), user_id.as_str())
        .await?;

    Ok(Json(UserResponse {
        success: true,
        user,
    }))
}

pub async fn create_user_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<CreatedUserResponse>)> {
    let claims = auth::authorize(&state, permissions::POST_USERS, &headers).await?;

    let created = state
        .directory_service
        .create_user(
            &claims.permission_set(),
            CreateUserInput {
                email: payload.email,
                password: payload.password,
                name: payload.name,
                role: payload.role,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(CreatedUserResponse::from(created))))
}

pub async fn update_user_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
    Json(updates): Json<Value>,
) -> ApiResult<Json<UserResponse>> {
    let claims = auth::authorize(&state, permissions::PATCH_USERS, &headers).await?;

    if !updates.as_object().is_some_and(|object| !object.is_empty()) {
        return Err(AppError::BadRequest("bad request".to_owned()).into());
    }

    let user = state
        .directory_service
        .update_user(&claims.permission_set(), user_id.as_str(), updates)
        .await?;

    Ok(Json(UserResponse {
        success: true,
        user,
    }))
}

pub async fn delete_user_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
) -> ApiResult<Json<DeletedUserResponse>> {
    let claims = auth::authorize(&state, permissions::DELETE_USERS, &headers).await?;

    let deleted = state
        .directory_service
        .delete_user(&claims.permission_set(), user_id.as_str())
        .await?;

    Ok(Json(DeletedUserResponse {
        success: true,
        deleted,
    }))
}

pub async fn user_roles_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
) -> ApiResult<Json<UserRolesResponse>> {
    auth::authorize(&state, permissions::GET_USERS, &headers).await?;

    let roles = state.directory_service.user_roles(user_id.as_str()).await?;
    Ok(Json(UserRolesResponse {
        success: true,
        roles,
    }))
}

pub async fn assign_roles_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
    Json(payload): Json<AssignRolesRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let claims = auth::authorize(&state, permissions::POST_USERS, &headers).await?;

    let Some(role_ids) = payload.roles else {
        return Err(AppError::BadRequest("Roles array is required".to_owned()).into());
    };

    state
        .directory_service
        .assign_roles(&claims.permission_set(), user_id.as_str(), role_ids)
        .await?;

    Ok(Json(MessageResponse::new("Roles assigned successfully")))
}

pub async fn list_roles_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<RolesResponse>> {
    let claims = auth::authorize(&state, permissions::GET_USERS, &headers).await?;

    let listing = state
        .directory_service
        .list_roles(&claims.permission_set())
        .await?;

    Ok(Json(RolesResponse::from(listing)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::Json;
    use axum::extract::{Path, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::IntoResponse;
    use marquee_application::{AccessService, CatalogService, DirectoryService, TokenVerifier};
    use marquee_core::AuthError;
    use marquee_domain::Claims;
    use marquee_infrastructure::InMemoryCatalogRepository;
    use serde_json::json;

    use super::{assign_roles_handler, list_roles_handler, update_user_handler};
    use crate::dto::AssignRolesRequest;
    use crate::state::AppState;
    use crate::tests_support::NullIdentityProvider;

    struct RejectingVerifier;

    #[async_trait::async_trait]
    impl TokenVerifier for RejectingVerifier {
        async fn verify(&self, _token: &str) -> Result<Claims, AuthError> {
            Err(AuthError::MalformedToken)
        }
    }

    fn bypass_state() -> AppState {
        AppState {
            access_service: AccessService::new(Arc::new(RejectingVerifier), true),
            catalog_service: CatalogService::new(Arc::new(InMemoryCatalogRepository::new())),
            directory_service: DirectoryService::new(Arc::new(NullIdentityProvider)),
        }
    }

    #[tokio::test]
    async fn roles_listing_reports_the_bypass_producer_level() {
        let state = bypass_state();

        let listing = list_roles_handler(State(state), HeaderMap::new()).await;
        assert!(listing.is_ok_and(|Json(response)| response.your_role_level == 3));
    }

    #[tokio::test]
    async fn assigning_without_a_roles_array_is_a_bad_request() {
        let state = bypass_state();

        let result = assign_roles_handler(
            State(state),
            HeaderMap::new(),
            Path("auth0|someone".to_owned()),
            Json(AssignRolesRequest { roles: None }),
        )
        .await;
        let response = match result {
            Err(error) => error.into_response(),
            Ok(_) => panic!("missing roles array must fail"),
        };
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn updating_with_an_empty_document_is_a_bad_request() {
        let state = bypass_state();

        let result = update_user_handler(
            State(state),
            HeaderMap::new(),
            Path("auth0|someone".to_owned()),
            Json(json!({})),
        )
        .await;
        let response = match result {
            Err(error) => error.into_response(),
            Ok(_) => panic!("empty update must fail"),
        };
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
