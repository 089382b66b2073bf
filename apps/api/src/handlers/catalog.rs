use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use marquee_domain::permissions;

use crate::auth;
use crate::dto::{
    ActorDetailQuery, ActorDto, ActorFilmographyResponse, ActorResponse, ActorsResponse,
    CastChangeResponse, CreateActorRequest, CreateMovieRequest, CreatedActorResponse,
    CreatedMovieResponse, DeletedResponse, MovieCastResponse, MovieDetailQuery, MovieDto,
    MovieResponse, MoviesResponse, UpdateActorRequest, UpdateMovieRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_movies_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<MoviesResponse>> {
    auth::authorize(&state, permissions::GET_MOVIES, &headers).await?;

    let movies = state.catalog_service.list_movies().await?;
    Ok(Json(MoviesResponse {
        success: true,
        total_movies: movies.len(),
        movies: movies.into_iter().map(MovieDto::new).collect(),
    }))
}

pub async fn get_movie_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(movie_id): Path<i64>,
    Query(query): Query<MovieDetailQuery>,
) -> ApiResult<Json<MovieResponse>> {
    auth::authorize(&state, permissions::GET_MOVIES, &headers).await?;

    let movie = if query.include_actors {
        let (movie, cast) = state.catalog_service.movie_cast(movie_id).await?;
        MovieDto::with_cast(movie, cast)
    } else {
        MovieDto::new(state.catalog_service.get_movie(movie_id).await?)
    };

    Ok(Json(MovieResponse {
        success: true,
        movie,
    }))
}

pub async fn create_movie_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateMovieRequest>,
) -> ApiResult<(StatusCode, Json<CreatedMovieResponse>)> {
    auth::authorize(&state, permissions::POST_MOVIES, &headers).await?;

    let movie = state
        .catalog_service
        .create_movie(payload.title, payload.release_date)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedMovieResponse {
            success: true,
            created: movie.id,
            movie: MovieDto::new(movie),
        }),
    ))
}

pub async fn update_movie_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(movie_id): Path<i64>,
    Json(payload): Json<UpdateMovieRequest>,
) -> ApiResult<Json<MovieResponse>> {
    auth::authorize(&state, permissions::PATCH_MOVIES, &headers).await?;

    let movie = state
        .catalog_service
        .update_movie(movie_id, payload.title, payload.release_date)
        .await?;

    Ok(Json(MovieResponse {
        success: true,
        movie: MovieDto::new(movie),
    }))
}

pub async fn delete_movie_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(movie_id): Path<i64>,
) -> ApiResult<Json<DeletedResponse>> {
    auth::authorize(&state, permissions::DELETE_MOVIES, &headers).await?;

    let deleted = state.catalog_service.delete_movie(movie_id).await?;
    Ok(Json(DeletedResponse {
        success: true,
        deleted,
    }))
}

pub async fn list_actors_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<ActorsResponse>> {
    auth::authorize(&state, permissions::GET_ACTORS, &headers).await?;

    let actors = state.catalog_service.list_actors().await?;
    Ok(Json(ActorsResponse {
        success: true,
        total_actors: actors.len(),
        actors: actors.into_iter().map(ActorDto::new).collect(),
    }))
}

pub async fn get_actor_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(actor_id): Path<i64>,
    Query(query): Query<ActorDetailQuery>,
) -> ApiResult<Json<ActorResponse>> {
    auth::authorize(&state, permissions::GET_ACTORS, &headers).await?;

    let actor = if query.include_movies {
        let (actor, movies) = state.catalog_service.actor_filmography(actor_id).await?;
        ActorDto::with_filmography(actor, movies)
    } else {
        ActorDto::new(state.catalog_service.get_actor(actor_id).await?)
    };

    Ok(Json(ActorResponse {
        success: true,
        actor,
    }))
}

pub async fn create_actor_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateActorRequest>,
) -> ApiResult<(StatusCode, Json<CreatedActorResponse>)> {
    auth::authorize(&state, permissions::POST_ACTORS, &headers).await?;

    let actor = state
        .catalog_service
        .create_actor(payload.name, payload.birth_date, payload.gender)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedActorResponse {
            success: true,
            created: actor.id,
            actor: ActorDto::new(actor),
        }),
    ))
}

pub async fn update_actor_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(actor_id): Path<i64>,
    Json(payload): Json<UpdateActorRequest>,
) -> ApiResult<Json<ActorResponse>> {
    auth::authorize(&state, permissions::PATCH_ACTORS, &headers).await?;

    let actor = state
        .catalog_service
        .update_actor(actor_id, payload.name, payload.birth_date, payload.gender)
        .await?;

    Ok(Json(ActorResponse {
        success: true,
        actor: ActorDto::new(actor),
    }))
}

pub async fn delete_actor_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(actor_id): Path<i64>,
) -> ApiResult<Json<DeletedResponse>> {
    auth::authorize(&state, permissions::DELETE_ACTORS, &headers).await?;

    let deleted = state.catalog_service.delete_actor(actor_id).await?;
    Ok(Json(DeletedResponse {
        success: true,
        deleted,
    }))
}

pub async fn movie_cast_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(movie_id): Path<i64>,
) -> ApiResult<Json<MovieCastResponse>> {
    auth::authorize(&state, permissions::GET_MOVIES, &headers).await?;

    let (movie, cast) = state.catalog_service.movie_cast(movie_id).await?;
    Ok(Json(MovieCastResponse {
        success: true,
        movie_id: movie.id,
        movie_title: movie.title,
        total_actors: cast.len(),
        actors: cast.into_iter().map(ActorDto::new).collect(),
    }))
}

pub async fn actor_filmography_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(actor_id): Path<i64>,
) -> ApiResult<Json<ActorFilmographyResponse>> {
    auth::authorize(&state, permissions::GET_ACTORS, &headers).await?;

    let (actor, movies) = state.catalog_service.actor_filmography(actor_id).await?;
    Ok(Json(ActorFilmographyResponse {
        success: true,
        actor_id: actor.id,
        actor_name: actor.name,
        total_movies: movies.len(),
        movies: movies.into_iter().map(MovieDto::new).collect(),
    }))
}

pub async fn assign_cast_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((movie_id, actor_id)): Path<(i64, i64)>,
) -> ApiResult<(StatusCode, Json<CastChangeResponse>)> {
    auth::authorize(&state, permissions::POST_CASTING, &headers).await?;

    let change = state.catalog_service.assign_cast(movie_id, actor_id).await?;
    Ok((StatusCode::CREATED, Json(CastChangeResponse::from(change))))
}

pub async fn unassign_cast_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((movie_id, actor_id)): Path<(i64, i64)>,
) -> ApiResult<Json<CastChangeResponse>> {
    auth::authorize(&state, permissions::DELETE_CASTING, &headers).await?;

    let change = state
        .catalog_service
        .unassign_cast(movie_id, actor_id)
        .await?;
    Ok(Json(CastChangeResponse::from(change)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::Json;
    use axum::extract::{Path, Query, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::IntoResponse;
    use marquee_application::{AccessService, CatalogService, DirectoryService, TokenVerifier};
    use marquee_core::AuthError;
    use marquee_domain::Claims;
    use marquee_infrastructure::InMemoryCatalogRepository;

    use super::{
        assign_cast_handler, create_movie_handler, get_movie_handler, list_movies_handler,
    };
    use crate::dto::{CreateMovieRequest, MovieDetailQuery};
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

    fn anonymous_state() -> AppState {
        AppState {
            access_service: AccessService::new(Arc::new(RejectingVerifier), false),
            catalog_service: CatalogService::new(Arc::new(InMemoryCatalogRepository::new())),
            directory_service: DirectoryService::new(Arc::new(NullIdentityProvider)),
        }
    }

    #[tokio::test]
    async fn movie_lifecycle_through_the_handlers() {
        let state = bypass_state();

        let created = create_movie_handler(
            State(state.clone()),
            HeaderMap::new(),
            Json(CreateMovieRequest {
                title: Some("Heat".to_owned()),
                release_date: Some("1995-12-15".to_owned()),
            }),
        )
        .await;
        let (status, Json(created)) = match created {
            Ok(response) => response,
            Err(error) => panic!("create failed: {:?}", error.0),
        };
        assert_eq!(status, StatusCode::CREATED);
        assert!(created.success);

        let fetched = get_movie_handler(
            State(state),
            HeaderMap::new(),
            Path(created.created),
            Query(MovieDetailQuery::default()),
        )
        .await;
        assert!(fetched.is_ok_and(|Json(response)| response.movie.title == "Heat"));
    }

    #[tokio::test]
    async fn public_listing_works_without_any_credential() {
        let state = anonymous_state();

        let listed = list_movies_handler(State(state), HeaderMap::new()).await;
        assert!(listed.is_ok_and(|Json(response)| response.success && response.movies.is_empty()));
    }

    #[tokio::test]
    async fn cast_assignment_requires_a_credential() {
        let state = anonymous_state();

        let result = assign_cast_handler(State(state), HeaderMap::new(), Path((1, 1))).await;
        let response = match result {
            Err(error) => error.into_response(),
            Ok(_) => panic!("anonymous cast assignment must fail"),
        };
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
