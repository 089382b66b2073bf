use async_trait::async_trait;
use chrono::NaiveDate;
use marquee_application::{ActorChanges, CatalogRepository, MovieChanges, NewActor, NewMovie};
use marquee_core::{AppError, AppResult};
use marquee_domain::{Actor, Movie};
use sqlx::PgPool;

/// PostgreSQL-backed movie/actor catalog repository.
#[derive(Clone)]
pub struct PostgresCatalogRepository {
    pool: PgPool,
}

impl PostgresCatalogRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct MovieRow {
    id: i64,
    title: String,
    release_date: NaiveDate,
}

impl From<MovieRow> for Movie {
    fn from(row: MovieRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            release_date: row.release_date,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ActorRow {
    id: i64,
    name: String,
    birth_date: NaiveDate,
    gender: String,
}

impl From<ActorRow> for Actor {
    fn from(row: ActorRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            birth_date: row.birth_date,
            gender: row.gender,
        }
    }
}

#[async_trait]
impl CatalogRepository for PostgresCatalogRepository {
    async fn list_movies(&self) -> AppResult<Vec<Movie>> {
        let rows = sqlx::query_as::<_, MovieRow>(
            r#"
            SELECT id, title, release_date
            FROM movies
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list movies: {error}")))?;

        Ok(rows.into_iter().map(Movie::from).collect())
    }

    async fn find_movie(&self, movie_id: i64) -> AppResult<Option<Movie>> {
        let row = sqlx::query_as::<_, MovieRow>(
            r#"
            SELECT id, title, release_date
            FROM movies
            WHERE id = $1
            "#,
        )
        .bind(movie_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load movie: {error}")))?;

        Ok(row.map(Movie::from))
    }

    async fn insert_movie(&self, movie: NewMovie) -> AppResult<Movie> {
        let row = sqlx::query_as::<_, MovieRow>(
            r#"
            INSERT INTO movies (title, release_date)
            VALUES ($1, $2)
            RETURNING id, title, release_date
            "#,
        )
        .bind(movie.title)
        .bind(movie.release_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to insert movie: {error}")))?;

        Ok(row.into())
    }

    async fn update_movie(
        &self,
        movie_id: i64,
        changes: MovieChanges,
    ) -> AppResult<Option<Movie>> {
        let row = sqlx::query_as::<_, MovieRow>(
            r#"
            UPDATE movies
            SET title = COALESCE($2, title),
                release_date = COALESCE($3, release_date)
            WHERE id = $1
            RETURNING id, title, release_date
            "#,
        )
        .bind(movie_id)
        .bind(changes.title)
        .bind(changes.release_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update movie: {error}")))?;

        Ok(row.map(Movie::from))
    }

    async fn delete_movie(&self, movie_id: i64) -> AppResult<bool> {
        // Cast edges go with the movie via ON DELETE CASCADE.
        let result = sqlx::query(
            r#"
            DELETE FROM movies
            WHERE id = $1
            "#,
        )
        .bind(movie_id)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete movie: {error}")))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_actors(&self) -> AppResult<Vec<Actor>> {
        let rows = sqlx::query_as::<_, ActorRow>(
            r#"
            SELECT id, name, birth_date, gender
            FROM actors
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list actors: {error}")))?;

        Ok(rows.into_iter().map(Actor::from).collect())
    }

    async fn find_actor(&self, actor_id: i64) -> AppResult<Option<Actor>> {
        let row = sqlx::query_as::<_, ActorRow>(
            r#"
            SELECT id, name, birth_date, gender
            FROM actors
            WHERE id = $1
            "#,
        )
        .bind(actor_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load actor: {error}")))?;

        Ok(row.map(Actor::from))
    }

    async fn insert_actor(&self, actor: NewActor) -> AppResult<Actor> {
        let row = sqlx::query_as::<_, ActorRow>(
            r#"
            INSERT INTO actors (name, birth_date, gender)
            VALUES ($1, $2, $3)
            RETURNING id, name, birth_date, gender
            "#,
        )
        .bind(actor.name)
        .bind(actor.birth_date)
        .bind(actor.gender)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to insert actor: {error}")))?;

        Ok(row.into())
    }

    async fn update_actor(
        &self,
        actor_id: i64,
        changes: ActorChanges,
    ) -> AppResult<Option<Actor>> {
        let row = sqlx::query_as::<_, ActorRow>(
            r#"
            UPDATE actors
            SET name = COALESCE($2, name),
                birth_date = COALESCE($3, birth_date),
                gender = COALESCE($4, gender)
            WHERE id = $1
            RETURNING id, name, birth_date, gender
            "#,
        )
        .bind(actor_id)
        .bind(changes.name)
        .bind(changes.birth_date)
        .bind(changes.gender)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update actor: {error}")))?;

        Ok(row.map(Actor::from))
    }

    async fn delete_actor(&self, actor_id: i64) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM actors
            WHERE id = $1
            "#,
        )
        .bind(actor_id)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete actor: {error}")))?;

        Ok(result.rows_affected() > 0)
    }

    async fn actors_for_movie(&self, movie_id: i64) -> AppResult<Vec<Actor>> {
        let rows = sqlx::query_as::<_, ActorRow>(
            r#"
            SELECT a.id, a.name, a.birth_date, a.gender
            FROM actors a
            JOIN movie_actors ma ON ma.actor_id = a.id
            WHERE ma.movie_id = $1
            ORDER BY a.id
            "#,
        )
        .bind(movie_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load movie cast: {error}")))?;

        Ok(rows.into_iter().map(Actor::from).collect())
    }

    async fn movies_for_actor(&self, actor_id: i64) -> AppResult<Vec<Movie>> {
        let rows = sqlx::query_as::<_, MovieRow>(
            r#"
            SELECT m.id, m.title, m.release_date
            FROM movies m
            JOIN movie_actors ma ON ma.movie_id = m.id
            WHERE ma.actor_id = $1
            ORDER BY m.id
            "#,
        )
        .bind(actor_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load filmography: {error}")))?;

        Ok(rows.into_iter().map(Movie::from).collect())
    }

    async fn assign_cast(&self, movie_id: i64, actor_id: i64) -> AppResult<bool> {
        // The unique pair constraint makes the existence check and the insert
        // a single statement; a concurrent duplicate reports zero rows.
        let result = sqlx::query(
            r#"
            INSERT INTO movie_actors (movie_id, actor_id)
            VALUES ($1, $2)
            ON CONFLICT (movie_id, actor_id) DO NOTHING
            "#,
        )
        .bind(movie_id)
        .bind(actor_id)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to assign cast: {error}")))?;

        Ok(result.rows_affected() > 0)
    }

    async fn unassign_cast(&self, movie_id: i64, actor_id: i64) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM movie_actors
            WHERE movie_id = $1 AND actor_id = $2
            "#,
        )
        .bind(movie_id)
        .bind(actor_id)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to unassign cast: {error}")))?;

        Ok(result.rows_affected() > 0)
    }
}
