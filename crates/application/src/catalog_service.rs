use std::sync::Arc;

use chrono::NaiveDate;
use marquee_core::{AppError, AppResult};
use marquee_domain::{Actor, Movie};

use crate::catalog_ports::{ActorChanges, CatalogRepository, MovieChanges, NewActor, NewMovie};

/// Result of a cast assignment or removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastChange {
    /// Human-readable confirmation, e.g. `"Jane Doe assigned to Heat"`.
    pub message: String,
    /// The affected movie.
    pub movie: Movie,
    /// The movie's cast after the change.
    pub cast: Vec<Actor>,
}

/// Application service for movie/actor CRUD and cast assignment.
#[derive(Clone)]
pub struct CatalogService {
    repository: Arc<dyn CatalogRepository>,
}

impl CatalogService {
    /// Creates a catalog service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn CatalogRepository>) -> Self {
        Self { repository }
    }

    /// Lists all movies ordered by id.
    pub async fn list_movies(&self) -> AppResult<Vec<Movie>> {
        self.repository.list_movies().await
    }

    /// Returns a movie by id.
    pub async fn get_movie(&self, movie_id: i64) -> AppResult<Movie> {
        self.repository
            .find_movie(movie_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("movie '{movie_id}' does not exist")))
    }

    /// Creates a movie; title and release date are both required.
    pub async fn create_movie(
        &self,
        title: Option<String>,
        release_date: Option<String>,
    ) -> AppResult<Movie> {
        let (Some(title), Some(release_date)) = (title, release_date) else {
            return Err(AppError::BadRequest(
                "title and release_date are required".to_owned(),
            ));
        };
        if title.trim().is_empty() {
            return Err(AppError::BadRequest("title must not be empty".to_owned()));
        }

        let release_date = parse_date(release_date.as_str())?;
        self.repository
            .insert_movie(NewMovie {
                title,
                release_date,
            })
            .await
    }

    /// Applies a partial update: only the provided fields change.
    pub async fn update_movie(
        &self,
        movie_id: i64,
        title: Option<String>,
        release_date: Option<String>,
    ) -> AppResult<Movie> {
        let changes = MovieChanges {
            title,
            release_date: release_date.as_deref().map(parse_date).transpose()?,
        };

        self.repository
            .update_movie(movie_id, changes)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("movie '{movie_id}' does not exist")))
    }

    /// Deletes a movie and its cast edges; returns the deleted id.
    pub async fn delete_movie(&self, movie_id: i64) -> AppResult<i64> {
        if !self.repository.delete_movie(movie_id).await? {
            return Err(AppError::NotFound(format!(
                "movie '{movie_id}' does not exist"
            )));
        }
        Ok(movie_id)
    }

    /// Lists all actors ordered by id.
    pub async fn list_actors(&self) -> AppResult<Vec<Actor>> {
        self.repository.list_actors().await
    }

    /// Returns an actor by id.
    pub async fn get_actor(&self, actor_id: i64) -> AppResult<Actor> {
        self.repository
            .find_actor(actor_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("actor '{actor_id}' does not exist")))
    }

    /// Creates an actor; name, birth date and gender are all required.
    pub async fn create_actor(
        &self,
        name: Option<String>,
        birth_date: Option<String>,
        gender: Option<String>,
    ) -> AppResult<Actor> {
        let (Some(name), Some(birth_date), Some(gender)) = (name, birth_date, gender) else {
            return Err(AppError::BadRequest(
                "name, birth_date and gender are required".to_owned(),
            ));
        };
        if name.trim().is_empty() {
            return Err(AppError::BadRequest("name must not be empty".to_owned()));
        }

        let birth_date = parse_date(birth_date.as_str())?;
        self.repository
            .insert_actor(NewActor {
                name,
                birth_date,
                gender,
            })
            .await
    }

    /// Applies a partial update: only the provided fields change.
    pub async fn update_actor(
        &self,
        actor_id: i64,
        name: Option<String>,
        birth_date: Option<String>,
        gender: Option<String>,
    ) -> AppResult<Actor> {
        let changes = ActorChanges {
            name,
            birth_date: birth_date.as_deref().map(parse_date).transpose()?,
            gender,
        };

        self.repository
            .update_actor(actor_id, changes)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("actor '{actor_id}' does not exist")))
    }

    /// Deletes an actor and its cast edges; returns the deleted id.
    pub async fn delete_actor(&self, actor_id: i64) -> AppResult<i64> {
        if !self.repository.delete_actor(actor_id).await? {
            return Err(AppError::NotFound(format!(
                "actor '{actor_id}' does not exist"
            )));
        }
        Ok(actor_id)
    }

    /// Returns a movie together with its cast.
    pub async fn movie_cast(&self, movie_id: i64) -> AppResult<(Movie, Vec<Actor>)> {
        let movie = self.get_movie(movie_id).await?;
        let cast = self.repository.actors_for_movie(movie_id).await?;
        Ok((movie, cast))
    }

    /// Returns an actor together with the movies they are cast in.
    pub async fn actor_filmography(&self, actor_id: i64) -> AppResult<(Actor, Vec<Movie>)> {
        let actor = self.get_actor(actor_id).await?;
        let movies = self.repository.movies_for_actor(actor_id).await?;
        Ok((actor, movies))
    }

    /// Assigns an actor to a movie.
    ///
    /// Both sides must exist; a duplicate assignment fails with a structured
    /// bad-request and leaves the existing edge untouched.
    pub async fn assign_cast(&self, movie_id: i64, actor_id: i64) -> AppResult<CastChange> {
        let movie = self.get_movie(movie_id).await?;
        let actor = self.get_actor(actor_id).await?;

        if !self.repository.assign_cast(movie_id, actor_id).await? {
            return Err(AppError::BadRequest(
                "Actor is already assigned to this movie".to_owned(),
            ));
        }

        let cast = self.repository.actors_for_movie(movie_id).await?;
        Ok(CastChange {
            message: format!("{} assigned to {}", actor.name, movie.title),
            movie,
            cast,
        })
    }

    /// Removes an actor from a movie; removing an absent edge is an error.
    pub async fn unassign_cast(&self, movie_id: i64, actor_id: i64) -> AppResult<CastChange> {
        let movie = self.get_movie(movie_id).await?;
        let actor = self.get_actor(actor_id).await?;

        if !self.repository.unassign_cast(movie_id, actor_id).await? {
            return Err(AppError::BadRequest(
                "Actor is not assigned to this movie".to_owned(),
            ));
        }

        let cast = self.repository.actors_for_movie(movie_id).await?;
        Ok(CastChange {
            message: format!("{} removed from {}", actor.name, movie.title),
            movie,
            cast,
        })
    }
}

fn parse_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("invalid date '{value}', expected YYYY-MM-DD")))
}
