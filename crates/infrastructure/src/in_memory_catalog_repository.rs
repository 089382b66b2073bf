use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use marquee_application::{ActorChanges, CatalogRepository, MovieChanges, NewActor, NewMovie};
use marquee_core::AppResult;
use marquee_domain::{Actor, Movie};
use tokio::sync::RwLock;

/// In-memory catalog repository for tests and local development.
#[derive(Default)]
pub struct InMemoryCatalogRepository {
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    movies: BTreeMap<i64, Movie>,
    actors: BTreeMap<i64, Actor>,
    cast: BTreeSet<(i64, i64)>,
    next_id: i64,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

impl InMemoryCatalogRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn list_movies(&self) -> AppResult<Vec<Movie>> {
        Ok(self.state.read().await.movies.values().cloned().collect())
    }

    async fn find_movie(&self, movie_id: i64) -> AppResult<Option<Movie>> {
        Ok(self.state.read().await.movies.get(&movie_id).cloned())
    }

    async fn insert_movie(&self, movie: NewMovie) -> AppResult<Movie> {
        let mut state = self.state.write().await;
        let id = state.next_id();
        let movie = Movie {
            id,
            title: movie.title,
            release_date: movie.release_date,
        };
        state.movies.insert(id, movie.clone());
        Ok(movie)
    }

    async fn update_movie(
        &self,
        movie_id: i64,
        changes: MovieChanges,
    ) -> AppResult<Option<Movie>> {
        let mut state = self.state.write().await;
        let Some(movie) = state.movies.get_mut(&movie_id) else {
            return Ok(None);
        };
        if let Some(title) = changes.title {
            movie.title = title;
        }
        if let Some(release_date) = changes.release_date {
            movie.release_date = release_date;
        }
        Ok(Some(movie.clone()))
    }

    async fn delete_movie(&self, movie_id: i64) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let existed = state.movies.remove(&movie_id).is_some();
        state.cast.retain(|(movie, _)| *movie != movie_id);
        Ok(existed)
    }

    async fn list_actors(&self) -> AppResult<Vec<Actor>> {
        Ok(self.state.read().await.actors.values().cloned().collect())
    }

    async fn find_actor(&self, actor_id: i64) -> AppResult<Option<Actor>> {
        Ok(self.state.read().await.actors.get(&actor_id).cloned())
    }

    async fn insert_actor(&self, actor: NewActor) -> AppResult<Actor> {
        let mut state = self.state.write().await;
        let id = state.next_id();
        let actor = Actor {
            id,
            name: actor.name,
            birth_date: actor.birth_date,
            gender: actor.gender,
        };
        state.actors.insert(id, actor.clone());
        Ok(actor)
    }

    async fn update_actor(
        &self,
        actor_id: i64,
        changes: ActorChanges,
    ) -> AppResult<Option<Actor>> {
        let mut state = self.state.write().await;
        let Some(actor) = state.actors.get_mut(&actor_id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            actor.name = name;
        }
        if let Some(birth_date) = changes.birth_date {
            actor.birth_date = birth_date;
        }
        if let Some(gender) = changes.gender {
            actor.gender = gender;
        }
        Ok(Some(actor.clone()))
    }

    async fn delete_actor(&self, actor_id: i64) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let existed = state.actors.remove(&actor_id).is_some();
        state.cast.retain(|(_, actor)| *actor != actor_id);
        Ok(existed)
    }

    async fn actors_for_movie(&self, movie_id: i64) -> AppResult<Vec<Actor>> {
        let state = self.state.read().await;
        Ok(state
            .actors
            .values()
            .filter(|actor| state.cast.contains(&(movie_id, actor.id)))
            .cloned()
            .collect())
    }

    async fn movies_for_actor(&self, actor_id: i64) -> AppResult<Vec<Movie>> {
        let state = self.state.read().await;
        Ok(state
            .movies
            .values()
            .filter(|movie| state.cast.contains(&(movie.id, actor_id)))
            .cloned()
            .collect())
    }

    async fn assign_cast(&self, movie_id: i64, actor_id: i64) -> AppResult<bool> {
        Ok(self.state.write().await.cast.insert((movie_id, actor_id)))
    }

    async fn unassign_cast(&self, movie_id: i64, actor_id: i64) -> AppResult<bool> {
        Ok(self.state.write().await.cast.remove(&(movie_id, actor_id)))
    }
}
