use async_trait::async_trait;
use chrono::NaiveDate;
use marquee_core::AppResult;
use marquee_domain::{Actor, Movie};

/// Validated input for movie creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovie {
    /// Movie title.
    pub title: String,
    /// Release date.
    pub release_date: NaiveDate,
}

/// Partial update for a movie; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieChanges {
    /// Replacement title, when provided.
    pub title: Option<String>,
    /// Replacement release date, when provided.
    pub release_date: Option<NaiveDate>,
}

/// Validated input for actor creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActor {
    /// Actor name.
    pub name: String,
    /// Date of birth.
    pub birth_date: NaiveDate,
    /// Free-form gender value.
    pub gender: String,
}

/// Partial update for an actor; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActorChanges {
    /// Replacement name, when provided.
    pub name: Option<String>,
    /// Replacement birth date, when provided.
    pub birth_date: Option<NaiveDate>,
    /// Replacement gender value, when provided.
    pub gender: Option<String>,
}

/// Repository port for the movie/actor catalog and its cast edges.
///
/// Deleting a movie or actor removes its cast edges in the same operation.
/// The assign/unassign methods are atomic per `(movie, actor)` pair: the
/// existence check and the mutation must not race with a concurrent call for
/// the same pair.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Lists all movies ordered by id.
    async fn list_movies(&self) -> AppResult<Vec<Movie>>;

    /// Looks up a movie by id.
    async fn find_movie(&self, movie_id: i64) -> AppResult<Option<Movie>>;

    /// Inserts a movie and returns it with its assigned id.
    async fn insert_movie(&self, movie: NewMovie) -> AppResult<Movie>;

    /// Applies a partial update to an existing movie; returns `None` when
    /// the movie does not exist.
    async fn update_movie(&self, movie_id: i64, changes: MovieChanges)
    -> AppResult<Option<Movie>>;

    /// Deletes a movie and its cast edges; returns whether a row existed.
    async fn delete_movie(&self, movie_id: i64) -> AppResult<bool>;

    /// Lists all actors ordered by id.
    async fn list_actors(&self) -> AppResult<Vec<Actor>>;

    /// Looks up an actor by id.
    async fn find_actor(&self, actor_id: i64) -> AppResult<Option<Actor>>;

    /// Inserts an actor and returns it with its assigned id.
    async fn insert_actor(&self, actor: NewActor) -> AppResult<Actor>;

    /// Applies a partial update to an existing actor; returns `None` when
    /// the actor does not exist.
    async fn update_actor(&self, actor_id: i64, changes: ActorChanges)
    -> AppResult<Option<Actor>>;

    /// Deletes an actor and its cast edges; returns whether a row existed.
    async fn delete_actor(&self, actor_id: i64) -> AppResult<bool>;

    /// Lists the actors cast in a movie, ordered by id.
    async fn actors_for_movie(&self, movie_id: i64) -> AppResult<Vec<Actor>>;

    /// Lists the movies an actor is cast in, ordered by id.
    async fn movies_for_actor(&self, actor_id: i64) -> AppResult<Vec<Movie>>;

    /// Adds a cast edge; returns `false` when the edge already existed.
    async fn assign_cast(&self, movie_id: i64, actor_id: i64) -> AppResult<bool>;

    /// Removes a cast edge; returns `false` when no edge existed.
    async fn unassign_cast(&self, movie_id: i64, actor_id: i64) -> AppResult<bool>;
}
