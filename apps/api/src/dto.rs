use chrono::Utc;
use marquee_application::{CastChange, CreatedUser, RoleListing, UserListing};
use marquee_domain::{Actor, Movie, RemoteRole, RemoteUser};
use serde::{Deserialize, Serialize};

const DATE_FORMAT: &str = "%Y-%m-%d";

// Requests

#[derive(Debug, Deserialize)]
pub struct CreateMovieRequest {
    pub title: Option<String>,
    pub release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMovieRequest {
    pub title: Option<String>,
    pub release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateActorRequest {
    pub name: Option<String>,
    pub birth_date: Option<String>,
    pub gender: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateActorRequest {
    pub name: Option<String>,
    pub birth_date: Option<String>,
    pub gender: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MovieDetailQuery {
    #[serde(default)]
    pub include_actors: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ActorDetailQuery {
    #[serde(default)]
    pub include_movies: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AssignRolesRequest {
    pub roles: Option<Vec<String>>,
}

// Responses

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Compact cast entry embedded in a movie document.
#[derive(Debug, Serialize)]
pub struct CastMemberDto {
    pub id: i64,
    pub name: String,
}

/// Compact film entry embedded in an actor document.
#[derive(Debug, Serialize)]
pub struct FilmDto {
    pub id: i64,
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct MovieDto {
    pub id: i64,
    pub title: String,
    pub release_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actors: Option<Vec<CastMemberDto>>,
}

impl MovieDto {
    pub fn new(movie: Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title,
            release_date: movie.release_date.format(DATE_FORMAT).to_string(),
            actors: None,
        }
    }

    pub fn with_cast(movie: Movie, cast: Vec<Actor>) -> Self {
        let mut dto = Self::new(movie);
        dto.actors = Some(
            cast.into_iter()
                .map(|actor| CastMemberDto {
                    id: actor.id,
                    name: actor.name,
                })
                .collect(),
        );
        dto
    }
}

#[derive(Debug, Serialize)]
pub struct ActorDto {
    pub id: i64,
    pub name: String,
    pub birth_date: String,
    pub age: i32,
    pub gender: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movies: Option<Vec<FilmDto>>,
}

impl ActorDto {
    pub fn new(actor: Actor) -> Self {
        let age = actor.age_on(Utc::now().date_naive());
        Self {
            id: actor.id,
            name: actor.name,
            birth_date: actor.birth_date.format(DATE_FORMAT).to_string(),
            age,
            gender: actor.gender,
            movies: None,
        }
    }

    pub fn with_filmography(actor: Actor, movies: Vec<Movie>) -> Self {
        let mut dto = Self::new(actor);
        dto.movies = Some(
            movies
                .into_iter()
                .map(|movie| FilmDto {
                    id: movie.id,
                    title: movie.title,
                })
                .collect(),
        );
        dto
    }
}

#[derive(Debug, Serialize)]
pub struct MoviesResponse {
    pub success: bool,
    pub movies: Vec<MovieDto>,
    pub total_movies: usize,
}

#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub success: bool,
    pub movie: MovieDto,
}

#[derive(Debug, Serialize)]
pub struct CreatedMovieResponse {
    pub success: bool,
    pub created: i64,
    pub movie: MovieDto,
}

#[derive(Debug, Serialize)]
pub struct ActorsResponse {
    pub success: bool,
    pub actors: Vec<ActorDto>,
    pub total_actors: usize,
}

#[derive(Debug, Serialize)]
pub struct ActorResponse {
    pub success: bool,
    pub actor: ActorDto,
}

#[derive(Debug, Serialize)]
pub struct CreatedActorResponse {
    pub success: bool,
    pub created: i64,
    pub actor: ActorDto,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub success: bool,
    pub deleted: i64,
}

#[derive(Debug, Serialize)]
pub struct MovieCastResponse {
    pub success: bool,
    pub movie_id: i64,
    pub movie_title: String,
    pub actors: Vec<ActorDto>,
    pub total_actors: usize,
}

#[derive(Debug, Serialize)]
pub struct ActorFilmographyResponse {
    pub success: bool,
    pub actor_id: i64,
    pub actor_name: String,
    pub movies: Vec<MovieDto>,
    pub total_movies: usize,
}

#[derive(Debug, Serialize)]
pub struct CastChangeResponse {
    pub success: bool,
    pub message: String,
    pub movie: MovieDto,
}

impl From<CastChange> for CastChangeResponse {
    fn from(change: CastChange) -> Self {
        Self {
            success: true,
            message: change.message,
            movie: MovieDto::with_cast(change.movie, change.cast),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub success: bool,
    pub users: Vec<RemoteUser>,
    pub total: usize,
    pub page: u32,
    pub per_page: u32,
    pub your_role_level: u8,
}

impl From<UserListing> for UsersResponse {
    fn from(listing: UserListing) -> Self {
        Self {
            success: true,
            users: listing.users,
            total: listing.total,
            page: listing.page,
            per_page: listing.per_page,
            your_role_level: listing.your_role_level,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub success: bool,
    pub user: RemoteUser,
}

#[derive(Debug, Serialize)]
pub struct CreatedUserResponse {
    pub success: bool,
    pub user: RemoteUser,
    pub role_assigned: String,
}

impl From<CreatedUser> for CreatedUserResponse {
    fn from(created: CreatedUser) -> Self {
        Self {
            success: true,
            user: created.user,
            role_assigned: created.role_assigned,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeletedUserResponse {
    pub success: bool,
    pub deleted: String,
}

#[derive(Debug, Serialize)]
pub struct UserRolesResponse {
    pub success: bool,
    pub roles: Vec<RemoteRole>,
}

#[derive(Debug, Serialize)]
pub struct RolesResponse {
    pub success: bool,
    pub roles: Vec<RemoteRole>,
    pub total: usize,
    pub your_role_level: u8,
}

impl From<RoleListing> for RolesResponse {
    fn from(listing: RoleListing) -> Self {
        Self {
            success: true,
            roles: listing.roles,
            total: listing.total,
            your_role_level: listing.your_role_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use marquee_domain::Movie;

    use super::MovieDto;

    #[test]
    fn movie_dates_serialize_as_iso_days() {
        let movie = Movie {
            id: 1,
            title: "Heat".to_owned(),
            release_date: NaiveDate::from_ymd_opt(1995, 12, 15)
                .unwrap_or_default(),
        };
        let dto = MovieDto::new(movie);
        assert_eq!(dto.release_date, "1995-12-15");

        let json = serde_json::to_value(&dto).unwrap_or_default();
        assert!(json.get("actors").is_none());
    }
}
