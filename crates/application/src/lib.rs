//! Application services and ports for Marquee.

#![forbid(unsafe_code)]

mod access_service;
mod catalog_ports;
mod catalog_service;
mod directory_ports;
mod directory_service;

pub use access_service::{AccessService, TokenVerifier, extract_bearer};
pub use catalog_ports::{ActorChanges, CatalogRepository, MovieChanges, NewActor, NewMovie};
pub use catalog_service::{CastChange, CatalogService};
pub use directory_ports::{IdentityProvider, NewRemoteUser, UserPage};
pub use directory_service::{
    CreateUserInput, CreatedUser, DirectoryService, RoleListing, UserListing,
};
