//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_identity_provider;
mod in_memory_catalog_repository;
mod jwks_token_verifier;
mod postgres_catalog_repository;

pub use http_identity_provider::HttpIdentityProvider;
pub use in_memory_catalog_repository::InMemoryCatalogRepository;
pub use jwks_token_verifier::JwksTokenVerifier;
pub use postgres_catalog_repository::PostgresCatalogRepository;
