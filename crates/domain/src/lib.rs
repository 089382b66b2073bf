//! Domain types and pure decision logic for Marquee.

#![forbid(unsafe_code)]

/// Movie and actor entities with their cast relationship.
pub mod catalog;
/// Verified token claims.
pub mod claims;
/// Role tiers and the hierarchy decision procedures.
pub mod hierarchy;
/// Permission vocabulary and permission-set membership.
pub mod permissions;
/// Projections of identity-provider user and role documents.
pub mod remote;

pub use catalog::{Actor, Movie};
pub use claims::Claims;
pub use hierarchy::{Decision, Role};
pub use permissions::PermissionSet;
pub use remote::{RemoteRole, RemoteUser};
