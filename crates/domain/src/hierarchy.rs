//! Role tiers and the hierarchy decision procedures.
//!
//! Everything in this module is a pure function over permission sets and role
//! names; no IO, no shared state. Enforcement (turning a [`Decision::Deny`]
//! into a fatal error) happens at the service boundary.

use serde::{Deserialize, Serialize};

use crate::permissions::{self, PermissionSet};
use crate::remote::{RemoteRole, RemoteUser};

/// The three fixed role tiers, strictly ordered by level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Level 1: read-only access to the catalog.
    CastingAssistant,
    /// Level 2: manages actors and assistant users.
    CastingDirector,
    /// Level 3: full catalog control, manages users below producer tier.
    ExecutiveProducer,
}

impl Role {
    /// Returns the ordinal level of the role. Level 0 means no recognized role.
    #[must_use]
    pub fn level(self) -> u8 {
        match self {
            Self::CastingAssistant => 1,
            Self::CastingDirector => 2,
            Self::ExecutiveProducer => 3,
        }
    }

    /// Returns the provider-facing role name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::CastingAssistant => "Casting Assistant",
            Self::CastingDirector => "Casting Director",
            Self::ExecutiveProducer => "Executive Producer",
        }
    }

    /// Resolves a provider role name to a tier; unknown names have no level.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Casting Assistant" => Some(Self::CastingAssistant),
            "Casting Director" => Some(Self::CastingDirector),
            "Executive Producer" => Some(Self::ExecutiveProducer),
            _ => None,
        }
    }

    /// Returns all known roles in ascending level order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Role] = &[
            Role::CastingAssistant,
            Role::CastingDirector,
            Role::ExecutiveProducer,
        ];

        ALL
    }
}

/// Outcome of a hierarchy check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The manager may proceed.
    Allow,
    /// The manager is blocked, with a user-facing reason.
    Deny(String),
}

impl Decision {
    /// Returns whether the decision is an allow.
    #[must_use]
    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Derives an effective role level from a raw permission set.
///
/// The rules form an ordered list evaluated top-down; the precedence is
/// load-bearing and must not be reordered. Mutation-capable tiers win even
/// when read permissions are also present. A token holding only mutation
/// permissions (for example `delete:actors` without `get:actors`) still
/// classifies at the mutation tier; this mirrors the tokens the identity
/// provider actually issues and is kept as-is.
#[must_use]
pub fn derive_level(permissions: &PermissionSet) -> u8 {
    if permissions.is_empty() {
        return 0;
    }

    if permissions.contains(permissions::DELETE_MOVIES)
        && permissions.contains(permissions::POST_MOVIES)
    {
        return Role::ExecutiveProducer.level();
    }

    if permissions.contains(permissions::DELETE_ACTORS)
        || permissions.contains(permissions::POST_ACTORS)
    {
        return Role::CastingDirector.level();
    }

    if permissions.contains(permissions::GET_MOVIES)
        || permissions.contains(permissions::GET_ACTORS)
    {
        return Role::CastingAssistant.level();
    }

    0
}

/// Returns the highest known tier among the target's named roles.
///
/// Roles outside the fixed three are ignored for leveling.
#[must_use]
pub fn target_level(roles: &[RemoteRole]) -> u8 {
    roles
        .iter()
        .filter_map(|role| Role::from_name(role.name.as_str()))
        .map(Role::level)
        .max()
        .unwrap_or(0)
}

/// Decides whether a manager may view or act on a target user.
#[must_use]
pub fn can_manage(manager: &PermissionSet, target_roles: &[RemoteRole]) -> Decision {
    let manager_level = derive_level(manager);

    if manager_level == 0 {
        return Decision::Deny("No management permissions".to_owned());
    }

    let target = target_level(target_roles);

    if manager_level == Role::ExecutiveProducer.level() {
        if target == Role::ExecutiveProducer.level() {
            return Decision::Deny(
                "Executive Producers cannot manage other Executive Producers".to_owned(),
            );
        }
        return Decision::Allow;
    }

    if manager_level == Role::CastingDirector.level() {
        if target > Role::CastingAssistant.level() {
            return Decision::Deny(
                "Casting Directors can only manage Casting Assistant users".to_owned(),
            );
        }
        return Decision::Allow;
    }

    Decision::Deny("Insufficient permissions to manage users".to_owned())
}

/// Decides whether a manager may grant a role by name.
#[must_use]
pub fn can_assign(manager: &PermissionSet, role_name: &str) -> Decision {
    let Some(role) = Role::from_name(role_name) else {
        return Decision::Deny(format!("Invalid role: {role_name}"));
    };

    let manager_level = derive_level(manager);

    if manager_level == Role::ExecutiveProducer.level() {
        if role == Role::ExecutiveProducer {
            return Decision::Deny("Cannot assign Executive Producer role via API".to_owned());
        }
        return Decision::Allow;
    }

    if manager_level == Role::CastingDirector.level() {
        if role == Role::CastingAssistant {
            return Decision::Allow;
        }
        return Decision::Deny("Casting Directors can only assign Casting Assistant role".to_owned());
    }

    Decision::Deny("Insufficient permissions to assign roles".to_owned())
}

/// Restricts a user listing to the subset the manager may observe.
///
/// Visibility uses the same level computation as [`can_manage`] so "what you
/// can see" and "what you can touch" cannot drift apart.
#[must_use]
pub fn filter_users(users: Vec<RemoteUser>, manager: &PermissionSet) -> Vec<RemoteUser> {
    let manager_level = derive_level(manager);

    if manager_level == Role::ExecutiveProducer.level() {
        return users;
    }

    if manager_level == Role::CastingDirector.level() {
        return users
            .into_iter()
            .filter(|user| {
                derive_level(&PermissionSet::new(user.permissions.clone()))
                    <= Role::CastingAssistant.level()
            })
            .collect();
    }

    Vec::new()
}

/// Restricts a provider role listing to the roles the manager may grant.
#[must_use]
pub fn assignable_roles(manager: &PermissionSet, roles: Vec<RemoteRole>) -> Vec<RemoteRole> {
    let manager_level = derive_level(manager);

    roles
        .into_iter()
        .filter(|role| match Role::from_name(role.name.as_str()) {
            Some(known) if manager_level == Role::ExecutiveProducer.level() => {
                known.level() < Role::ExecutiveProducer.level()
            }
            Some(known) if manager_level == Role::CastingDirector.level() => {
                known == Role::CastingAssistant
            }
            _ => false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        Decision, Role, assignable_roles, can_assign, can_manage, derive_level, filter_users,
    };
    use crate::permissions::{self, PermissionSet};
    use crate::remote::{RemoteRole, RemoteUser};

    fn set(values: &[&str]) -> PermissionSet {
        PermissionSet::from_static(values)
    }

    fn named_role(name: &str) -> RemoteRole {
        RemoteRole {
            id: format!("rol_{name}"),
            name: name.to_owned(),
            description: None,
        }
    }

    fn user_with(permissions: &[&str]) -> RemoteUser {
        RemoteUser {
            user_id: "auth0|test".to_owned(),
            permissions: permissions.iter().map(|value| (*value).to_owned()).collect(),
            ..RemoteUser::default()
        }
    }

    #[test]
    fn producer_pair_always_derives_level_three() {
        let minimal = set(&["delete:movies", "post:movies"]);
        assert_eq!(derive_level(&minimal), 3);

        let noisy = set(&[
            "get:actors",
            "delete:actors",
            "delete:movies",
            "post:movies",
            "custom:thing",
        ]);
        assert_eq!(derive_level(&noisy), 3);
    }

    #[test]
    fn actor_mutations_derive_level_two_without_the_producer_pair() {
        assert_eq!(derive_level(&set(&["delete:actors"])), 2);
        assert_eq!(derive_level(&set(&["post:actors", "get:movies"])), 2);
        // Only half of the producer pair present: still a director.
        assert_eq!(derive_level(&set(&["delete:movies", "post:actors"])), 2);
    }

    #[test]
    fn read_permissions_derive_level_one() {
        assert_eq!(derive_level(&set(&["get:movies"])), 1);
        assert_eq!(derive_level(&set(&["get:actors"])), 1);
    }

    #[test]
    fn unrecognized_or_empty_sets_derive_level_zero() {
        assert_eq!(derive_level(&set(&[])), 0);
        assert_eq!(derive_level(&set(&["post:casting", "custom:thing"])), 0);
    }

    #[test]
    fn mutation_only_token_still_classifies_at_the_mutation_tier() {
        // Deliberately preserved: no read permission, yet level 2.
        assert_eq!(derive_level(&set(&["delete:actors"])), 2);
    }

    #[test]
    fn level_zero_manager_is_never_allowed() {
        let decision = can_manage(&set(&[]), &[]);
        assert_eq!(
            decision,
            Decision::Deny("No management permissions".to_owned())
        );
    }

    #[test]
    fn producer_cannot_manage_another_producer() {
        let producer = set(&["delete:movies", "post:movies"]);
        let decision = can_manage(&producer, &[named_role("Executive Producer")]);
        assert!(!decision.is_allow());
    }

    #[test]
    fn producer_manages_everyone_below() {
        let producer = set(&["delete:movies", "post:movies"]);
        assert!(can_manage(&producer, &[named_role("Casting Director")]).is_allow());
        assert!(can_manage(&producer, &[named_role("Casting Assistant")]).is_allow());
        assert!(can_manage(&producer, &[]).is_allow());
    }

    #[test]
    fn director_manages_only_assistants() {
        let director = set(&["post:actors", "delete:actors", "get:movies"]);
        assert!(can_manage(&director, &[named_role("Casting Assistant")]).is_allow());
        assert_eq!(
            can_manage(&director, &[named_role("Casting Director")]),
            Decision::Deny("Casting Directors can only manage Casting Assistant users".to_owned())
        );
        assert!(!can_manage(&director, &[named_role("Executive Producer")]).is_allow());
    }

    #[test]
    fn assistant_cannot_manage_anyone() {
        let assistant = set(&["get:movies", "get:actors"]);
        assert_eq!(
            can_manage(&assistant, &[named_role("Casting Assistant")]),
            Decision::Deny("Insufficient permissions to manage users".to_owned())
        );
    }

    #[test]
    fn unknown_target_roles_are_ignored_for_leveling() {
        let director = set(&["post:actors"]);
        let roles = [named_role("Payroll Admin"), named_role("Casting Assistant")];
        assert!(can_manage(&director, &roles).is_allow());
    }

    #[test]
    fn role_assignment_follows_the_hierarchy() {
        let producer = set(&["delete:movies", "post:movies"]);
        let director = set(&["delete:actors"]);

        assert_eq!(
            can_assign(&producer, "Executive Producer"),
            Decision::Deny("Cannot assign Executive Producer role via API".to_owned())
        );
        assert!(can_assign(&producer, "Casting Director").is_allow());
        assert!(can_assign(&producer, "Casting Assistant").is_allow());

        assert!(can_assign(&director, "Casting Assistant").is_allow());
        assert!(!can_assign(&director, "Casting Director").is_allow());
        assert!(!can_assign(&director, "Executive Producer").is_allow());
    }

    #[test]
    fn unknown_role_names_are_invalid_for_everyone() {
        let producer = set(&["delete:movies", "post:movies"]);
        assert_eq!(
            can_assign(&producer, "Payroll Admin"),
            Decision::Deny("Invalid role: Payroll Admin".to_owned())
        );
    }

    #[test]
    fn assistant_cannot_assign_roles() {
        let assistant = set(&["get:movies"]);
        assert_eq!(
            can_assign(&assistant, "Casting Assistant"),
            Decision::Deny("Insufficient permissions to assign roles".to_owned())
        );
    }

    #[test]
    fn producer_sees_all_users() {
        let producer = set(&["delete:movies", "post:movies"]);
        let users = vec![
            user_with(&["delete:movies", "post:movies"]),
            user_with(&["get:movies"]),
        ];
        assert_eq!(filter_users(users, &producer).len(), 2);
    }

    #[test]
    fn director_never_sees_users_above_level_one() {
        let director = set(&["post:actors"]);
        let users = vec![
            user_with(&["get:movies"]),
            user_with(&[]),
            user_with(&["delete:actors"]),
            user_with(&["delete:movies", "post:movies"]),
        ];

        let visible = filter_users(users, &director);
        assert_eq!(visible.len(), 2);
        for user in &visible {
            let level = derive_level(&PermissionSet::new(user.permissions.clone()));
            assert!(level <= Role::CastingAssistant.level());
        }
    }

    #[test]
    fn assistants_see_nobody() {
        let assistant = set(&["get:movies"]);
        let users = vec![user_with(&["get:movies"])];
        assert!(filter_users(users, &assistant).is_empty());
    }

    #[test]
    fn assignable_roles_match_the_assignment_rule() {
        let all_roles = vec![
            named_role("Casting Assistant"),
            named_role("Casting Director"),
            named_role("Executive Producer"),
            named_role("Payroll Admin"),
        ];

        let producer = set(&["delete:movies", "post:movies"]);
        let names: Vec<_> = assignable_roles(&producer, all_roles.clone())
            .into_iter()
            .map(|role| role.name)
            .collect();
        assert_eq!(names, vec!["Casting Assistant", "Casting Director"]);

        let director = set(&["post:actors"]);
        let names: Vec<_> = assignable_roles(&director, all_roles.clone())
            .into_iter()
            .map(|role| role.name)
            .collect();
        assert_eq!(names, vec!["Casting Assistant"]);

        let assistant = set(&["get:movies"]);
        assert!(assignable_roles(&assistant, all_roles).is_empty());
    }
}
