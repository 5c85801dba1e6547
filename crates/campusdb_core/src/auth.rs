//! Role table backing the authorization gate.

use crate::types::ActorId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Roles known to the registry: one admin plus a set of authorized
/// instructors.
///
/// The table is injected into the facade at construction and mutated
/// only through its admin-gated operations. It answers the two oracle
/// questions the orchestrator asks; it performs no identity
/// verification of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleTable {
    /// The designated admin.
    admin: ActorId,
    /// Actors allowed to perform instructor-level mutations.
    instructors: HashSet<ActorId>,
}

impl RoleTable {
    /// Creates a table with the given admin and no instructors.
    #[must_use]
    pub fn new(admin: ActorId) -> Self {
        Self {
            admin,
            instructors: HashSet::new(),
        }
    }

    /// Returns the admin actor.
    #[must_use]
    pub fn admin(&self) -> ActorId {
        self.admin
    }

    /// Returns `true` if the caller is the admin.
    #[must_use]
    pub fn is_admin(&self, caller: ActorId) -> bool {
        caller == self.admin
    }

    /// Returns `true` if the caller is the admin or an authorized
    /// instructor.
    #[must_use]
    pub fn is_authorized(&self, caller: ActorId) -> bool {
        self.is_admin(caller) || self.instructors.contains(&caller)
    }

    /// Adds an actor to the instructor set. Returns `false` if already
    /// present.
    pub fn grant(&mut self, actor: ActorId) -> bool {
        self.instructors.insert(actor)
    }

    /// Removes an actor from the instructor set. Returns `false` if it
    /// was not present.
    pub fn revoke(&mut self, actor: ActorId) -> bool {
        self.instructors.remove(&actor)
    }

    /// Returns the number of authorized instructors.
    #[must_use]
    pub fn instructor_count(&self) -> usize {
        self.instructors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_is_always_authorized() {
        let roles = RoleTable::new(ActorId::new(1));
        assert!(roles.is_admin(ActorId::new(1)));
        assert!(roles.is_authorized(ActorId::new(1)));
    }

    #[test]
    fn instructor_is_authorized_but_not_admin() {
        let mut roles = RoleTable::new(ActorId::new(1));
        let instructor = ActorId::new(2);
        assert!(roles.grant(instructor));

        assert!(roles.is_authorized(instructor));
        assert!(!roles.is_admin(instructor));
    }

    #[test]
    fn outsider_has_no_role() {
        let roles = RoleTable::new(ActorId::new(1));
        let outsider = ActorId::new(99);
        assert!(!roles.is_authorized(outsider));
        assert!(!roles.is_admin(outsider));
    }

    #[test]
    fn revoke_removes_authorization() {
        let mut roles = RoleTable::new(ActorId::new(1));
        let instructor = ActorId::new(2);
        roles.grant(instructor);
        assert!(roles.revoke(instructor));

        assert!(!roles.is_authorized(instructor));
        assert!(!roles.revoke(instructor));
    }

    #[test]
    fn grant_is_idempotent_on_membership() {
        let mut roles = RoleTable::new(ActorId::new(1));
        let instructor = ActorId::new(2);
        assert!(roles.grant(instructor));
        assert!(!roles.grant(instructor));
        assert_eq!(roles.instructor_count(), 1);
    }
}
