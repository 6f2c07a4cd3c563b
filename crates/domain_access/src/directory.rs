//! User directory backing the administration screen

use core_kernel::UserId;

use crate::user::{User, UserRole};

/// Locally held list of users with search and role filtering
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: Vec<User>,
}

impl UserDirectory {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn get(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Users whose name or email contains `search` (case-insensitive)
    /// and, when given, whose role matches
    pub fn filter(&self, search: &str, role: Option<UserRole>) -> Vec<&User> {
        let needle = search.trim().to_lowercase();
        self.users
            .iter()
            .filter(|user| {
                let matches_search = needle.is_empty()
                    || user.display_name.to_lowercase().contains(&needle)
                    || user.email.to_lowercase().contains(&needle);
                let matches_role = role.map_or(true, |r| user.role == r);
                matches_search && matches_role
            })
            .collect()
    }

    /// Replaces the user with the same id, or appends a new one
    pub fn upsert(&mut self, user: User) {
        match self.users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user,
            None => self.users.push(user),
        }
    }

    /// Removes a user, returning it if present
    pub fn remove(&mut self, id: UserId) -> Option<User> {
        let index = self.users.iter().position(|u| u.id == id)?;
        Some(self.users.remove(index))
    }
}
