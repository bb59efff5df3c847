//! # User Repository
//!
//! Advisory user list behind the login screen. Not a security boundary:
//! anyone with access to the data directory can edit the file. The one
//! hard rule is that the last admin can never be deleted, so the login
//! screen always has at least one admin to offer.
//!
//! The list is seeded lazily with a default admin on first read.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use medistore_core::validation::validate_email;
use medistore_core::{CoreError, User, UserRole};

use crate::backend::StorageBackend;
use crate::error::{StoreError, StoreResult};
use crate::store::PharmacyStore;

/// Email of the admin seeded into an empty user list.
const DEFAULT_ADMIN_EMAIL: &str = "admin@medistore.com";

/// Repository for store users.
#[derive(Debug)]
pub struct UserRepository<'a, B> {
    store: &'a PharmacyStore<B>,
}

impl<'a, B: StorageBackend> UserRepository<'a, B> {
    pub fn new(store: &'a PharmacyStore<B>) -> Self {
        UserRepository { store }
    }

    /// Returns every user, seeding the default admin if the list is empty.
    pub fn all(&self) -> StoreResult<Vec<User>> {
        let users = self.store.users()?;
        if !users.is_empty() {
            return Ok(users);
        }

        let seeded = vec![User {
            id: Uuid::new_v4().to_string(),
            email: DEFAULT_ADMIN_EMAIL.to_string(),
            role: UserRole::Admin,
            created_at: Utc::now(),
        }];
        self.store.save_users(&seeded)?;
        info!(email = DEFAULT_ADMIN_EMAIL, "Seeded default admin");
        Ok(seeded)
    }

    /// Finds a user by email, case-insensitively.
    pub fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self
            .all()?
            .into_iter()
            .find(|u| u.email.eq_ignore_ascii_case(email)))
    }

    /// Adds a user, rejecting duplicate emails (case-insensitive).
    pub fn add(&self, email: &str, role: UserRole) -> StoreResult<User> {
        validate_email(email)?;

        let mut users = self.all()?;
        if users.iter().any(|u| u.email.eq_ignore_ascii_case(email)) {
            return Err(StoreError::Core(CoreError::DuplicateUser {
                email: email.to_string(),
            }));
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        self.store.save_users(&users)?;

        info!(email = %user.email, role = ?user.role, "User added");
        Ok(user)
    }

    /// Changes a user's role. Returns `false` for unknown ids.
    pub fn update_role(&self, id: &str, role: UserRole) -> StoreResult<bool> {
        let mut users = self.all()?;

        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(false);
        };
        user.role = role;
        self.store.save_users(&users)?;
        Ok(true)
    }

    /// Deletes a user.
    ///
    /// Refuses with `LastAdmin` when the target is the only remaining
    /// admin. Unknown ids are a no-op.
    pub fn delete(&self, id: &str) -> StoreResult<()> {
        let mut users = self.all()?;

        let Some(target) = users.iter().find(|u| u.id == id) else {
            return Ok(());
        };

        if target.role == UserRole::Admin {
            let admins = users.iter().filter(|u| u.role == UserRole::Admin).count();
            if admins <= 1 {
                return Err(StoreError::Core(CoreError::LastAdmin));
            }
        }

        users.retain(|u| u.id != id);
        self.store.save_users(&users)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
