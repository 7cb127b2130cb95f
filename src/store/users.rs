use std::collections::hash_map::{Entry, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use super::StoreError;
use crate::models::{NewUser, User, UserPatch};

/// Registered users keyed by username.
///
/// Ids come from a process-wide counter, so a deleted and re-registered
/// username gets a fresh id.
pub struct UserStore {
    users: RwLock<HashMap<String, User>>,
    next_id: AtomicU64,
}

impl UserStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Inserts a new user, failing if the username is taken.
    pub fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        self.create_with(new_user, |_| ())
    }

    /// Like [`UserStore::create`], but runs `then` on the new record before
    /// the user map is unlocked.
    pub fn create_with<F>(&self, new_user: NewUser, then: F) -> Result<User, StoreError>
    where
        F: FnOnce(&User),
    {
        let mut users = self.write();
        match users.entry(new_user.username) {
            Entry::Occupied(slot) => Err(StoreError::UserExists(slot.key().clone())),
            Entry::Vacant(slot) => {
                let user = User {
                    id: self.next_id.fetch_add(1, Ordering::Relaxed),
                    username: slot.key().clone(),
                    first_name: new_user.first_name,
                    last_name: new_user.last_name,
                    email: new_user.email,
                    password_hash: new_user.password_hash,
                    created_at: Utc::now(),
                };
                then(&user);
                Ok(slot.insert(user).clone())
            }
        }
    }

    pub fn get(&self, username: &str) -> Result<User, StoreError> {
        self.read()
            .get(username)
            .cloned()
            .ok_or_else(|| StoreError::UserNotFound(username.to_owned()))
    }

    pub fn contains(&self, username: &str) -> bool {
        self.read().contains_key(username)
    }

    /// Runs `f` on the stored user under the read lock. The account cannot be
    /// deleted or renamed until `f` returns.
    pub fn with_user<R, F>(&self, username: &str, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&User) -> R,
    {
        let users = self.read();
        let user = users
            .get(username)
            .ok_or_else(|| StoreError::UserNotFound(username.to_owned()))?;
        Ok(f(user))
    }

    /// Applies the non-empty fields of `patch` to the user stored under `username`.
    ///
    /// If the patch carries a different username the record is re-keyed; that
    /// fails with `UserExists` when the new name is taken and leaves the store
    /// unchanged.
    pub fn update(&self, username: &str, patch: UserPatch) -> Result<User, StoreError> {
        self.update_with(username, patch, |_| ())
    }

    /// Like [`UserStore::update`], but runs `then` on the updated record
    /// before the user map is unlocked.
    pub fn update_with<F>(&self, username: &str, patch: UserPatch, then: F) -> Result<User, StoreError>
    where
        F: FnOnce(&User),
    {
        let mut users = self.write();
        if !users.contains_key(username) {
            return Err(StoreError::UserNotFound(username.to_owned()));
        }

        let new_key = patch
            .username
            .as_deref()
            .filter(|name| !name.is_empty() && *name != username);
        if let Some(new_key) = new_key {
            if users.contains_key(new_key) {
                return Err(StoreError::UserExists(new_key.to_owned()));
            }
        }

        let mut user = users
            .remove(username)
            .ok_or_else(|| StoreError::UserNotFound(username.to_owned()))?;
        patch.apply_to(&mut user);
        users.insert(user.username.clone(), user.clone());
        then(&user);
        Ok(user)
    }

    pub fn delete(&self, username: &str) -> Result<(), StoreError> {
        self.delete_with(username, || ())
    }

    /// Like [`UserStore::delete`], but runs `then` before the user map is
    /// unlocked and returns its result.
    pub fn delete_with<R, F>(&self, username: &str, then: F) -> Result<R, StoreError>
    where
        F: FnOnce() -> R,
    {
        let mut users = self.write();
        users
            .remove(username)
            .ok_or_else(|| StoreError::UserNotFound(username.to_owned()))?;
        Ok(then())
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Hooks run after the map mutation, so a poisoned map is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, User>> {
        self.users.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, User>> {
        self.users.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}
