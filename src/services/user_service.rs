//! User Service
//!
//! Account registration and profile reads/updates. Profile reads go through
//! the shared read-through cache; updates invalidate it after the write.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::cache::{CacheAsideStore, Lookup};
use crate::error::{AppError, Result};
use crate::models::{NewUser, ProfileUpdate, User, UserId, UserProfile};
use crate::repository::UserRepository;

/// Cache key of a user's profile projection.
pub fn profile_key(user_id: UserId) -> String {
    format!("user_profile:{}", user_id)
}

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    cache: Arc<CacheAsideStore>,
    profile_ttl: Duration,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        cache: Arc<CacheAsideStore>,
        profile_ttl: Duration,
    ) -> Self {
        Self {
            users,
            cache,
            profile_ttl,
        }
    }

    // == Register ==
    pub async fn register(&self, new_user: NewUser) -> Result<User> {
        if let Some(msg) = new_user.validate() {
            return Err(AppError::Validation(msg));
        }

        let user = self.users.create(new_user).await?;
        info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user)
    }

    // == Get Profile ==
    /// Returns the profile of `user_id`, served from cache when fresh.
    pub async fn get_user_profile(&self, user_id: UserId) -> Result<Option<UserProfile>> {
        let users = Arc::clone(&self.users);
        let loader = || async move {
            let user = users.get(user_id).await?;
            Ok::<_, AppError>(Lookup::from(user.as_ref().map(UserProfile::from)))
        };

        self.cache
            .get(&profile_key(user_id), loader, self.profile_ttl)
            .await
    }

    // == Update Profile ==
    /// Writes the update, then drops the cached profile.
    ///
    /// Returns None if the user does not exist.
    pub async fn update_user_profile(
        &self,
        user_id: UserId,
        update: ProfileUpdate,
    ) -> Result<Option<User>> {
        if let Some(msg) = update.validate() {
            return Err(AppError::Validation(msg));
        }

        let Some(user) = self.users.update(user_id, update).await? else {
            return Ok(None);
        };

        self.cache.invalidate(&profile_key(user_id)).await?;
        info!(user_id, "User profile updated");
        Ok(Some(user))
    }
}
