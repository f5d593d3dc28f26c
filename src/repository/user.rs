use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{StorageResult, UserRepository};
use crate::error::StorageError;
use crate::models::{NewUser, ProfileUpdate, User, UserId};

#[derive(Debug, Default)]
struct Users {
    next_id: UserId,
    rows: HashMap<UserId, User>,
}

impl Users {
    /// Checks uniqueness of username and email against every row but `skip`.
    fn check_unique(&self, username: &str, email: &str, skip: Option<UserId>) -> StorageResult<()> {
        for user in self.rows.values().filter(|u| Some(u.id) != skip) {
            if user.username == username {
                return Err(StorageError::Conflict(format!(
                    "Username '{}' is already taken",
                    username
                )));
            }
            if user.email.eq_ignore_ascii_case(email) {
                return Err(StorageError::Conflict(format!(
                    "Email '{}' is already registered",
                    email
                )));
            }
        }
        Ok(())
    }
}

/// User repository held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Users>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> StorageResult<User> {
        let mut users = self.users.write().await;
        users.check_unique(&new_user.username, &new_user.email, None)?;

        users.next_id += 1;
        let now = Utc::now();
        let user = User {
            id: users.next_id,
            username: new_user.username,
            email: new_user.email,
            bio: new_user.bio,
            avatar_url: new_user.avatar_url,
            created_at: now,
            updated_at: now,
        };
        users.rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get(&self, id: UserId) -> StorageResult<Option<User>> {
        Ok(self.users.read().await.rows.get(&id).cloned())
    }

    async fn update(&self, id: UserId, update: ProfileUpdate) -> StorageResult<Option<User>> {
        let mut users = self.users.write().await;
        let Some(mut user) = users.rows.get(&id).cloned() else {
            return Ok(None);
        };

        update.apply(&mut user);
        users.check_unique(&user.username, &user.email, Some(id))?;
        user.updated_at = Utc::now();
        users.rows.insert(id, user.clone());
        Ok(Some(user))
    }
}
