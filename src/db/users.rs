use super::{DB, StoreError, StoreResult, is_unique_violation};
use crate::models::user::{Role, User};

/// The `users` table, keyed by username.
#[derive(Clone)]
pub struct UserStore {
    db: DB,
}

impl UserStore {
    pub fn new(db: DB) -> Self {
        Self { db }
    }

    pub async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let users: Vec<User> = self
            .db
            .query("SELECT * OMIT id FROM users WHERE username = $username LIMIT 1")
            .bind(("username", username.to_string()))
            .await?
            .take(0)?;
        Ok(users.into_iter().next())
    }

    /// Inserts a user, failing with `Conflict` if the username is taken.
    pub async fn insert(&self, user: User) -> StoreResult<()> {
        if self.find_by_username(&user.username).await?.is_some() {
            return Err(StoreError::Conflict(format!("Username '{}' already exists", user.username)));
        }
        self.create(user).await
    }

    /// Writes the row. Two inserts that both pass the lookup above still
    /// collide on the unique index, which surfaces as `Conflict` too.
    async fn create(&self, user: User) -> StoreResult<()> {
        let username = user.username.clone();
        let result = self
            .db
            .query("CREATE users CONTENT $user RETURN NONE")
            .bind(("user", user))
            .await
            .and_then(|response| response.check());

        match result {
            Ok(_) => {
                tracing::debug!(username = %username, "user stored");
                Ok(())
            }
            Err(e) if is_unique_violation(&e) => {
                Err(StoreError::Conflict(format!("Username '{username}' already exists")))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn has_admin(&self) -> StoreResult<bool> {
        let admins: Vec<User> = self
            .db
            .query("SELECT * OMIT id FROM users WHERE role = $role LIMIT 1")
            .bind(("role", Role::Admin))
            .await?
            .take(0)?;
        Ok(!admins.is_empty())
    }
}
