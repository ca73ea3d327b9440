//! User registration and authentication.

use crate::services::{IdGenerator, PasswordHasher};
use crate::types::{User, UserId};
use gridsim_core::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

pub struct AuthService {
    ids: Arc<dyn IdGenerator>,
    hasher: Arc<dyn PasswordHasher>,
    users: HashMap<UserId, User>,
    by_username: HashMap<String, UserId>,
}

impl AuthService {
    pub fn new(ids: Arc<dyn IdGenerator>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            ids,
            hasher,
            users: HashMap::new(),
            by_username: HashMap::new(),
        }
    }

    pub fn register_user(&mut self, username: &str, password: &str) -> Result<User> {
        if username.is_empty() {
            return Err(Error::Validation("username must not be empty".to_string()));
        }
        if password.is_empty() {
            return Err(Error::Validation("password must not be empty".to_string()));
        }
        if self.by_username.contains_key(username) {
            return Err(Error::AlreadyExists(format!("user {}", username)));
        }

        let user = User {
            id: UserId(self.ids.next_id()),
            username: username.to_string(),
            password_hash: self.hasher.hash(password),
        };

        info!(user_id = %user.id, username, "User registered");
        self.by_username.insert(user.username.clone(), user.id);
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    /// The user with these credentials, if they match
    pub fn authenticate(&self, username: &str, password: &str) -> Option<&User> {
        let user = self
            .by_username
            .get(username)
            .and_then(|id| self.users.get(id))?;

        if self.hasher.verify(password, &user.password_hash) {
            Some(user)
        } else {
            debug!(username, "Authentication failed");
            None
        }
    }

    pub fn get_user(&self, id: UserId) -> Option<&User> {
        self.users.get(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{Blake3Hasher, SequentialIds};

    fn service() -> AuthService {
        AuthService::new(Arc::new(SequentialIds::new()), Arc::new(Blake3Hasher))
    }

    #[test]
    fn test_register_and_authenticate() {
        let mut auth = service();
        let user = auth.register_user("john.doe", "password123").unwrap();
        assert_ne!(user.password_hash, "password123");

        let found = auth.authenticate("john.doe", "password123").unwrap();
        assert_eq!(found.id, user.id);
        assert!(auth.get_user(user.id).is_some());
    }

    #[test]
    fn test_wrong_password_or_user() {
        let mut auth = service();
        auth.register_user("john.doe", "password123").unwrap();

        assert!(auth.authenticate("john.doe", "wrong").is_none());
        assert!(auth.authenticate("jane.doe", "password123").is_none());
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let mut auth = service();
        auth.register_user("john.doe", "a").unwrap();
        let err = auth.register_user("john.doe", "b").unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));
    }

    #[test]
    fn test_empty_credentials_rejected() {
        let mut auth = service();
        assert!(matches!(auth.register_user("", "pw"), Err(Error::Validation(_))));
        assert!(matches!(auth.register_user("bob", ""), Err(Error::Validation(_))));
    }
}
