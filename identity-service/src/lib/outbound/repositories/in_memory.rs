use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Process-local credential store.
///
/// Users are kept in insertion order; the email index and the records are
/// updated under one write lock, which makes the uniqueness check atomic.
#[derive(Default)]
pub struct InMemoryUserRepository {
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    users: Vec<User>,
    by_email: HashMap<String, usize>,
    by_id: HashMap<UserId, usize>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: User) -> Result<User, UserError> {
        let mut state = self.state.write().await;

        if state.by_email.contains_key(user.email.as_str()) {
            return Err(UserError::DuplicateIdentity(user.email.to_string()));
        }
        if state.by_id.contains_key(&user.id) {
            return Err(UserError::DatabaseError(format!(
                "duplicate primary key {}",
                user.id
            )));
        }

        let index = state.users.len();
        state.by_email.insert(user.email.as_str().to_string(), index);
        state.by_id.insert(user.id, index);
        state.users.push(user.clone());

        Ok(user)
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        let state = self.state.read().await;
        Ok(state
            .by_email
            .get(email.as_str())
            .map(|&index| state.users[index].clone()))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let state = self.state.read().await;
        Ok(state.by_id.get(id).map(|&index| state.users[index].clone()))
    }

    async fn find_all(&self) -> Result<Vec<User>, UserError> {
        Ok(self.state.read().await.users.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use super::*;
    use crate::domain::user::models::DisplayName;

    fn user(email: &str) -> User {
        User {
            id: UserId::new(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            name: DisplayName::new("Someone".to_string()).unwrap(),
            password_hash: "$argon2id$hash".to_string(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let repository = InMemoryUserRepository::new();
        let alice = repository.insert(user("alice@example.com")).await.unwrap();

        let by_email = repository
            .find_by_email(&alice.email)
            .await
            .unwrap()
            .unwrap();
        let by_id = repository.find_by_id(&alice.id).await.unwrap().unwrap();

        assert_eq!(by_email.id, alice.id);
        assert_eq!(by_id.email, alice.email);
        assert!(repository
            .find_by_id(&UserId::new())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let repository = InMemoryUserRepository::new();
        repository.insert(user("alice@example.com")).await.unwrap();

        let result = repository.insert(user("ALICE@example.com")).await;

        assert!(matches!(result, Err(UserError::DuplicateIdentity(email)) if email == "alice@example.com"));
        assert_eq!(repository.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_all_keeps_insertion_order() {
        let repository = InMemoryUserRepository::new();
        let first = repository.insert(user("a@example.com")).await.unwrap();
        let second = repository.insert(user("b@example.com")).await.unwrap();

        let ids: Vec<UserId> = repository
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.id)
            .collect();

        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_registrations_have_one_winner() {
        let repository = Arc::new(InMemoryUserRepository::new());

        let attempts: Vec<_> = (0..8)
            .map(|_| {
                let repository = Arc::clone(&repository);
                tokio::spawn(async move { repository.insert(user("race@example.com")).await })
            })
            .collect();

        let mut winners = 0;
        let mut duplicates = 0;
        for attempt in attempts {
            match attempt.await.unwrap() {
                Ok(_) => winners += 1,
                Err(UserError::DuplicateIdentity(_)) => duplicates += 1,
                Err(other) => panic!("unexpected error: {:?}", other),
            }
        }

        assert_eq!(winners, 1);
        assert_eq!(duplicates, 7);
    }
}
