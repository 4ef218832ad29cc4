use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::OnceCell;

use crate::domain::user::models::AuthSession;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserProfile;
use crate::user::errors::UserError;
use crate::user::ports::CredentialHasher;
use crate::user::ports::TokenIssuer;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

const DECOY_PASSWORD: &str = "decoy-password-for-unknown-accounts";

/// Domain service implementation for registration, login and lookup.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR, CH, TI>
where
    UR: UserRepository,
    CH: CredentialHasher,
    TI: TokenIssuer,
{
    repository: Arc<UR>,
    hasher: Arc<CH>,
    tokens: Arc<TI>,
    /// Hash verified against when the email is unknown, so both login
    /// failures cost one Argon2 verification.
    decoy_hash: OnceCell<String>,
}

impl<UR, CH, TI> UserService<UR, CH, TI>
where
    UR: UserRepository,
    CH: CredentialHasher,
    TI: TokenIssuer,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Credential store
    /// * `hasher` - Password hashing implementation
    /// * `tokens` - Bearer token issuer
    ///
    /// # Returns
    /// Configured user service instance
    pub fn new(repository: Arc<UR>, hasher: Arc<CH>, tokens: Arc<TI>) -> Self {
        Self {
            repository,
            hasher,
            tokens,
            decoy_hash: OnceCell::new(),
        }
    }

    // Argon2 is CPU-bound; run it on the blocking pool.
    async fn hash_password(&self, password: String) -> Result<String, UserError> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| UserError::PasswordHashing(e.to_string()))?
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool, UserError> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| UserError::PasswordHashing(e.to_string()))
    }

    async fn verify_against_decoy(&self, password: String) {
        let decoy = match self
            .decoy_hash
            .get_or_try_init(|| self.hash_password(DECOY_PASSWORD.to_string()))
            .await
        {
            Ok(hash) => hash.clone(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to prepare decoy hash");
                return;
            }
        };

        if let Err(e) = self.verify_password(password, decoy).await {
            tracing::error!(error = %e, "Decoy verification failed");
        }
    }

    fn open_session(&self, user: User) -> Result<AuthSession, UserError> {
        let token = self.tokens.issue(&user.id)?;
        Ok(AuthSession {
            user: user.into(),
            token,
        })
    }
}

#[async_trait]
impl<UR, CH, TI> UserServicePort for UserService<UR, CH, TI>
where
    UR: UserRepository,
    CH: CredentialHasher,
    TI: TokenIssuer,
{
    async fn register(&self, command: RegisterCommand) -> Result<AuthSession, UserError> {
        let password_hash = self
            .hash_password(command.password.expose().to_string())
            .await?;

        let user = User {
            id: UserId::new(),
            email: command.email,
            name: command.name,
            password_hash,
            is_active: true,
            created_at: Utc::now(),
        };

        let created_user = self.repository.insert(user).await.map_err(|e| {
            if let UserError::DuplicateIdentity(email) = &e {
                tracing::warn!(email = %email, "Registration rejected: email already exists");
            }
            e
        })?;

        tracing::info!(
            user_id = %created_user.id,
            email = %created_user.email,
            "User registered"
        );

        self.open_session(created_user)
    }

    async fn login(&self, command: LoginCommand) -> Result<AuthSession, UserError> {
        let Some(user) = self.repository.find_by_email(&command.email).await? else {
            self.verify_against_decoy(command.password).await;
            tracing::warn!(email = %command.email, "Login failed: unknown email");
            return Err(UserError::InvalidCredentials);
        };

        let password_matches = self
            .verify_password(command.password, user.password_hash.clone())
            .await?;

        if !password_matches {
            tracing::warn!(user_id = %user.id, "Login failed: password mismatch");
            return Err(UserError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, "User logged in");

        self.open_session(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<UserProfile, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .map(UserProfile::from)
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn list_all(&self) -> Result<Vec<UserProfile>, UserError> {
        let users = self.repository.find_all().await?;
        Ok(users.into_iter().map(UserProfile::from).collect())
    }
}
