use async_trait::async_trait;

use crate::domain::user::models::AuthSession;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserProfile;
use crate::user::errors::TokenError;
use crate::user::errors::UserError;

/// Port for user domain service operations.
///
/// Every value returned through this port is a `UserProfile`; password
/// hashes never cross it.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new user and issue a token for them.
    ///
    /// # Arguments
    /// * `command` - Validated command containing email, name and password
    ///
    /// # Returns
    /// Public view of the created user and a bearer token
    ///
    /// # Errors
    /// * `DuplicateIdentity` - Email is already registered
    /// * `PasswordHashing` - Password could not be hashed
    /// * `Token` - Token could not be issued
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterCommand) -> Result<AuthSession, UserError>;

    /// Authenticate with email and password.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (indistinguishable)
    /// * `Token` - Token could not be issued
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, command: LoginCommand) -> Result<AuthSession, UserError>;

    /// Retrieve user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<UserProfile, UserError>;

    /// Retrieve every registered user.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_all(&self) -> Result<Vec<UserProfile>, UserError>;
}

/// Persistence operations for user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// Uniqueness of the email is enforced by the store itself, so concurrent
    /// registrations of the same address resolve to exactly one winner.
    ///
    /// # Errors
    /// * `DuplicateIdentity` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn insert(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve all users, oldest first.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_all(&self) -> Result<Vec<User>, UserError>;
}

/// One-way salted password hashing.
pub trait CredentialHasher: Send + Sync + 'static {
    /// Hash a plaintext password with a fresh salt.
    ///
    /// # Errors
    /// * `PasswordHashing` - Hashing primitive failed
    fn hash(&self, password: &str) -> Result<String, UserError>;

    /// Check a plaintext password against a stored hash.
    ///
    /// Returns false for a malformed stored hash.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Signed, time-limited bearer tokens carrying a user identifier.
pub trait TokenIssuer: Send + Sync + 'static {
    /// Issue a token whose subject is `user_id`.
    ///
    /// # Errors
    /// * `IssuanceFailed` - Token could not be signed
    fn issue(&self, user_id: &UserId) -> Result<String, TokenError>;

    /// Verify a token and return its subject.
    ///
    /// # Errors
    /// * `Expired` - Validity window has elapsed
    /// * `Invalid` - Signature mismatch, malformed token or bad subject
    fn verify(&self, token: &str) -> Result<UserId, TokenError>;
}
