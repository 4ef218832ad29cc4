use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::user::errors::DisplayNameError;
use crate::user::errors::EmailError;
use crate::user::errors::PasswordPolicyError;
use crate::user::errors::UserIdError;

/// User aggregate entity.
///
/// Represents a registered principal. `password_hash` is set once at
/// registration and never leaves the domain service.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: EmailAddress,
    pub name: DisplayName,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Public view of a user, safe to hand to any caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: UserId,
    pub email: EmailAddress,
    pub name: DisplayName,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

/// A freshly authenticated user together with the bearer token issued for them.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: UserProfile,
    pub token: String,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    ///
    /// # Returns
    /// UserId with random UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validated with an RFC 5322 parser and normalized (trimmed, lower-cased) so
/// that uniqueness and lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        let normalized = email.trim().to_lowercase();
        email_address::EmailAddress::from_str(&normalized)
            .map(|_| EmailAddress(normalized))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Get email as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display name shown for a user.
///
/// Trimmed; 1-64 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    const MAX_LENGTH: usize = 64;

    pub fn new(name: String) -> Result<Self, DisplayNameError> {
        let name = name.trim().to_string();
        let length = name.chars().count();
        if length == 0 {
            Err(DisplayNameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(DisplayNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password accepted at registration.
///
/// Only ever handed to the credential hasher. `Debug` never prints the value.
#[derive(Clone)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 6;
    const MAX_LENGTH: usize = 128;

    /// Create a password that satisfies the length policy.
    ///
    /// # Errors
    /// * `TooShort` - Fewer than 6 characters
    /// * `TooLong` - More than 128 characters
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        let length = password.chars().count();
        if length < Self::MIN_LENGTH {
            Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(PasswordPolicyError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(password))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Command to register a new user with domain types
#[derive(Debug)]
pub struct RegisterCommand {
    pub email: EmailAddress,
    pub name: DisplayName,
    pub password: Password,
}

impl RegisterCommand {
    /// Construct a new register command.
    ///
    /// # Arguments
    /// * `email` - Validated email address
    /// * `name` - Validated display name
    /// * `password` - Plain text password (will be hashed by service)
    pub fn new(email: EmailAddress, name: DisplayName, password: Password) -> Self {
        Self {
            email,
            name,
            password,
        }
    }
}

/// Command to log in with an email and password.
///
/// The password is not policy-checked on login: a stored account must stay
/// reachable even if the policy tightens later.
pub struct LoginCommand {
    pub email: EmailAddress,
    pub password: String,
}

impl fmt::Debug for LoginCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCommand")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_normalized() {
        let email = EmailAddress::new("  Alice@Example.COM ".to_string()).unwrap();
        assert_eq!(email.as_str(), "alice@example.com");
    }

    #[test]
    fn test_email_rejects_invalid_format() {
        assert!(matches!(
            EmailAddress::new("not-an-email".to_string()),
            Err(EmailError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_display_name_limits() {
        assert_eq!(DisplayName::new(" Alice ".to_string()).unwrap().as_str(), "Alice");
        assert_eq!(
            DisplayName::new("   ".to_string()),
            Err(DisplayNameError::Empty)
        );
        assert!(matches!(
            DisplayName::new("a".repeat(65)),
            Err(DisplayNameError::TooLong { max: 64, actual: 65 })
        ));
    }

    #[test]
    fn test_password_policy() {
        assert!(Password::new("secret123".to_string()).is_ok());
        assert!(matches!(
            Password::new("abc".to_string()),
            Err(PasswordPolicyError::TooShort { min: 6, actual: 3 })
        ));
    }

    #[test]
    fn test_password_debug_is_redacted() {
        let password = Password::new("secret123".to_string()).unwrap();
        assert!(!format!("{:?}", password).contains("secret123"));
    }

    #[test]
    fn test_user_id_round_trips_through_string() {
        let id = UserId::new();
        assert_eq!(UserId::from_string(&id.to_string()).unwrap(), id);
        assert!(UserId::from_string("not-a-uuid").is_err());
    }

    #[test]
    fn test_profile_drops_password_hash() {
        let user = User {
            id: UserId::new(),
            email: EmailAddress::new("alice@example.com".to_string()).unwrap(),
            name: DisplayName::new("Alice".to_string()).unwrap(),
            password_hash: "$argon2id$hash".to_string(),
            is_active: true,
            created_at: Utc::now(),
        };

        let profile = UserProfile::from(&user);
        assert_eq!(profile.id, user.id);
        assert_eq!(profile.email, user.email);
        assert!(profile.is_active);
        assert!(!format!("{:?}", profile).contains("argon2"));
    }
}
