//! Authentication utilities library
//!
//! Provides reusable authentication infrastructure for services:
//! - Password hashing (Argon2id)
//! - JWT token generation and validation
//! - Token issuance with a fixed validity window
//!
//! Each service defines its own authentication traits and adapts these implementations.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! ```
//!
//! ## Token Issuance
//! ```
//! use auth::Authenticator;
//! use chrono::Duration;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!", Duration::hours(6));
//!
//! let token = auth.issue_token("user123").unwrap();
//! let claims = auth.validate_token(&token).unwrap();
//! assert_eq!(claims.sub, "user123");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
