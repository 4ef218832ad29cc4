//! Signed, time-limited bearer tokens.

pub mod claims;
pub mod errors;
pub mod handler;

pub use claims::Claims;
pub use errors::JwtError;
pub use handler::JwtHandler;
