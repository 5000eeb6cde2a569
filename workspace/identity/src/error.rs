use thiserror::Error;

use crate::password::PasswordRequirement;

/// Error types for the identity module
#[derive(Error, Debug)]
pub enum IdentityError {
    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Error from password hashing or hash parsing
    #[error("Password hashing error: {0}")]
    Hash(String),

    /// The password failed one or more policy requirements
    #[error("Password does not satisfy the password policy")]
    PolicyViolation(Vec<PasswordRequirement>),

    /// Unknown username or wrong password. Deliberately does not say which.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Referenced user does not exist
    #[error("User {0} not found")]
    UserNotFound(i32),

    /// Referenced role does not exist
    #[error("Role {0} not found")]
    RoleNotFound(i32),
}

/// Type alias for Result with IdentityError
pub type Result<T> = std::result::Result<T, IdentityError>;
