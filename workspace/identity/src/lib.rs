//! Identity subsystem for the game shop: password policy enforcement,
//! password hashing, credential verification and role management.
//!
//! Handlers in the web layer call into this crate instead of touching
//! password material or the roles join table directly.

pub mod accounts;
pub mod error;
pub mod hash;
pub mod password;
pub mod roles;

pub use error::{IdentityError, Result};
pub use password::{PasswordPolicy, PasswordRequirement};
