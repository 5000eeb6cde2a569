use model::entities::user;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tracing::{debug, info, instrument, warn};

use crate::error::{IdentityError, Result};
use crate::hash::{hash_password, verify_password};
use crate::password::PasswordPolicy;

/// Register a new user: enforce the password policy, hash the password
/// and insert the user record.
#[instrument(skip(db, password))]
pub async fn register_user(
    db: &DatabaseConnection,
    policy: &PasswordPolicy,
    username: &str,
    email: &str,
    password: &str,
) -> Result<user::Model> {
    policy.validate(password)?;
    let password_hash = hash_password(password)?;

    let new_user = user::ActiveModel {
        username: Set(username.to_string()),
        email: Set(email.to_string()),
        password_hash: Set(password_hash),
        ..Default::default()
    };

    let user = new_user.insert(db).await?;
    info!("Registered user '{}' with id {}", user.username, user.id);
    Ok(user)
}

/// Look up a user by username and verify the supplied password.
/// Reports `InvalidCredentials` for both an unknown username and a wrong
/// password so a caller cannot probe which usernames exist.
#[instrument(skip(db, password))]
pub async fn verify_credentials(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<user::Model> {
    let Some(user) = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?
    else {
        warn!("Login attempt for unknown username '{}'", username);
        return Err(IdentityError::InvalidCredentials);
    };

    if verify_password(password, &user.password_hash)? {
        debug!("Credentials verified for user {}", user.id);
        Ok(user)
    } else {
        warn!("Wrong password for user {}", user.id);
        Err(IdentityError::InvalidCredentials)
    }
}

/// Validate a new password against the policy and return its hash.
/// Used when an existing user changes their password.
pub fn prepare_password(policy: &PasswordPolicy, password: &str) -> Result<String> {
    policy.validate(password)?;
    hash_password(password)
}

#[cfg(test)]
mod tests {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    use super::*;

    async fn setup_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");
        Migrator::up(&db, None).await.expect("Failed to run migrations");
        db
    }

    #[tokio::test]
    async fn register_and_login() {
        let db = setup_db().await;
        let policy = PasswordPolicy::default();

        let user = register_user(&db, &policy, "alice", "alice@example.com", "games1")
            .await
            .expect("registration should succeed");
        assert_eq!(user.username, "alice");
        assert_ne!(user.password_hash, "games1");

        let logged_in = verify_credentials(&db, "alice", "games1")
            .await
            .expect("login should succeed");
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn register_rejects_weak_password() {
        let db = setup_db().await;
        let policy = PasswordPolicy::default();

        let err = register_user(&db, &policy, "bob", "bob@example.com", "ab")
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::PolicyViolation(_)));

        // Nothing was inserted
        let users = user::Entity::find().all(&db).await.unwrap();
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn login_with_wrong_password_fails() {
        let db = setup_db().await;
        let policy = PasswordPolicy::default();

        register_user(&db, &policy, "carol", "carol@example.com", "games1")
            .await
            .unwrap();

        let err = verify_credentials(&db, "carol", "wrong1").await.unwrap_err();
        assert!(matches!(err, IdentityError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_with_unknown_username_fails_the_same_way() {
        let db = setup_db().await;

        let err = verify_credentials(&db, "nobody", "games1").await.unwrap_err();
        assert!(matches!(err, IdentityError::InvalidCredentials));
    }

    #[tokio::test]
    async fn duplicate_username_is_a_database_error() {
        let db = setup_db().await;
        let policy = PasswordPolicy::default();

        register_user(&db, &policy, "dave", "dave@example.com", "games1")
            .await
            .unwrap();
        let err = register_user(&db, &policy, "dave", "other@example.com", "games1")
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::Database(_)));
    }
}
