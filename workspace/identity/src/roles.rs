use model::entities::{role, user, user_role};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, Set,
};
use tracing::{debug, info, instrument};

use crate::error::{IdentityError, Result};

/// Roles every deployment starts with.
pub const DEFAULT_ROLES: [&str; 2] = ["admin", "user"];

/// Create the default roles if they do not exist yet. Idempotent, safe to
/// run on every startup.
#[instrument(skip(db))]
pub async fn seed_default_roles(db: &DatabaseConnection) -> Result<Vec<role::Model>> {
    let mut roles = Vec::with_capacity(DEFAULT_ROLES.len());
    for name in DEFAULT_ROLES {
        roles.push(ensure_role(db, name).await?);
    }
    info!("Default roles seeded");
    Ok(roles)
}

/// Find a role by name, creating it when missing.
pub async fn ensure_role(db: &DatabaseConnection, name: &str) -> Result<role::Model> {
    if let Some(existing) = role::Entity::find()
        .filter(role::Column::Name.eq(name))
        .one(db)
        .await?
    {
        debug!("Role '{}' already present with id {}", name, existing.id);
        return Ok(existing);
    }

    let created = role::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    info!("Created role '{}' with id {}", created.name, created.id);
    Ok(created)
}

/// Grant a role to a user. Granting an already-held role is a no-op.
#[instrument(skip(db))]
pub async fn assign_role(db: &DatabaseConnection, user_id: i32, role_id: i32) -> Result<()> {
    if user::Entity::find_by_id(user_id).one(db).await?.is_none() {
        return Err(IdentityError::UserNotFound(user_id));
    }
    if role::Entity::find_by_id(role_id).one(db).await?.is_none() {
        return Err(IdentityError::RoleNotFound(role_id));
    }

    let already = user_role::Entity::find_by_id((user_id, role_id))
        .one(db)
        .await?;
    if already.is_some() {
        debug!("User {} already holds role {}", user_id, role_id);
        return Ok(());
    }

    user_role::ActiveModel {
        user_id: Set(user_id),
        role_id: Set(role_id),
    }
    .insert(db)
    .await?;
    info!("Assigned role {} to user {}", role_id, user_id);
    Ok(())
}

/// Revoke a role from a user. Returns whether an assignment was removed.
#[instrument(skip(db))]
pub async fn remove_role(db: &DatabaseConnection, user_id: i32, role_id: i32) -> Result<bool> {
    let result = user_role::Entity::delete_by_id((user_id, role_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

/// All roles held by a user.
pub async fn roles_for_user(db: &DatabaseConnection, user_id: i32) -> Result<Vec<role::Model>> {
    let user = user::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(IdentityError::UserNotFound(user_id))?;
    Ok(user.find_related(role::Entity).all(db).await?)
}
