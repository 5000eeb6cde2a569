use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use identity::IdentityError;
use model::entities::role;
use sea_orm::{ActiveModelTrait, DbErr, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Request body for creating a new role
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateRoleRequest {
    /// Role name (must be unique)
    #[validate(length(min = 1, max = 64))]
    pub name: String,
}

/// Request body for granting a role to a user
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AssignRoleRequest {
    pub role_id: i32,
}

/// Role response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoleResponse {
    pub id: i32,
    pub name: String,
}

impl From<role::Model> for RoleResponse {
    fn from(model: role::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

/// Create a new role
#[utoipa::path(
    post,
    path = "/api/v1/roles",
    tag = "roles",
    request_body = CreateRoleRequest,
    responses(
        (status = 201, description = "Role created successfully", body = ApiResponse<RoleResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Role name already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_role(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateRoleRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<RoleResponse>>), (StatusCode, Json<ErrorResponse>)> {
    let new_role = role::ActiveModel {
        name: Set(request.name.clone()),
        ..Default::default()
    };

    match new_role.insert(&state.db).await {
        Ok(model) => {
            info!("Role created with ID: {}", model.id);
            let response = ApiResponse {
                data: RoleResponse::from(model),
                message: "Role created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(db_error) => {
            error!("Failed to create role '{}': {}", request.name, db_error);

            let error_msg = db_error.to_string().to_lowercase();
            if matches!(db_error, DbErr::Exec(_))
                && (error_msg.contains("unique") || error_msg.contains("constraint"))
            {
                Err((
                    StatusCode::CONFLICT,
                    Json(ErrorResponse {
                        error: format!("Role '{}' already exists", request.name),
                        code: "ROLE_ALREADY_EXISTS".to_string(),
                        success: false,
                    }),
                ))
            } else {
                Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Internal server error while creating role".to_string(),
                        code: "DATABASE_ERROR".to_string(),
                        success: false,
                    }),
                ))
            }
        }
    }
}

/// Get all roles
#[utoipa::path(
    get,
    path = "/api/v1/roles",
    tag = "roles",
    responses(
        (status = 200, description = "Roles retrieved successfully", body = ApiResponse<Vec<RoleResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_roles(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<RoleResponse>>>, StatusCode> {
    match role::Entity::find().all(&state.db).await {
        Ok(roles) => {
            let response = ApiResponse {
                data: roles.into_iter().map(RoleResponse::from).collect(),
                message: "Roles retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to retrieve roles: {}", db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get a specific role by ID
#[utoipa::path(
    get,
    path = "/api/v1/roles/{role_id}",
    tag = "roles",
    params(
        ("role_id" = i32, Path, description = "Role ID"),
    ),
    responses(
        (status = 200, description = "Role retrieved successfully", body = ApiResponse<RoleResponse>),
        (status = 404, description = "Role not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_role(
    Path(role_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<RoleResponse>>, StatusCode> {
    match role::Entity::find_by_id(role_id).one(&state.db).await {
        Ok(Some(model)) => {
            let response = ApiResponse {
                data: RoleResponse::from(model),
                message: "Role retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            warn!("Role with ID {} not found", role_id);
            Err(StatusCode::NOT_FOUND)
        }
        Err(db_error) => {
            error!("Failed to retrieve role {}: {}", role_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Delete a role
#[utoipa::path(
    delete,
    path = "/api/v1/roles/{role_id}",
    tag = "roles",
    params(
        ("role_id" = i32, Path, description = "Role ID"),
    ),
    responses(
        (status = 200, description = "Role deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Role not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_role(
    Path(role_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, StatusCode> {
    match role::Entity::delete_by_id(role_id).exec(&state.db).await {
        Ok(delete_result) => {
            if delete_result.rows_affected > 0 {
                info!("Role {} deleted successfully", role_id);
                let response = ApiResponse {
                    data: format!("Role {} deleted", role_id),
                    message: "Role deleted successfully".to_string(),
                    success: true,
                };
                Ok(Json(response))
            } else {
                warn!("Role {} not found for deletion", role_id);
                Err(StatusCode::NOT_FOUND)
            }
        }
        Err(db_error) => {
            error!("Failed to delete role {}: {}", role_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get all roles held by a user
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/roles",
    tag = "roles",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User roles retrieved successfully", body = ApiResponse<Vec<RoleResponse>>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_user_roles(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<RoleResponse>>>, StatusCode> {
    match identity::roles::roles_for_user(&state.db, user_id).await {
        Ok(roles) => {
            let response = ApiResponse {
                data: roles.into_iter().map(RoleResponse::from).collect(),
                message: "User roles retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(IdentityError::UserNotFound(_)) => {
            warn!("User with ID {} not found", user_id);
            Err(StatusCode::NOT_FOUND)
        }
        Err(other) => {
            error!("Failed to retrieve roles for user {}: {}", user_id, other);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Grant a role to a user. Granting a role the user already holds is a no-op.
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/roles",
    tag = "roles",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    request_body = AssignRoleRequest,
    responses(
        (status = 200, description = "Role granted successfully", body = ApiResponse<String>),
        (status = 404, description = "User or role not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn assign_user_role(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<AssignRoleRequest>,
) -> Result<Json<ApiResponse<String>>, (StatusCode, Json<ErrorResponse>)> {
    match identity::roles::assign_role(&state.db, user_id, request.role_id).await {
        Ok(()) => {
            info!("Role {} granted to user {}", request.role_id, user_id);
            let response = ApiResponse {
                data: format!("Role {} granted to user {}", request.role_id, user_id),
                message: "Role granted successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(IdentityError::UserNotFound(_)) => {
            warn!("User with ID {} not found", user_id);
            Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("User {} not found", user_id),
                    code: "USER_NOT_FOUND".to_string(),
                    success: false,
                }),
            ))
        }
        Err(IdentityError::RoleNotFound(_)) => {
            warn!("Role with ID {} not found", request.role_id);
            Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Role {} not found", request.role_id),
                    code: "ROLE_NOT_FOUND".to_string(),
                    success: false,
                }),
            ))
        }
        Err(other) => {
            error!(
                "Failed to grant role {} to user {}: {}",
                request.role_id, user_id, other
            );
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error while granting role".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

/// Revoke a role from a user
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}/roles/{role_id}",
    tag = "roles",
    params(
        ("user_id" = i32, Path, description = "User ID"),
        ("role_id" = i32, Path, description = "Role ID"),
    ),
    responses(
        (status = 200, description = "Role revoked successfully", body = ApiResponse<String>),
        (status = 404, description = "User did not hold the role", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn remove_user_role(
    Path((user_id, role_id)): Path<(i32, i32)>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, StatusCode> {
    match identity::roles::remove_role(&state.db, user_id, role_id).await {
        Ok(true) => {
            info!("Role {} revoked from user {}", role_id, user_id);
            let response = ApiResponse {
                data: format!("Role {} revoked from user {}", role_id, user_id),
                message: "Role revoked successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(false) => {
            warn!("User {} does not hold role {}", user_id, role_id);
            Err(StatusCode::NOT_FOUND)
        }
        Err(identity_error) => {
            error!(
                "Failed to revoke role {} from user {}: {}",
                role_id, user_id, identity_error
            );
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
