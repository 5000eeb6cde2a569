use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use model::entities::developer;
use sea_orm::{ActiveModelTrait, DbErr, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Request body for creating a new developer
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateDeveloperRequest {
    /// Studio name (must be unique)
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Country the studio is based in
    #[validate(length(max = 100))]
    pub country: Option<String>,
}

/// Request body for updating a developer
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateDeveloperRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 100))]
    pub country: Option<String>,
}

/// Developer response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeveloperResponse {
    pub id: i32,
    pub name: String,
    pub country: Option<String>,
}

impl From<developer::Model> for DeveloperResponse {
    fn from(model: developer::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            country: model.country,
        }
    }
}

/// Create a new developer
#[utoipa::path(
    post,
    path = "/api/v1/developers",
    tag = "developers",
    request_body = CreateDeveloperRequest,
    responses(
        (status = 201, description = "Developer created successfully", body = ApiResponse<DeveloperResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Developer name already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_developer(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateDeveloperRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<DeveloperResponse>>), (StatusCode, Json<ErrorResponse>)> {
    debug!("Creating developer '{}'", request.name);

    let new_developer = developer::ActiveModel {
        name: Set(request.name.clone()),
        country: Set(request.country.clone()),
        ..Default::default()
    };

    match new_developer.insert(&state.db).await {
        Ok(model) => {
            info!("Developer created with ID: {}", model.id);
            let response = ApiResponse {
                data: DeveloperResponse::from(model),
                message: "Developer created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(db_error) => {
            error!("Failed to create developer '{}': {}", request.name, db_error);

            let error_msg = db_error.to_string().to_lowercase();
            if matches!(db_error, DbErr::Exec(_))
                && (error_msg.contains("unique") || error_msg.contains("constraint"))
            {
                Err((
                    StatusCode::CONFLICT,
                    Json(ErrorResponse {
                        error: format!("Developer '{}' already exists", request.name),
                        code: "DEVELOPER_ALREADY_EXISTS".to_string(),
                        success: false,
                    }),
                ))
            } else {
                Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Internal server error while creating developer".to_string(),
                        code: "DATABASE_ERROR".to_string(),
                        success: false,
                    }),
                ))
            }
        }
    }
}

/// Get all developers
#[utoipa::path(
    get,
    path = "/api/v1/developers",
    tag = "developers",
    responses(
        (status = 200, description = "Developers retrieved successfully", body = ApiResponse<Vec<DeveloperResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_developers(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<DeveloperResponse>>>, StatusCode> {
    match developer::Entity::find().all(&state.db).await {
        Ok(developers) => {
            debug!("Retrieved {} developers", developers.len());
            let response = ApiResponse {
                data: developers.into_iter().map(DeveloperResponse::from).collect(),
                message: "Developers retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to retrieve developers: {}", db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get a specific developer by ID
#[utoipa::path(
    get,
    path = "/api/v1/developers/{developer_id}",
    tag = "developers",
    params(
        ("developer_id" = i32, Path, description = "Developer ID"),
    ),
    responses(
        (status = 200, description = "Developer retrieved successfully", body = ApiResponse<DeveloperResponse>),
        (status = 404, description = "Developer not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_developer(
    Path(developer_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DeveloperResponse>>, StatusCode> {
    match developer::Entity::find_by_id(developer_id).one(&state.db).await {
        Ok(Some(model)) => {
            let response = ApiResponse {
                data: DeveloperResponse::from(model),
                message: "Developer retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            warn!("Developer with ID {} not found", developer_id);
            Err(StatusCode::NOT_FOUND)
        }
        Err(db_error) => {
            error!("Failed to retrieve developer {}: {}", developer_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Update a developer
#[utoipa::path(
    put,
    path = "/api/v1/developers/{developer_id}",
    tag = "developers",
    params(
        ("developer_id" = i32, Path, description = "Developer ID"),
    ),
    request_body = UpdateDeveloperRequest,
    responses(
        (status = 200, description = "Developer updated successfully", body = ApiResponse<DeveloperResponse>),
        (status = 404, description = "Developer not found", body = ErrorResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_developer(
    Path(developer_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateDeveloperRequest>>,
) -> Result<Json<ApiResponse<DeveloperResponse>>, StatusCode> {
    let existing = match developer::Entity::find_by_id(developer_id).one(&state.db).await {
        Ok(Some(model)) => model,
        Ok(None) => {
            warn!("Developer with ID {} not found for update", developer_id);
            return Err(StatusCode::NOT_FOUND);
        }
        Err(db_error) => {
            error!("Failed to lookup developer {}: {}", developer_id, db_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let mut active: developer::ActiveModel = existing.into();

    if let Some(name) = request.name {
        active.name = Set(name);
    }
    if let Some(country) = request.country {
        active.country = Set(Some(country));
    }

    match active.update(&state.db).await {
        Ok(updated) => {
            info!("Developer {} updated successfully", developer_id);
            let response = ApiResponse {
                data: DeveloperResponse::from(updated),
                message: "Developer updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to update developer {}: {}", developer_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Delete a developer
#[utoipa::path(
    delete,
    path = "/api/v1/developers/{developer_id}",
    tag = "developers",
    params(
        ("developer_id" = i32, Path, description = "Developer ID"),
    ),
    responses(
        (status = 200, description = "Developer deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Developer not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_developer(
    Path(developer_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, StatusCode> {
    match developer::Entity::delete_by_id(developer_id).exec(&state.db).await {
        Ok(delete_result) => {
            if delete_result.rows_affected > 0 {
                info!("Developer {} deleted successfully", developer_id);
                let response = ApiResponse {
                    data: format!("Developer {} deleted", developer_id),
                    message: "Developer deleted successfully".to_string(),
                    success: true,
                };
                Ok(Json(response))
            } else {
                warn!("Developer {} not found for deletion", developer_id);
                Err(StatusCode::NOT_FOUND)
            }
        }
        Err(db_error) => {
            error!("Failed to delete developer {}: {}", developer_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
