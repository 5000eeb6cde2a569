use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use model::entities::publisher;
use sea_orm::{ActiveModelTrait, DbErr, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Request body for creating a new publisher
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreatePublisherRequest {
    /// Publisher name (must be unique)
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 100))]
    pub country: Option<String>,
}

/// Request body for updating a publisher
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdatePublisherRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 100))]
    pub country: Option<String>,
}

/// Publisher response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PublisherResponse {
    pub id: i32,
    pub name: String,
    pub country: Option<String>,
}

impl From<publisher::Model> for PublisherResponse {
    fn from(model: publisher::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            country: model.country,
        }
    }
}

/// Create a new publisher
#[utoipa::path(
    post,
    path = "/api/v1/publishers",
    tag = "publishers",
    request_body = CreatePublisherRequest,
    responses(
        (status = 201, description = "Publisher created successfully", body = ApiResponse<PublisherResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Publisher name already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_publisher(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreatePublisherRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<PublisherResponse>>), (StatusCode, Json<ErrorResponse>)> {
    let new_publisher = publisher::ActiveModel {
        name: Set(request.name.clone()),
        country: Set(request.country.clone()),
        ..Default::default()
    };

    match new_publisher.insert(&state.db).await {
        Ok(model) => {
            info!("Publisher created with ID: {}", model.id);
            let response = ApiResponse {
                data: PublisherResponse::from(model),
                message: "Publisher created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(db_error) => {
            error!("Failed to create publisher '{}': {}", request.name, db_error);

            let error_msg = db_error.to_string().to_lowercase();
            if matches!(db_error, DbErr::Exec(_))
                && (error_msg.contains("unique") || error_msg.contains("constraint"))
            {
                Err((
                    StatusCode::CONFLICT,
                    Json(ErrorResponse {
                        error: format!("Publisher '{}' already exists", request.name),
                        code: "PUBLISHER_ALREADY_EXISTS".to_string(),
                        success: false,
                    }),
                ))
            } else {
                Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Internal server error while creating publisher".to_string(),
                        code: "DATABASE_ERROR".to_string(),
                        success: false,
                    }),
                ))
            }
        }
    }
}

/// Get all publishers
#[utoipa::path(
    get,
    path = "/api/v1/publishers",
    tag = "publishers",
    responses(
        (status = 200, description = "Publishers retrieved successfully", body = ApiResponse<Vec<PublisherResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_publishers(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<PublisherResponse>>>, StatusCode> {
    match publisher::Entity::find().all(&state.db).await {
        Ok(publishers) => {
            let response = ApiResponse {
                data: publishers.into_iter().map(PublisherResponse::from).collect(),
                message: "Publishers retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to retrieve publishers: {}", db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get a specific publisher by ID
#[utoipa::path(
    get,
    path = "/api/v1/publishers/{publisher_id}",
    tag = "publishers",
    params(
        ("publisher_id" = i32, Path, description = "Publisher ID"),
    ),
    responses(
        (status = 200, description = "Publisher retrieved successfully", body = ApiResponse<PublisherResponse>),
        (status = 404, description = "Publisher not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_publisher(
    Path(publisher_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<PublisherResponse>>, StatusCode> {
    match publisher::Entity::find_by_id(publisher_id).one(&state.db).await {
        Ok(Some(model)) => {
            let response = ApiResponse {
                data: PublisherResponse::from(model),
                message: "Publisher retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            warn!("Publisher with ID {} not found", publisher_id);
            Err(StatusCode::NOT_FOUND)
        }
        Err(db_error) => {
            error!("Failed to retrieve publisher {}: {}", publisher_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Update a publisher
#[utoipa::path(
    put,
    path = "/api/v1/publishers/{publisher_id}",
    tag = "publishers",
    params(
        ("publisher_id" = i32, Path, description = "Publisher ID"),
    ),
    request_body = UpdatePublisherRequest,
    responses(
        (status = 200, description = "Publisher updated successfully", body = ApiResponse<PublisherResponse>),
        (status = 404, description = "Publisher not found", body = ErrorResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_publisher(
    Path(publisher_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdatePublisherRequest>>,
) -> Result<Json<ApiResponse<PublisherResponse>>, StatusCode> {
    let existing = match publisher::Entity::find_by_id(publisher_id).one(&state.db).await {
        Ok(Some(model)) => model,
        Ok(None) => {
            warn!("Publisher with ID {} not found for update", publisher_id);
            return Err(StatusCode::NOT_FOUND);
        }
        Err(db_error) => {
            error!("Failed to lookup publisher {}: {}", publisher_id, db_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let mut active: publisher::ActiveModel = existing.into();

    if let Some(name) = request.name {
        active.name = Set(name);
    }
    if let Some(country) = request.country {
        active.country = Set(Some(country));
    }

    match active.update(&state.db).await {
        Ok(updated) => {
            info!("Publisher {} updated successfully", publisher_id);
            let response = ApiResponse {
                data: PublisherResponse::from(updated),
                message: "Publisher updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to update publisher {}: {}", publisher_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Delete a publisher
#[utoipa::path(
    delete,
    path = "/api/v1/publishers/{publisher_id}",
    tag = "publishers",
    params(
        ("publisher_id" = i32, Path, description = "Publisher ID"),
    ),
    responses(
        (status = 200, description = "Publisher deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Publisher not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_publisher(
    Path(publisher_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, StatusCode> {
    match publisher::Entity::delete_by_id(publisher_id).exec(&state.db).await {
        Ok(delete_result) => {
            if delete_result.rows_affected > 0 {
                info!("Publisher {} deleted successfully", publisher_id);
                let response = ApiResponse {
                    data: format!("Publisher {} deleted", publisher_id),
                    message: "Publisher deleted successfully".to_string(),
                    success: true,
                };
                Ok(Json(response))
            } else {
                warn!("Publisher {} not found for deletion", publisher_id);
                Err(StatusCode::NOT_FOUND)
            }
        }
        Err(db_error) => {
            error!("Failed to delete publisher {}: {}", publisher_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
