use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use model::entities::genre;
use sea_orm::{ActiveModelTrait, DbErr, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Request body for creating a new genre
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateGenreRequest {
    /// Genre name (must be unique)
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

/// Request body for updating a genre
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateGenreRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

/// Genre response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GenreResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

impl From<genre::Model> for GenreResponse {
    fn from(model: genre::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
        }
    }
}

/// Create a new genre
#[utoipa::path(
    post,
    path = "/api/v1/genres",
    tag = "genres",
    request_body = CreateGenreRequest,
    responses(
        (status = 201, description = "Genre created successfully", body = ApiResponse<GenreResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Genre name already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_genre(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateGenreRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<GenreResponse>>), (StatusCode, Json<ErrorResponse>)> {
    let new_genre = genre::ActiveModel {
        name: Set(request.name.clone()),
        description: Set(request.description.clone()),
        ..Default::default()
    };

    match new_genre.insert(&state.db).await {
        Ok(model) => {
            info!("Genre created with ID: {}", model.id);
            let response = ApiResponse {
                data: GenreResponse::from(model),
                message: "Genre created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(db_error) => {
            error!("Failed to create genre '{}': {}", request.name, db_error);

            let error_msg = db_error.to_string().to_lowercase();
            if matches!(db_error, DbErr::Exec(_))
                && (error_msg.contains("unique") || error_msg.contains("constraint"))
            {
                Err((
                    StatusCode::CONFLICT,
                    Json(ErrorResponse {
                        error: format!("Genre '{}' already exists", request.name),
                        code: "GENRE_ALREADY_EXISTS".to_string(),
                        success: false,
                    }),
                ))
            } else {
                Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Internal server error while creating genre".to_string(),
                        code: "DATABASE_ERROR".to_string(),
                        success: false,
                    }),
                ))
            }
        }
    }
}

/// Get all genres
#[utoipa::path(
    get,
    path = "/api/v1/genres",
    tag = "genres",
    responses(
        (status = 200, description = "Genres retrieved successfully", body = ApiResponse<Vec<GenreResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_genres(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<GenreResponse>>>, StatusCode> {
    match genre::Entity::find().all(&state.db).await {
        Ok(genres) => {
            let response = ApiResponse {
                data: genres.into_iter().map(GenreResponse::from).collect(),
                message: "Genres retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to retrieve genres: {}", db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get a specific genre by ID
#[utoipa::path(
    get,
    path = "/api/v1/genres/{genre_id}",
    tag = "genres",
    params(
        ("genre_id" = i32, Path, description = "Genre ID"),
    ),
    responses(
        (status = 200, description = "Genre retrieved successfully", body = ApiResponse<GenreResponse>),
        (status = 404, description = "Genre not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_genre(
    Path(genre_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<GenreResponse>>, StatusCode> {
    match genre::Entity::find_by_id(genre_id).one(&state.db).await {
        Ok(Some(model)) => {
            let response = ApiResponse {
                data: GenreResponse::from(model),
                message: "Genre retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            warn!("Genre with ID {} not found", genre_id);
            Err(StatusCode::NOT_FOUND)
        }
        Err(db_error) => {
            error!("Failed to retrieve genre {}: {}", genre_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Update a genre
#[utoipa::path(
    put,
    path = "/api/v1/genres/{genre_id}",
    tag = "genres",
    params(
        ("genre_id" = i32, Path, description = "Genre ID"),
    ),
    request_body = UpdateGenreRequest,
    responses(
        (status = 200, description = "Genre updated successfully", body = ApiResponse<GenreResponse>),
        (status = 404, description = "Genre not found", body = ErrorResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_genre(
    Path(genre_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateGenreRequest>>,
) -> Result<Json<ApiResponse<GenreResponse>>, StatusCode> {
    let existing = match genre::Entity::find_by_id(genre_id).one(&state.db).await {
        Ok(Some(model)) => model,
        Ok(None) => {
            warn!("Genre with ID {} not found for update", genre_id);
            return Err(StatusCode::NOT_FOUND);
        }
        Err(db_error) => {
            error!("Failed to lookup genre {}: {}", genre_id, db_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let mut active: genre::ActiveModel = existing.into();

    if let Some(name) = request.name {
        active.name = Set(name);
    }
    if let Some(description) = request.description {
        active.description = Set(Some(description));
    }

    match active.update(&state.db).await {
        Ok(updated) => {
            info!("Genre {} updated successfully", genre_id);
            let response = ApiResponse {
                data: GenreResponse::from(updated),
                message: "Genre updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to update genre {}: {}", genre_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Delete a genre
#[utoipa::path(
    delete,
    path = "/api/v1/genres/{genre_id}",
    tag = "genres",
    params(
        ("genre_id" = i32, Path, description = "Genre ID"),
    ),
    responses(
        (status = 200, description = "Genre deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Genre not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_genre(
    Path(genre_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, StatusCode> {
    match genre::Entity::delete_by_id(genre_id).exec(&state.db).await {
        Ok(delete_result) => {
            if delete_result.rows_affected > 0 {
                info!("Genre {} deleted successfully", genre_id);
                let response = ApiResponse {
                    data: format!("Genre {} deleted", genre_id),
                    message: "Genre deleted successfully".to_string(),
                    success: true,
                };
                Ok(Json(response))
            } else {
                warn!("Genre {} not found for deletion", genre_id);
                Err(StatusCode::NOT_FOUND)
            }
        }
        Err(db_error) => {
            error!("Failed to delete genre {}: {}", genre_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
