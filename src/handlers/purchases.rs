use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::{NaiveDate, Utc};
use model::entities::{game, user, user_bought};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};
use utoipa::ToSchema;

use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Request body for recording a purchase
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreatePurchaseRequest {
    pub user_id: i32,
    pub game_id: i32,
    /// Price actually paid. Defaults to the game's current list price.
    #[schema(value_type = Option<String>)]
    pub price_paid: Option<Decimal>,
}

/// Purchase response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PurchaseResponse {
    pub id: i32,
    pub user_id: i32,
    pub game_id: i32,
    #[schema(value_type = String)]
    pub price_paid: Decimal,
    pub bought_at: NaiveDate,
}

impl From<user_bought::Model> for PurchaseResponse {
    fn from(model: user_bought::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            game_id: model.game_id,
            price_paid: model.price_paid,
            bought_at: model.bought_at,
        }
    }
}

fn bad_request(error: String, code: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error,
            code: code.to_string(),
            success: false,
        }),
    )
}

fn internal_error(code: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "Internal server error while processing purchase".to_string(),
            code: code.to_string(),
            success: false,
        }),
    )
}

/// Record a purchase
///
/// A user can own each game at most once. The paid price is frozen into
/// the ledger row so later list price changes do not rewrite history.
#[utoipa::path(
    post,
    path = "/api/v1/purchases",
    tag = "purchases",
    request_body = CreatePurchaseRequest,
    responses(
        (status = 201, description = "Purchase recorded successfully", body = ApiResponse<PurchaseResponse>),
        (status = 400, description = "Unknown user or game", body = ErrorResponse),
        (status = 409, description = "User already owns this game", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_purchase(
    State(state): State<AppState>,
    Json(request): Json<CreatePurchaseRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PurchaseResponse>>), (StatusCode, Json<ErrorResponse>)> {
    debug!(
        "Recording purchase of game {} by user {}",
        request.game_id, request.user_id
    );

    if let Some(price_paid) = request.price_paid {
        if price_paid.is_sign_negative() {
            return Err(bad_request(
                "Paid price must not be negative".to_string(),
                "NEGATIVE_PRICE",
            ));
        }
    }

    match user::Entity::find_by_id(request.user_id).one(&state.db).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            warn!("Purchase references unknown user {}", request.user_id);
            return Err(bad_request(
                format!("User {} does not exist", request.user_id),
                "UNKNOWN_USER",
            ));
        }
        Err(db_error) => {
            error!("Failed to lookup user {}: {}", request.user_id, db_error);
            return Err(internal_error("DATABASE_ERROR"));
        }
    }

    let game_model = match game::Entity::find_by_id(request.game_id).one(&state.db).await {
        Ok(Some(model)) => model,
        Ok(None) => {
            warn!("Purchase references unknown game {}", request.game_id);
            return Err(bad_request(
                format!("Game {} does not exist", request.game_id),
                "UNKNOWN_GAME",
            ));
        }
        Err(db_error) => {
            error!("Failed to lookup game {}: {}", request.game_id, db_error);
            return Err(internal_error("DATABASE_ERROR"));
        }
    };

    let price_paid = request.price_paid.unwrap_or(game_model.price);

    let new_purchase = user_bought::ActiveModel {
        user_id: Set(request.user_id),
        game_id: Set(request.game_id),
        price_paid: Set(price_paid),
        bought_at: Set(Utc::now().date_naive()),
        ..Default::default()
    };

    match new_purchase.insert(&state.db).await {
        Ok(model) => {
            info!(
                "Purchase recorded with ID: {} (user {}, game {})",
                model.id, model.user_id, model.game_id
            );
            let response = ApiResponse {
                data: PurchaseResponse::from(model),
                message: "Purchase recorded successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(db_error) => {
            error!(
                "Failed to record purchase of game {} by user {}: {}",
                request.game_id, request.user_id, db_error
            );

            let error_msg = db_error.to_string().to_lowercase();
            if matches!(db_error, DbErr::Exec(_))
                && (error_msg.contains("unique") || error_msg.contains("constraint"))
            {
                Err((
                    StatusCode::CONFLICT,
                    Json(ErrorResponse {
                        error: format!(
                            "User {} already owns game {}",
                            request.user_id, request.game_id
                        ),
                        code: "ALREADY_OWNED".to_string(),
                        success: false,
                    }),
                ))
            } else {
                Err(internal_error("DATABASE_ERROR"))
            }
        }
    }
}

/// Get all purchases
#[utoipa::path(
    get,
    path = "/api/v1/purchases",
    tag = "purchases",
    responses(
        (status = 200, description = "Purchases retrieved successfully", body = ApiResponse<Vec<PurchaseResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_purchases(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<PurchaseResponse>>>, StatusCode> {
    match user_bought::Entity::find().all(&state.db).await {
        Ok(purchases) => {
            debug!("Retrieved {} purchases", purchases.len());
            let response = ApiResponse {
                data: purchases.into_iter().map(PurchaseResponse::from).collect(),
                message: "Purchases retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to retrieve purchases: {}", db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get a specific purchase by ID
#[utoipa::path(
    get,
    path = "/api/v1/purchases/{purchase_id}",
    tag = "purchases",
    params(
        ("purchase_id" = i32, Path, description = "Purchase ID"),
    ),
    responses(
        (status = 200, description = "Purchase retrieved successfully", body = ApiResponse<PurchaseResponse>),
        (status = 404, description = "Purchase not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_purchase(
    Path(purchase_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<PurchaseResponse>>, StatusCode> {
    match user_bought::Entity::find_by_id(purchase_id).one(&state.db).await {
        Ok(Some(model)) => {
            let response = ApiResponse {
                data: PurchaseResponse::from(model),
                message: "Purchase retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            warn!("Purchase with ID {} not found", purchase_id);
            Err(StatusCode::NOT_FOUND)
        }
        Err(db_error) => {
            error!("Failed to retrieve purchase {}: {}", purchase_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get a user's purchase history
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/purchases",
    tag = "purchases",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User purchases retrieved successfully", body = ApiResponse<Vec<PurchaseResponse>>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_user_purchases(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<PurchaseResponse>>>, StatusCode> {
    match user::Entity::find_by_id(user_id).one(&state.db).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            warn!("User with ID {} not found", user_id);
            return Err(StatusCode::NOT_FOUND);
        }
        Err(db_error) => {
            error!("Failed to lookup user {}: {}", user_id, db_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    match user_bought::Entity::find()
        .filter(user_bought::Column::UserId.eq(user_id))
        .all(&state.db)
        .await
    {
        Ok(purchases) => {
            debug!("User {} owns {} games", user_id, purchases.len());
            let response = ApiResponse {
                data: purchases.into_iter().map(PurchaseResponse::from).collect(),
                message: "User purchases retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to retrieve purchases for user {}: {}", user_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Delete a purchase record
#[utoipa::path(
    delete,
    path = "/api/v1/purchases/{purchase_id}",
    tag = "purchases",
    params(
        ("purchase_id" = i32, Path, description = "Purchase ID"),
    ),
    responses(
        (status = 200, description = "Purchase deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Purchase not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_purchase(
    Path(purchase_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, StatusCode> {
    match user_bought::Entity::delete_by_id(purchase_id).exec(&state.db).await {
        Ok(delete_result) => {
            if delete_result.rows_affected > 0 {
                info!("Purchase {} deleted successfully", purchase_id);
                let response = ApiResponse {
                    data: format!("Purchase {} deleted", purchase_id),
                    message: "Purchase deleted successfully".to_string(),
                    success: true,
                };
                Ok(Json(response))
            } else {
                warn!("Purchase {} not found for deletion", purchase_id);
                Err(StatusCode::NOT_FOUND)
            }
        }
        Err(db_error) => {
            error!("Failed to delete purchase {}: {}", purchase_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
