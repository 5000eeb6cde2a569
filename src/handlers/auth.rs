use axum::{extract::State, http::StatusCode, response::Json};
use identity::IdentityError;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;

use crate::handlers::users::UserResponse;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Request body for logging in
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login response: the authenticated user and the roles they hold
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub user: UserResponse,
    pub roles: Vec<String>,
}

/// Verify a username/password pair
///
/// Unknown usernames and wrong passwords produce the same 401 so the
/// endpoint does not leak which usernames exist.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials verified", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid username or password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, (StatusCode, Json<ErrorResponse>)> {
    let user_model =
        match identity::accounts::verify_credentials(&state.db, &request.username, &request.password)
            .await
        {
            Ok(model) => model,
            Err(IdentityError::InvalidCredentials) => {
                warn!("Failed login attempt for '{}'", request.username);
                return Err((
                    StatusCode::UNAUTHORIZED,
                    Json(ErrorResponse {
                        error: "Invalid username or password".to_string(),
                        code: "INVALID_CREDENTIALS".to_string(),
                        success: false,
                    }),
                ));
            }
            Err(other) => {
                error!("Login failed for '{}': {}", request.username, other);
                return Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Internal server error during login".to_string(),
                        code: "IDENTITY_ERROR".to_string(),
                        success: false,
                    }),
                ));
            }
        };

    let roles = match identity::roles::roles_for_user(&state.db, user_model.id).await {
        Ok(roles) => roles.into_iter().map(|role| role.name).collect(),
        Err(identity_error) => {
            error!(
                "Failed to load roles for user {}: {}",
                user_model.id, identity_error
            );
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error during login".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ));
        }
    };

    info!("User '{}' logged in", user_model.username);
    let response = ApiResponse {
        data: LoginResponse {
            user: UserResponse::from(user_model),
            roles,
        },
        message: "Login successful".to_string(),
        success: true,
    };
    Ok(Json(response))
}
