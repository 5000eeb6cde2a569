use identity::PasswordPolicy;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Password rules applied at registration and password change
    pub password_policy: PasswordPolicy,
}

/// API response wrapper
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::developers::create_developer,
        crate::handlers::developers::get_developers,
        crate::handlers::developers::get_developer,
        crate::handlers::developers::update_developer,
        crate::handlers::developers::delete_developer,
        crate::handlers::publishers::create_publisher,
        crate::handlers::publishers::get_publishers,
        crate::handlers::publishers::get_publisher,
        crate::handlers::publishers::update_publisher,
        crate::handlers::publishers::delete_publisher,
        crate::handlers::genres::create_genre,
        crate::handlers::genres::get_genres,
        crate::handlers::genres::get_genre,
        crate::handlers::genres::update_genre,
        crate::handlers::genres::delete_genre,
        crate::handlers::games::create_game,
        crate::handlers::games::get_games,
        crate::handlers::games::get_game,
        crate::handlers::games::update_game,
        crate::handlers::games::delete_game,
        crate::handlers::users::create_user,
        crate::handlers::users::get_users,
        crate::handlers::users::get_user,
        crate::handlers::users::update_user,
        crate::handlers::users::delete_user,
        crate::handlers::roles::create_role,
        crate::handlers::roles::get_roles,
        crate::handlers::roles::get_role,
        crate::handlers::roles::delete_role,
        crate::handlers::roles::get_user_roles,
        crate::handlers::roles::assign_user_role,
        crate::handlers::roles::remove_user_role,
        crate::handlers::auth::login,
        crate::handlers::purchases::create_purchase,
        crate::handlers::purchases::get_purchases,
        crate::handlers::purchases::get_purchase,
        crate::handlers::purchases::get_user_purchases,
        crate::handlers::purchases::delete_purchase,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            ApiResponse<String>,
            ApiResponse<crate::handlers::developers::DeveloperResponse>,
            ApiResponse<Vec<crate::handlers::developers::DeveloperResponse>>,
            ApiResponse<crate::handlers::publishers::PublisherResponse>,
            ApiResponse<Vec<crate::handlers::publishers::PublisherResponse>>,
            ApiResponse<crate::handlers::genres::GenreResponse>,
            ApiResponse<Vec<crate::handlers::genres::GenreResponse>>,
            ApiResponse<crate::handlers::games::GameResponse>,
            ApiResponse<Vec<crate::handlers::games::GameResponse>>,
            ApiResponse<crate::handlers::users::UserResponse>,
            ApiResponse<Vec<crate::handlers::users::UserResponse>>,
            ApiResponse<crate::handlers::roles::RoleResponse>,
            ApiResponse<Vec<crate::handlers::roles::RoleResponse>>,
            ApiResponse<crate::handlers::auth::LoginResponse>,
            ApiResponse<crate::handlers::purchases::PurchaseResponse>,
            ApiResponse<Vec<crate::handlers::purchases::PurchaseResponse>>,
            crate::handlers::developers::CreateDeveloperRequest,
            crate::handlers::developers::UpdateDeveloperRequest,
            crate::handlers::developers::DeveloperResponse,
            crate::handlers::publishers::CreatePublisherRequest,
            crate::handlers::publishers::UpdatePublisherRequest,
            crate::handlers::publishers::PublisherResponse,
            crate::handlers::genres::CreateGenreRequest,
            crate::handlers::genres::UpdateGenreRequest,
            crate::handlers::genres::GenreResponse,
            crate::handlers::games::CreateGameRequest,
            crate::handlers::games::UpdateGameRequest,
            crate::handlers::games::GameResponse,
            crate::handlers::users::CreateUserRequest,
            crate::handlers::users::UpdateUserRequest,
            crate::handlers::users::UserResponse,
            crate::handlers::roles::CreateRoleRequest,
            crate::handlers::roles::AssignRoleRequest,
            crate::handlers::roles::RoleResponse,
            crate::handlers::auth::LoginRequest,
            crate::handlers::auth::LoginResponse,
            crate::handlers::purchases::CreatePurchaseRequest,
            crate::handlers::purchases::PurchaseResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "developers", description = "Game developer catalog endpoints"),
        (name = "publishers", description = "Game publisher catalog endpoints"),
        (name = "genres", description = "Genre catalog endpoints"),
        (name = "games", description = "Game catalog endpoints"),
        (name = "users", description = "User account endpoints"),
        (name = "roles", description = "Role management endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "purchases", description = "Game purchase endpoints"),
    ),
    info(
        title = "GameShop",
        description = "Video game shop API - browse the catalog and purchase games",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
