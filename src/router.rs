use crate::handlers::{
    auth::login,
    developers::{
        create_developer, delete_developer, get_developer, get_developers, update_developer,
    },
    games::{create_game, delete_game, get_game, get_games, update_game},
    genres::{create_genre, delete_genre, get_genre, get_genres, update_genre},
    health::health_check,
    publishers::{
        create_publisher, delete_publisher, get_publisher, get_publishers, update_publisher,
    },
    purchases::{
        create_purchase, delete_purchase, get_purchase, get_purchases, get_user_purchases,
    },
    roles::{
        assign_user_role, create_role, delete_role, get_role, get_roles, get_user_roles,
        remove_user_role,
    },
    users::{create_user, delete_user, get_user, get_users, update_user},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Developer CRUD routes
        .route("/api/v1/developers", post(create_developer))
        .route("/api/v1/developers", get(get_developers))
        .route("/api/v1/developers/:developer_id", get(get_developer))
        .route("/api/v1/developers/:developer_id", put(update_developer))
        .route("/api/v1/developers/:developer_id", delete(delete_developer))
        // Publisher CRUD routes
        .route("/api/v1/publishers", post(create_publisher))
        .route("/api/v1/publishers", get(get_publishers))
        .route("/api/v1/publishers/:publisher_id", get(get_publisher))
        .route("/api/v1/publishers/:publisher_id", put(update_publisher))
        .route("/api/v1/publishers/:publisher_id", delete(delete_publisher))
        // Genre CRUD routes
        .route("/api/v1/genres", post(create_genre))
        .route("/api/v1/genres", get(get_genres))
        .route("/api/v1/genres/:genre_id", get(get_genre))
        .route("/api/v1/genres/:genre_id", put(update_genre))
        .route("/api/v1/genres/:genre_id", delete(delete_genre))
        // Game CRUD routes
        .route("/api/v1/games", post(create_game))
        .route("/api/v1/games", get(get_games))
        .route("/api/v1/games/:game_id", get(get_game))
        .route("/api/v1/games/:game_id", put(update_game))
        .route("/api/v1/games/:game_id", delete(delete_game))
        // User CRUD routes
        .route("/api/v1/users", post(create_user))
        .route("/api/v1/users", get(get_users))
        .route("/api/v1/users/:user_id", get(get_user))
        .route("/api/v1/users/:user_id", put(update_user))
        .route("/api/v1/users/:user_id", delete(delete_user))
        // Role CRUD and user-role assignment routes
        .route("/api/v1/roles", post(create_role))
        .route("/api/v1/roles", get(get_roles))
        .route("/api/v1/roles/:role_id", get(get_role))
        .route("/api/v1/roles/:role_id", delete(delete_role))
        .route("/api/v1/users/:user_id/roles", get(get_user_roles))
        .route("/api/v1/users/:user_id/roles", post(assign_user_role))
        .route(
            "/api/v1/users/:user_id/roles/:role_id",
            delete(remove_user_role),
        )
        // Authentication
        .route("/api/v1/auth/login", post(login))
        // Purchase ledger routes
        .route("/api/v1/purchases", post(create_purchase))
        .route("/api/v1/purchases", get(get_purchases))
        .route("/api/v1/purchases/:purchase_id", get(get_purchase))
        .route("/api/v1/purchases/:purchase_id", delete(delete_purchase))
        .route("/api/v1/users/:user_id/purchases", get(get_user_purchases))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
