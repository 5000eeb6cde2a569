use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::NaiveDate;
use model::entities::{developer, game, game_genre, genre, publisher};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Request body for creating a new game
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateGameRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    /// List price (non-negative)
    #[schema(value_type = String)]
    pub price: Decimal,
    pub release_date: Option<NaiveDate>,
    pub developer_id: i32,
    pub publisher_id: i32,
    /// Genres the game belongs to
    #[serde(default)]
    pub genre_ids: Vec<i32>,
}

/// Request body for updating a game
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateGameRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    pub release_date: Option<NaiveDate>,
    pub developer_id: Option<i32>,
    pub publisher_id: Option<i32>,
    /// When present, replaces the full genre set of the game
    pub genre_ids: Option<Vec<i32>>,
}

/// Query parameters for filtering the game catalog
#[derive(Debug, Deserialize, IntoParams)]
pub struct GamesQuery {
    /// Only games by this developer
    pub developer_id: Option<i32>,
    /// Only games by this publisher
    pub publisher_id: Option<i32>,
    /// Only games in this genre
    pub genre_id: Option<i32>,
}

/// Game response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GameResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = String)]
    pub price: Decimal,
    pub release_date: Option<NaiveDate>,
    pub developer_id: i32,
    pub publisher_id: i32,
    pub genre_ids: Vec<i32>,
}

impl GameResponse {
    fn new(model: game::Model, genre_ids: Vec<i32>) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            release_date: model.release_date,
            developer_id: model.developer_id,
            publisher_id: model.publisher_id,
            genre_ids,
        }
    }
}

/// Load genre ids for a set of games in one query.
async fn genre_ids_by_game(
    db: &sea_orm::DatabaseConnection,
    game_ids: &[i32],
) -> Result<HashMap<i32, Vec<i32>>, DbErr> {
    let mut map: HashMap<i32, Vec<i32>> = HashMap::new();
    if game_ids.is_empty() {
        return Ok(map);
    }
    let links = game_genre::Entity::find()
        .filter(game_genre::Column::GameId.is_in(game_ids.to_vec()))
        .all(db)
        .await?;
    for link in links {
        map.entry(link.game_id).or_default().push(link.genre_id);
    }
    Ok(map)
}

/// Check that every referenced genre exists.
async fn all_genres_exist(
    db: &sea_orm::DatabaseConnection,
    genre_ids: &[i32],
) -> Result<bool, DbErr> {
    if genre_ids.is_empty() {
        return Ok(true);
    }
    let found = genre::Entity::find()
        .filter(genre::Column::Id.is_in(genre_ids.to_vec()))
        .all(db)
        .await?;
    Ok(found.len() == genre_ids.len())
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

fn internal_error(what: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: format!("Internal server error while {what}"),
            code: "DATABASE_ERROR".to_string(),
            success: false,
        }),
    )
}

/// Create a new game
#[utoipa::path(
    post,
    path = "/api/v1/games",
    tag = "games",
    request_body = CreateGameRequest,
    responses(
        (status = 201, description = "Game created successfully", body = ApiResponse<GameResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_game(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateGameRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<GameResponse>>), (StatusCode, Json<ErrorResponse>)> {
    debug!("Creating game '{}'", request.name);

    if request.price.is_sign_negative() {
        return Err(bad_request(
            "Game price must not be negative".to_string(),
            "NEGATIVE_PRICE",
        ));
    }

    // The developer and publisher must exist before a game can reference them
    match developer::Entity::find_by_id(request.developer_id).one(&state.db).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Err(bad_request(
                format!("Developer {} does not exist", request.developer_id),
                "UNKNOWN_DEVELOPER",
            ));
        }
        Err(db_error) => {
            error!("Failed to validate developer: {}", db_error);
            return Err(internal_error("creating game"));
        }
    }
    match publisher::Entity::find_by_id(request.publisher_id).one(&state.db).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Err(bad_request(
                format!("Publisher {} does not exist", request.publisher_id),
                "UNKNOWN_PUBLISHER",
            ));
        }
        Err(db_error) => {
            error!("Failed to validate publisher: {}", db_error);
            return Err(internal_error("creating game"));
        }
    }
    match all_genres_exist(&state.db, &request.genre_ids).await {
        Ok(true) => {}
        Ok(false) => {
            return Err(bad_request(
                "One or more referenced genres do not exist".to_string(),
                "UNKNOWN_GENRE",
            ));
        }
        Err(db_error) => {
            error!("Failed to validate genres: {}", db_error);
            return Err(internal_error("creating game"));
        }
    }

    let new_game = game::ActiveModel {
        name: Set(request.name.clone()),
        description: Set(request.description.clone()),
        price: Set(request.price),
        release_date: Set(request.release_date),
        developer_id: Set(request.developer_id),
        publisher_id: Set(request.publisher_id),
        ..Default::default()
    };

    // The game row and its genre links land together or not at all
    let txn = match state.db.begin().await {
        Ok(txn) => txn,
        Err(db_error) => {
            error!("Failed to open transaction: {}", db_error);
            return Err(internal_error("creating game"));
        }
    };

    let game_model = match new_game.insert(&txn).await {
        Ok(model) => model,
        Err(db_error) => {
            error!("Failed to create game '{}': {}", request.name, db_error);
            return Err(internal_error("creating game"));
        }
    };

    if !request.genre_ids.is_empty() {
        let links = request.genre_ids.iter().map(|genre_id| game_genre::ActiveModel {
            game_id: Set(game_model.id),
            genre_id: Set(*genre_id),
        });
        if let Err(db_error) = game_genre::Entity::insert_many(links).exec(&txn).await {
            error!("Failed to link genres for game {}: {}", game_model.id, db_error);
            return Err(internal_error("creating game"));
        }
    }

    if let Err(db_error) = txn.commit().await {
        error!("Failed to commit game creation: {}", db_error);
        return Err(internal_error("creating game"));
    }

    info!("Game created with ID: {}", game_model.id);
    let response = ApiResponse {
        data: GameResponse::new(game_model, request.genre_ids),
        message: "Game created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Get all games, optionally filtered by developer, publisher or genre
#[utoipa::path(
    get,
    path = "/api/v1/games",
    tag = "games",
    params(GamesQuery),
    responses(
        (status = 200, description = "Games retrieved successfully", body = ApiResponse<Vec<GameResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_games(
    Query(query): Query<GamesQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<GameResponse>>>, StatusCode> {
    let mut find = game::Entity::find();

    if let Some(developer_id) = query.developer_id {
        find = find.filter(game::Column::DeveloperId.eq(developer_id));
    }
    if let Some(publisher_id) = query.publisher_id {
        find = find.filter(game::Column::PublisherId.eq(publisher_id));
    }
    if let Some(genre_id) = query.genre_id {
        // Restrict to games linked to the requested genre
        let linked = match game_genre::Entity::find()
            .filter(game_genre::Column::GenreId.eq(genre_id))
            .all(&state.db)
            .await
        {
            Ok(links) => links.into_iter().map(|l| l.game_id).collect::<Vec<_>>(),
            Err(db_error) => {
                error!("Failed to resolve genre filter: {}", db_error);
                return Err(StatusCode::INTERNAL_SERVER_ERROR);
            }
        };
        find = find.filter(game::Column::Id.is_in(linked));
    }

    let games = match find.all(&state.db).await {
        Ok(games) => games,
        Err(db_error) => {
            error!("Failed to retrieve games: {}", db_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let game_ids: Vec<i32> = games.iter().map(|g| g.id).collect();
    let mut genre_map = match genre_ids_by_game(&state.db, &game_ids).await {
        Ok(map) => map,
        Err(db_error) => {
            error!("Failed to load game genres: {}", db_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    debug!("Retrieved {} games", games.len());
    let data = games
        .into_iter()
        .map(|g| {
            let genre_ids = genre_map.remove(&g.id).unwrap_or_default();
            GameResponse::new(g, genre_ids)
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        message: "Games retrieved successfully".to_string(),
        success: true,
    }))
}

/// Get a specific game by ID
#[utoipa::path(
    get,
    path = "/api/v1/games/{game_id}",
    tag = "games",
    params(
        ("game_id" = i32, Path, description = "Game ID"),
    ),
    responses(
        (status = 200, description = "Game retrieved successfully", body = ApiResponse<GameResponse>),
        (status = 404, description = "Game not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_game(
    Path(game_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<GameResponse>>, StatusCode> {
    let game_model = match game::Entity::find_by_id(game_id).one(&state.db).await {
        Ok(Some(model)) => model,
        Ok(None) => {
            warn!("Game with ID {} not found", game_id);
            return Err(StatusCode::NOT_FOUND);
        }
        Err(db_error) => {
            error!("Failed to retrieve game {}: {}", game_id, db_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let mut genre_map = match genre_ids_by_game(&state.db, &[game_id]).await {
        Ok(map) => map,
        Err(db_error) => {
            error!("Failed to load genres for game {}: {}", game_id, db_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };
    let genre_ids = genre_map.remove(&game_id).unwrap_or_default();

    Ok(Json(ApiResponse {
        data: GameResponse::new(game_model, genre_ids),
        message: "Game retrieved successfully".to_string(),
        success: true,
    }))
}

/// Update a game
#[utoipa::path(
    put,
    path = "/api/v1/games/{game_id}",
    tag = "games",
    params(
        ("game_id" = i32, Path, description = "Game ID"),
    ),
    request_body = UpdateGameRequest,
    responses(
        (status = 200, description = "Game updated successfully", body = ApiResponse<GameResponse>),
        (status = 404, description = "Game not found", body = ErrorResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_game(
    Path(game_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateGameRequest>>,
) -> Result<Json<ApiResponse<GameResponse>>, (StatusCode, Json<ErrorResponse>)> {
    let existing = match game::Entity::find_by_id(game_id).one(&state.db).await {
        Ok(Some(model)) => model,
        Ok(None) => {
            warn!("Game with ID {} not found for update", game_id);
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Game {} not found", game_id),
                    code: "GAME_NOT_FOUND".to_string(),
                    success: false,
                }),
            ));
        }
        Err(db_error) => {
            error!("Failed to lookup game {}: {}", game_id, db_error);
            return Err(internal_error("updating game"));
        }
    };

    if let Some(price) = request.price {
        if price.is_sign_negative() {
            return Err(bad_request(
                "Game price must not be negative".to_string(),
                "NEGATIVE_PRICE",
            ));
        }
    }
    if let Some(developer_id) = request.developer_id {
        match developer::Entity::find_by_id(developer_id).one(&state.db).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Err(bad_request(
                    format!("Developer {} does not exist", developer_id),
                    "UNKNOWN_DEVELOPER",
                ));
            }
            Err(db_error) => {
                error!("Failed to validate developer: {}", db_error);
                return Err(internal_error("updating game"));
            }
        }
    }
    if let Some(publisher_id) = request.publisher_id {
        match publisher::Entity::find_by_id(publisher_id).one(&state.db).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Err(bad_request(
                    format!("Publisher {} does not exist", publisher_id),
                    "UNKNOWN_PUBLISHER",
                ));
            }
            Err(db_error) => {
                error!("Failed to validate publisher: {}", db_error);
                return Err(internal_error("updating game"));
            }
        }
    }
    if let Some(ref genre_ids) = request.genre_ids {
        match all_genres_exist(&state.db, genre_ids).await {
            Ok(true) => {}
            Ok(false) => {
                return Err(bad_request(
                    "One or more referenced genres do not exist".to_string(),
                    "UNKNOWN_GENRE",
                ));
            }
            Err(db_error) => {
                error!("Failed to validate genres: {}", db_error);
                return Err(internal_error("updating game"));
            }
        }
    }

    let mut active: game::ActiveModel = existing.into();
    if let Some(name) = request.name {
        active.name = Set(name);
    }
    if let Some(description) = request.description {
        active.description = Set(Some(description));
    }
    if let Some(price) = request.price {
        active.price = Set(price);
    }
    if let Some(release_date) = request.release_date {
        active.release_date = Set(Some(release_date));
    }
    if let Some(developer_id) = request.developer_id {
        active.developer_id = Set(developer_id);
    }
    if let Some(publisher_id) = request.publisher_id {
        active.publisher_id = Set(publisher_id);
    }

    // Field updates and genre replacement commit together or roll back
    let txn = match state.db.begin().await {
        Ok(txn) => txn,
        Err(db_error) => {
            error!("Failed to open transaction: {}", db_error);
            return Err(internal_error("updating game"));
        }
    };

    let updated = match active.update(&txn).await {
        Ok(model) => model,
        Err(db_error) => {
            error!("Failed to update game {}: {}", game_id, db_error);
            return Err(internal_error("updating game"));
        }
    };

    // Replace the genre set when the request carries one
    if let Some(genre_ids) = &request.genre_ids {
        let wipe = game_genre::Entity::delete_many()
            .filter(game_genre::Column::GameId.eq(game_id))
            .exec(&txn)
            .await;
        if let Err(db_error) = wipe {
            error!("Failed to clear genres for game {}: {}", game_id, db_error);
            return Err(internal_error("updating game"));
        }
        if !genre_ids.is_empty() {
            let links = genre_ids.iter().map(|genre_id| game_genre::ActiveModel {
                game_id: Set(game_id),
                genre_id: Set(*genre_id),
            });
            if let Err(db_error) = game_genre::Entity::insert_many(links).exec(&txn).await {
                error!("Failed to relink genres for game {}: {}", game_id, db_error);
                return Err(internal_error("updating game"));
            }
        }
    }

    if let Err(db_error) = txn.commit().await {
        error!("Failed to commit game update: {}", db_error);
        return Err(internal_error("updating game"));
    }

    let mut genre_map = match genre_ids_by_game(&state.db, &[game_id]).await {
        Ok(map) => map,
        Err(db_error) => {
            error!("Failed to load genres for game {}: {}", game_id, db_error);
            return Err(internal_error("updating game"));
        }
    };
    let genre_ids = genre_map.remove(&game_id).unwrap_or_default();

    info!("Game {} updated successfully", game_id);
    Ok(Json(ApiResponse {
        data: GameResponse::new(updated, genre_ids),
        message: "Game updated successfully".to_string(),
        success: true,
    }))
}

/// Delete a game
#[utoipa::path(
    delete,
    path = "/api/v1/games/{game_id}",
    tag = "games",
    params(
        ("game_id" = i32, Path, description = "Game ID"),
    ),
    responses(
        (status = 200, description = "Game deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Game not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_game(
    Path(game_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, StatusCode> {
    match game::Entity::delete_by_id(game_id).exec(&state.db).await {
        Ok(delete_result) => {
            if delete_result.rows_affected > 0 {
                info!("Game {} deleted successfully", game_id);
                Ok(Json(ApiResponse {
                    data: format!("Game {} deleted", game_id),
                    message: "Game deleted successfully".to_string(),
                    success: true,
                }))
            } else {
                warn!("Game {} not found for deletion", game_id);
                Err(StatusCode::NOT_FOUND)
            }
        }
        Err(db_error) => {
            error!("Failed to delete game {}: {}", game_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
