#[cfg(test)]
mod integration_tests {
    use crate::handlers::auth::LoginRequest;
    use crate::handlers::developers::{CreateDeveloperRequest, UpdateDeveloperRequest};
    use crate::handlers::games::{CreateGameRequest, UpdateGameRequest};
    use crate::handlers::genres::CreateGenreRequest;
    use crate::handlers::publishers::CreatePublisherRequest;
    use crate::handlers::purchases::CreatePurchaseRequest;
    use crate::handlers::roles::AssignRoleRequest;
    use crate::handlers::users::{CreateUserRequest, UpdateUserRequest};
    use crate::schemas::ApiResponse;
    use crate::test_utils::test_utils::setup_test_app;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rust_decimal::Decimal;

    async fn create_developer(server: &TestServer, name: &str) -> i64 {
        let response = server
            .post("/api/v1/developers")
            .json(&CreateDeveloperRequest {
                name: name.to_string(),
                country: Some("Poland".to_string()),
            })
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        body.data["id"].as_i64().unwrap()
    }

    async fn create_publisher(server: &TestServer, name: &str) -> i64 {
        let response = server
            .post("/api/v1/publishers")
            .json(&CreatePublisherRequest {
                name: name.to_string(),
                country: None,
            })
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        body.data["id"].as_i64().unwrap()
    }

    async fn create_genre(server: &TestServer, name: &str) -> i64 {
        let response = server
            .post("/api/v1/genres")
            .json(&CreateGenreRequest {
                name: name.to_string(),
                description: None,
            })
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        body.data["id"].as_i64().unwrap()
    }

    async fn create_game(server: &TestServer, name: &str, genre_ids: Vec<i32>) -> i64 {
        let developer_id = create_developer(server, &format!("{} Studio", name)).await;
        let publisher_id = create_publisher(server, &format!("{} Publishing", name)).await;

        let response = server
            .post("/api/v1/games")
            .json(&CreateGameRequest {
                name: name.to_string(),
                description: None,
                price: Decimal::new(5999, 2),
                release_date: None,
                developer_id: developer_id as i32,
                publisher_id: publisher_id as i32,
                genre_ids,
            })
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        body.data["id"].as_i64().unwrap()
    }

    async fn create_user(server: &TestServer, username: &str) -> i64 {
        let response = server
            .post("/api/v1/users")
            .json(&CreateUserRequest {
                username: username.to_string(),
                email: format!("{}@example.com", username),
                password: "pass123".to_string(),
            })
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        body.data["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_app_state_from_database_url() {
        let state = crate::config::initialize_app_state_with_url("sqlite::memory:")
            .await
            .expect("Failed to build application state");

        assert!(state.db.ping().await.is_ok());
        assert_eq!(state.password_policy.required_length, 5);
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/health").await;

        response.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_developer() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/v1/developers")
            .json(&CreateDeveloperRequest {
                name: "CD Projekt Red".to_string(),
                country: Some("Poland".to_string()),
            })
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert!(body.success);
        assert_eq!(body.message, "Developer created successfully");
        assert_eq!(body.data["name"], "CD Projekt Red");
        assert_eq!(body.data["country"], "Poland");
        assert!(body.data["id"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_create_developer_duplicate_name() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        create_developer(&server, "Remedy").await;

        let response = server
            .post("/api/v1/developers")
            .json(&CreateDeveloperRequest {
                name: "Remedy".to_string(),
                country: None,
            })
            .await;

        response.assert_status(StatusCode::CONFLICT);
        let body: serde_json::Value = response.json();
        assert_eq!(body["code"], "DEVELOPER_ALREADY_EXISTS");
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_get_developers() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        create_developer(&server, "Valve").await;
        create_developer(&server, "id Software").await;

        let response = server.get("/api/v1/developers").await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<serde_json::Value>> = response.json();
        assert!(body.success);
        assert_eq!(body.data.len(), 2);
    }

    #[tokio::test]
    async fn test_get_developer_not_found() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/v1/developers/99999").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_developer() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let developer_id = create_developer(&server, "Mojang").await;

        let response = server
            .put(&format!("/api/v1/developers/{}", developer_id))
            .json(&UpdateDeveloperRequest {
                name: Some("Mojang Studios".to_string()),
                country: None,
            })
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["name"], "Mojang Studios");
        // Untouched fields keep their values
        assert_eq!(body.data["country"], "Poland");
    }

    #[tokio::test]
    async fn test_delete_developer() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let developer_id = create_developer(&server, "Ensemble").await;

        let response = server
            .delete(&format!("/api/v1/developers/{}", developer_id))
            .await;

        response.assert_status(StatusCode::OK);

        let get_response = server
            .get(&format!("/api/v1/developers/{}", developer_id))
            .await;
        get_response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_publisher_and_genre() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let publisher_id = create_publisher(&server, "Devolver Digital").await;
        assert!(publisher_id > 0);

        let genre_id = create_genre(&server, "Roguelike").await;
        assert!(genre_id > 0);

        let genres_response = server.get("/api/v1/genres").await;
        genres_response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<serde_json::Value>> = genres_response.json();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0]["name"], "Roguelike");
    }

    #[tokio::test]
    async fn test_create_game_with_genres() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let developer_id = create_developer(&server, "FromSoftware").await;
        let publisher_id = create_publisher(&server, "Bandai Namco").await;
        let rpg_id = create_genre(&server, "RPG").await;
        let action_id = create_genre(&server, "Action").await;

        let response = server
            .post("/api/v1/games")
            .json(&CreateGameRequest {
                name: "Elden Ring".to_string(),
                description: Some("Open-world action RPG".to_string()),
                price: Decimal::new(6999, 2),
                release_date: Some("2022-02-25".parse().unwrap()),
                developer_id: developer_id as i32,
                publisher_id: publisher_id as i32,
                genre_ids: vec![rpg_id as i32, action_id as i32],
            })
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert!(body.success);
        assert_eq!(body.data["name"], "Elden Ring");
        // Decimals travel as strings
        assert_eq!(body.data["price"], "69.99");
        let genre_ids = body.data["genre_ids"].as_array().unwrap();
        assert_eq!(genre_ids.len(), 2);
    }

    #[tokio::test]
    async fn test_create_game_unknown_developer() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let publisher_id = create_publisher(&server, "Annapurna").await;

        let response = server
            .post("/api/v1/games")
            .json(&CreateGameRequest {
                name: "Orphan Game".to_string(),
                description: None,
                price: Decimal::new(1999, 2),
                release_date: None,
                developer_id: 99999,
                publisher_id: publisher_id as i32,
                genre_ids: vec![],
            })
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["code"], "UNKNOWN_DEVELOPER");
    }

    #[tokio::test]
    async fn test_create_game_negative_price() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let developer_id = create_developer(&server, "Nightdive").await;
        let publisher_id = create_publisher(&server, "Nightdive Publishing").await;

        let response = server
            .post("/api/v1/games")
            .json(&CreateGameRequest {
                name: "Refund Simulator".to_string(),
                description: None,
                price: Decimal::new(-100, 2),
                release_date: None,
                developer_id: developer_id as i32,
                publisher_id: publisher_id as i32,
                genre_ids: vec![],
            })
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["code"], "NEGATIVE_PRICE");
    }

    #[tokio::test]
    async fn test_get_games_filtered_by_genre() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let strategy_id = create_genre(&server, "Strategy").await;
        create_game(&server, "Into the Breach", vec![strategy_id as i32]).await;
        create_game(&server, "Stardew Valley", vec![]).await;

        let response = server
            .get(&format!("/api/v1/games?genre_id={}", strategy_id))
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<serde_json::Value>> = response.json();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0]["name"], "Into the Breach");

        // Unfiltered listing returns both
        let all_response = server.get("/api/v1/games").await;
        let all_body: ApiResponse<Vec<serde_json::Value>> = all_response.json();
        assert_eq!(all_body.data.len(), 2);
    }

    #[tokio::test]
    async fn test_get_games_filtered_by_developer() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let developer_id = create_developer(&server, "Supergiant").await;
        let publisher_id = create_publisher(&server, "Private Division").await;

        let response = server
            .post("/api/v1/games")
            .json(&CreateGameRequest {
                name: "Pyre".to_string(),
                description: None,
                price: Decimal::new(1999, 2),
                release_date: None,
                developer_id: developer_id as i32,
                publisher_id: publisher_id as i32,
                genre_ids: vec![],
            })
            .await;
        response.assert_status(StatusCode::CREATED);

        // A second game from an unrelated studio
        create_game(&server, "Dredge", vec![]).await;

        let filtered = server
            .get(&format!("/api/v1/games?developer_id={}", developer_id))
            .await;
        filtered.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<serde_json::Value>> = filtered.json();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0]["name"], "Pyre");
    }

    #[tokio::test]
    async fn test_get_games_filtered_by_publisher() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let developer_id = create_developer(&server, "Obsidian").await;
        let publisher_id = create_publisher(&server, "Xbox Game Studios").await;

        let response = server
            .post("/api/v1/games")
            .json(&CreateGameRequest {
                name: "Pentiment".to_string(),
                description: None,
                price: Decimal::new(1999, 2),
                release_date: None,
                developer_id: developer_id as i32,
                publisher_id: publisher_id as i32,
                genre_ids: vec![],
            })
            .await;
        response.assert_status(StatusCode::CREATED);

        create_game(&server, "Tunic", vec![]).await;

        let filtered = server
            .get(&format!("/api/v1/games?publisher_id={}", publisher_id))
            .await;
        filtered.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<serde_json::Value>> = filtered.json();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0]["name"], "Pentiment");
    }

    #[tokio::test]
    async fn test_update_game_replaces_genres() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let horror_id = create_genre(&server, "Horror").await;
        let puzzle_id = create_genre(&server, "Puzzle").await;
        let game_id = create_game(&server, "Portal", vec![horror_id as i32]).await;

        let response = server
            .put(&format!("/api/v1/games/{}", game_id))
            .json(&UpdateGameRequest {
                name: None,
                description: None,
                price: Some(Decimal::new(999, 2)),
                release_date: None,
                developer_id: None,
                publisher_id: None,
                genre_ids: Some(vec![puzzle_id as i32]),
            })
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["price"], "9.99");
        let genre_ids = body.data["genre_ids"].as_array().unwrap();
        assert_eq!(genre_ids.len(), 1);
        assert_eq!(genre_ids[0].as_i64().unwrap(), puzzle_id);
    }

    #[tokio::test]
    async fn test_register_user() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/v1/users")
            .json(&CreateUserRequest {
                username: "gamer01".to_string(),
                email: "gamer01@example.com".to_string(),
                password: "pass123".to_string(),
            })
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert!(body.success);
        assert_eq!(body.data["username"], "gamer01");
        assert_eq!(body.data["email"], "gamer01@example.com");
        // The response never exposes password material
        assert!(body.data.get("password").is_none());
        assert!(body.data.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_register_user_weak_password() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        // Too short and no digit
        let response = server
            .post("/api/v1/users")
            .json(&CreateUserRequest {
                username: "gamer02".to_string(),
                email: "gamer02@example.com".to_string(),
                password: "abc".to_string(),
            })
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["code"], "PASSWORD_POLICY");
    }

    #[tokio::test]
    async fn test_register_user_duplicate_username() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        create_user(&server, "gamer03").await;

        let response = server
            .post("/api/v1/users")
            .json(&CreateUserRequest {
                username: "gamer03".to_string(),
                email: "other@example.com".to_string(),
                password: "pass123".to_string(),
            })
            .await;

        response.assert_status(StatusCode::CONFLICT);
        let body: serde_json::Value = response.json();
        assert_eq!(body["code"], "USER_ALREADY_EXISTS");
    }

    #[tokio::test]
    async fn test_update_user() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let user_id = create_user(&server, "renameme").await;

        let response = server
            .put(&format!("/api/v1/users/{}", user_id))
            .json(&UpdateUserRequest {
                username: Some("renamed".to_string()),
                email: Some("renamed@example.com".to_string()),
                password: None,
            })
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["username"], "renamed");
        assert_eq!(body.data["email"], "renamed@example.com");

        // The untouched password still works
        let login = server
            .post("/api/v1/auth/login")
            .json(&LoginRequest {
                username: "renamed".to_string(),
                password: "pass123".to_string(),
            })
            .await;
        login.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_update_user_password_policy() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let user_id = create_user(&server, "rotator").await;

        // A change to a weak password is rejected by the same policy as registration
        let weak = server
            .put(&format!("/api/v1/users/{}", user_id))
            .json(&UpdateUserRequest {
                username: None,
                email: None,
                password: Some("x".to_string()),
            })
            .await;
        weak.assert_status(StatusCode::BAD_REQUEST);
        let weak_body: serde_json::Value = weak.json();
        assert_eq!(weak_body["code"], "PASSWORD_POLICY");

        // A compliant password goes through and replaces the old one
        let strong = server
            .put(&format!("/api/v1/users/{}", user_id))
            .json(&UpdateUserRequest {
                username: None,
                email: None,
                password: Some("fresh42".to_string()),
            })
            .await;
        strong.assert_status(StatusCode::OK);

        let new_login = server
            .post("/api/v1/auth/login")
            .json(&LoginRequest {
                username: "rotator".to_string(),
                password: "fresh42".to_string(),
            })
            .await;
        new_login.assert_status(StatusCode::OK);

        let old_login = server
            .post("/api/v1/auth/login")
            .json(&LoginRequest {
                username: "rotator".to_string(),
                password: "pass123".to_string(),
            })
            .await;
        old_login.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        create_user(&server, "gamer04").await;

        let response = server
            .post("/api/v1/auth/login")
            .json(&LoginRequest {
                username: "gamer04".to_string(),
                password: "pass123".to_string(),
            })
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert!(body.success);
        assert_eq!(body.data["user"]["username"], "gamer04");
        assert!(body.data["roles"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        create_user(&server, "gamer05").await;

        let response = server
            .post("/api/v1/auth/login")
            .json(&LoginRequest {
                username: "gamer05".to_string(),
                password: "wrong99".to_string(),
            })
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = response.json();
        assert_eq!(body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn test_login_unknown_user() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/v1/auth/login")
            .json(&LoginRequest {
                username: "nobody".to_string(),
                password: "pass123".to_string(),
            })
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_default_roles_are_seeded() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/v1/roles").await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<serde_json::Value>> = response.json();
        let names: Vec<&str> = body
            .data
            .iter()
            .map(|role| role["name"].as_str().unwrap())
            .collect();
        assert!(names.contains(&"admin"));
        assert!(names.contains(&"user"));
    }

    #[tokio::test]
    async fn test_assign_and_remove_role() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let user_id = create_user(&server, "gamer06").await;

        let roles_response = server.get("/api/v1/roles").await;
        let roles_body: ApiResponse<Vec<serde_json::Value>> = roles_response.json();
        let admin_role_id = roles_body
            .data
            .iter()
            .find(|role| role["name"] == "admin")
            .unwrap()["id"]
            .as_i64()
            .unwrap();

        // Grant the role
        let assign_response = server
            .post(&format!("/api/v1/users/{}/roles", user_id))
            .json(&AssignRoleRequest {
                role_id: admin_role_id as i32,
            })
            .await;
        assign_response.assert_status(StatusCode::OK);

        // Granting again is a no-op, not an error
        let repeat_response = server
            .post(&format!("/api/v1/users/{}/roles", user_id))
            .json(&AssignRoleRequest {
                role_id: admin_role_id as i32,
            })
            .await;
        repeat_response.assert_status(StatusCode::OK);

        let user_roles_response = server
            .get(&format!("/api/v1/users/{}/roles", user_id))
            .await;
        user_roles_response.assert_status(StatusCode::OK);
        let user_roles: ApiResponse<Vec<serde_json::Value>> = user_roles_response.json();
        assert_eq!(user_roles.data.len(), 1);
        assert_eq!(user_roles.data[0]["name"], "admin");

        // Revoke it again
        let remove_response = server
            .delete(&format!("/api/v1/users/{}/roles/{}", user_id, admin_role_id))
            .await;
        remove_response.assert_status(StatusCode::OK);

        let after_remove: ApiResponse<Vec<serde_json::Value>> = server
            .get(&format!("/api/v1/users/{}/roles", user_id))
            .await
            .json();
        assert!(after_remove.data.is_empty());
    }

    #[tokio::test]
    async fn test_assign_role_unknown_role() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let user_id = create_user(&server, "gamer07").await;

        let response = server
            .post(&format!("/api/v1/users/{}/roles", user_id))
            .json(&AssignRoleRequest { role_id: 99999 })
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        let body: serde_json::Value = response.json();
        assert_eq!(body["code"], "ROLE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_record_purchase() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let user_id = create_user(&server, "buyer01").await;
        let game_id = create_game(&server, "Hades", vec![]).await;

        let response = server
            .post("/api/v1/purchases")
            .json(&CreatePurchaseRequest {
                user_id: user_id as i32,
                game_id: game_id as i32,
                price_paid: None,
            })
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert!(body.success);
        assert_eq!(body.data["user_id"].as_i64().unwrap(), user_id);
        assert_eq!(body.data["game_id"].as_i64().unwrap(), game_id);
        // Defaults to the game's list price
        assert_eq!(body.data["price_paid"], "59.99");
    }

    #[tokio::test]
    async fn test_record_purchase_with_discounted_price() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let user_id = create_user(&server, "buyer02").await;
        let game_id = create_game(&server, "Celeste", vec![]).await;

        let response = server
            .post("/api/v1/purchases")
            .json(&CreatePurchaseRequest {
                user_id: user_id as i32,
                game_id: game_id as i32,
                price_paid: Some(Decimal::new(1999, 2)),
            })
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["price_paid"], "19.99");
    }

    #[tokio::test]
    async fn test_duplicate_purchase_rejected() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let user_id = create_user(&server, "buyer03").await;
        let game_id = create_game(&server, "Factorio", vec![]).await;

        let first = server
            .post("/api/v1/purchases")
            .json(&CreatePurchaseRequest {
                user_id: user_id as i32,
                game_id: game_id as i32,
                price_paid: None,
            })
            .await;
        first.assert_status(StatusCode::CREATED);

        let second = server
            .post("/api/v1/purchases")
            .json(&CreatePurchaseRequest {
                user_id: user_id as i32,
                game_id: game_id as i32,
                price_paid: None,
            })
            .await;

        second.assert_status(StatusCode::CONFLICT);
        let body: serde_json::Value = second.json();
        assert_eq!(body["code"], "ALREADY_OWNED");
    }

    #[tokio::test]
    async fn test_purchase_negative_price_rejected() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let user_id = create_user(&server, "buyer07").await;
        let game_id = create_game(&server, "Rimworld", vec![]).await;

        let response = server
            .post("/api/v1/purchases")
            .json(&CreatePurchaseRequest {
                user_id: user_id as i32,
                game_id: game_id as i32,
                price_paid: Some(Decimal::new(-1999, 2)),
            })
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["code"], "NEGATIVE_PRICE");
    }

    #[tokio::test]
    async fn test_purchase_unknown_game() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let user_id = create_user(&server, "buyer04").await;

        let response = server
            .post("/api/v1/purchases")
            .json(&CreatePurchaseRequest {
                user_id: user_id as i32,
                game_id: 99999,
                price_paid: None,
            })
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["code"], "UNKNOWN_GAME");
    }

    #[tokio::test]
    async fn test_user_purchase_history() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let user_id = create_user(&server, "buyer05").await;
        let first_game = create_game(&server, "Outer Wilds", vec![]).await;
        let second_game = create_game(&server, "Return of the Obra Dinn", vec![]).await;

        for game_id in [first_game, second_game] {
            let response = server
                .post("/api/v1/purchases")
                .json(&CreatePurchaseRequest {
                    user_id: user_id as i32,
                    game_id: game_id as i32,
                    price_paid: None,
                })
                .await;
            response.assert_status(StatusCode::CREATED);
        }

        let response = server
            .get(&format!("/api/v1/users/{}/purchases", user_id))
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<serde_json::Value>> = response.json();
        assert_eq!(body.data.len(), 2);
    }

    #[tokio::test]
    async fn test_user_purchase_history_unknown_user() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/v1/users/99999/purchases").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_purchase() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let user_id = create_user(&server, "buyer06").await;
        let game_id = create_game(&server, "Subnautica", vec![]).await;

        let create_response = server
            .post("/api/v1/purchases")
            .json(&CreatePurchaseRequest {
                user_id: user_id as i32,
                game_id: game_id as i32,
                price_paid: None,
            })
            .await;
        create_response.assert_status(StatusCode::CREATED);
        let create_body: ApiResponse<serde_json::Value> = create_response.json();
        let purchase_id = create_body.data["id"].as_i64().unwrap();

        let response = server
            .delete(&format!("/api/v1/purchases/{}", purchase_id))
            .await;
        response.assert_status(StatusCode::OK);

        let get_response = server
            .get(&format!("/api/v1/purchases/{}", purchase_id))
            .await;
        get_response.assert_status(StatusCode::NOT_FOUND);
    }
}
