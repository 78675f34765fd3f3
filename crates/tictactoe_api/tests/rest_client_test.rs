//! Tests for the reqwest-backed game service client against a fake service.

use serde_json::json;
use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tictactoe_api::{
    ApiErrorKind, Credentials, GameService, GameStatus, MoveRequest, RestGameClient,
};

fn game_json(id: u64, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "status": status,
        "board": [[null, null, null], [null, null, null], [null, null, null]],
        "first_player": {"id": 1, "username": "a"},
        "second_player": null,
        "winner": null
    })
}

#[tokio::test]
async fn test_login_posts_credentials_and_returns_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login/"))
        .and(body_json(json!({"username": "a", "password": "p"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"username": "a", "token": "T"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = RestGameClient::new(server.uri());
    let response = client
        .login(&Credentials::new("a".to_string(), "p".to_string()))
        .await
        .expect("Login failed");

    assert_eq!(response.username(), "a");
    assert_eq!(response.token(), "T");
}

#[tokio::test]
async fn test_login_does_not_send_authorization() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login/"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"username": "a", "token": "T"})))
        .mount(&server)
        .await;

    let client = RestGameClient::new(server.uri());
    client
        .login(&Credentials::new("a".to_string(), "p".to_string()))
        .await
        .expect("Login failed");
}

#[tokio::test]
async fn test_register_rejection_surfaces_error_list_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/register/"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"errors": [{"message": "Username already taken"}]})),
        )
        .mount(&server)
        .await;

    let client = RestGameClient::new(server.uri());
    let err = client
        .register(&Credentials::new("a".to_string(), "p".to_string()))
        .await
        .expect_err("Register should fail");

    assert_eq!(
        err.kind,
        ApiErrorKind::Rejected {
            status: 400,
            message: Some("Username already taken".to_string()),
        }
    );
}

#[tokio::test]
async fn test_list_games_sends_paging_filter_and_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/games"))
        .and(query_param("limit", "10"))
        .and(query_param("offset", "20"))
        .and(query_param("status", "progress"))
        .and(header("authorization", "Bearer T"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 21,
            "next": null,
            "previous": "https://service/games?limit=10&offset=10",
            "results": [{"id": 5, "status": "progress", "first_player": {"id": 1, "username": "a"}, "second_player": {"id": 2, "username": "b"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = RestGameClient::new(format!("{}/", server.uri()));
    let page = client
        .list_games("T", 10, 20, Some(GameStatus::Progress))
        .await
        .expect("List failed");

    assert_eq!(*page.count(), 21);
    assert_eq!(page.results().len(), 1);
    assert!(page.next().is_none());
    assert!(page.previous().is_some());
}

#[tokio::test]
async fn test_list_games_without_filter_omits_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/games"))
        .and(query_param("status", "open"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/games"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 0, "next": null, "previous": null, "results": []
        })))
        .mount(&server)
        .await;

    let client = RestGameClient::new(server.uri());
    let page = client.list_games("T", 10, 0, None).await.expect("List failed");
    assert!(page.results().is_empty());
}

#[tokio::test]
async fn test_list_games_rejection_reads_top_level_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/games"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid token"})))
        .mount(&server)
        .await;

    let client = RestGameClient::new(server.uri());
    let err = client
        .list_games("bad", 10, 0, None)
        .await
        .expect_err("List should fail");

    assert_eq!(err.user_message("fallback"), "Invalid token");
}

#[tokio::test]
async fn test_create_and_get_game() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/games/"))
        .and(header("authorization", "Bearer T"))
        .respond_with(ResponseTemplate::new(201).set_body_json(game_json(9, "open")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/games/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(game_json(9, "open")))
        .mount(&server)
        .await;

    let client = RestGameClient::new(server.uri());
    let created = client.create_game("T").await.expect("Create failed");
    let fetched = client.get_game("T", 9).await.expect("Get failed");

    assert_eq!(*created.id(), 9);
    assert_eq!(created, fetched);
    assert_eq!(*fetched.status(), GameStatus::Open);
}

#[tokio::test]
async fn test_join_and_move_hit_their_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/games/9/join/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/games/9/move/"))
        .and(body_json(json!({"row": 1, "col": 2})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = RestGameClient::new(server.uri());
    client.join_game("T", 9).await.expect("Join failed");
    client
        .make_move("T", 9, MoveRequest::new(1, 2))
        .await
        .expect("Move failed");
}

#[tokio::test]
async fn test_rankings_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("limit", "10"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"id": 1, "username": "a", "game_count": 4, "win_rate": 50.0},
                {"id": 2, "username": "b", "game_count": 2, "win_rate": 0.0}
            ]
        })))
        .mount(&server)
        .await;

    let client = RestGameClient::new(server.uri());
    let page = client.rankings("T", 10, 0).await.expect("Rankings failed");

    assert_eq!(page.results().len(), 2);
    assert_eq!(page.results()[0].username(), "a");
    assert_eq!(*page.results()[0].games_played(), 4);
}

#[tokio::test]
async fn test_malformed_success_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/games/3"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = RestGameClient::new(server.uri());
    let err = client.get_game("T", 3).await.expect_err("Should not decode");
    assert!(matches!(err.kind, ApiErrorKind::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = RestGameClient::new(uri);
    let err = client.get_game("T", 3).await.expect_err("Should not connect");
    assert!(matches!(err.kind, ApiErrorKind::Transport(_)));
}
