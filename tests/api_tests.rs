use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use http_body_util::BodyExt;
use mymedialist::config::Config;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn spawn_app() -> Router {
    let db_path =
        std::env::temp_dir().join(format!("mymedialist-api-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.server.secure_cookies = false;
    config.observability.metrics_enabled = false;
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;

    let state = mymedialist::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    mymedialist::api::router(state).await
}

async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

fn get(uri: &str, api_key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(key) = api_key {
        builder = builder.header("X-Api-Key", key);
    }
    builder.body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, api_key: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(key) = api_key {
        builder = builder.header("X-Api-Key", key);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Registers `username` and logs in. Returns the API key and the session
/// cookie set by the login response.
async fn register_and_login(app: &Router, username: &str) -> (String, Option<String>) {
    let response = send(
        app,
        json_request(
            "POST",
            "/api/auth/register",
            None,
            &json!({
                "username": username,
                "email": format!("{username}@example.com"),
                "first_name": "John",
                "last_name": "Smith",
                "password": "password123"
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(
        app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            &json!({ "username": username, "password": "password123" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(str::to_string);
    let body = body_json(response).await;
    let api_key = body["data"]["api_key"].as_str().unwrap().to_string();

    (api_key, cookie)
}

async fn create_film(app: &Router, api_key: &str, title: &str) -> i64 {
    let response = send(
        app,
        json_request(
            "POST",
            "/api/media/films",
            Some(api_key),
            &json!({ "title": title, "release_status": "released", "runtime": 120 }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_protected_routes_require_auth() {
    let app = spawn_app().await;
    let (api_key, _) = register_and_login(&app, "john_smith").await;

    let response = send(&app, get("/api/system/status", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Authentication required");

    let response = send(&app, get("/api/system/status", Some("wrong-key"))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, get("/api/system/status", Some(&api_key))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["users"], 1);

    let response = send(
        &app,
        Request::builder()
            .uri("/api/auth/me")
            .header(header::AUTHORIZATION, format!("Bearer {api_key}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["username"], "john_smith");
    assert!(body["data"].get("api_key").is_none());
}

#[tokio::test]
async fn test_session_login_flow() {
    let app = spawn_app().await;
    let (_, cookie) = register_and_login(&app, "john_smith").await;
    let cookie = cookie.expect("login sets a session cookie");

    let response = send(
        &app,
        Request::builder()
            .uri("/api/auth/me")
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["username"], "john_smith");

    let response = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/api/auth/logout")
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(
        &app,
        Request::builder()
            .uri("/api/auth/me")
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let app = spawn_app().await;
    register_and_login(&app, "john_smith").await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            &json!({ "username": "john_smith", "password": "not-the-password" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/auth/register",
            None,
            &json!({ "username": "john_smith", "password": "password123" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_profiles() {
    let app = spawn_app().await;
    let (api_key, _) = register_and_login(&app, "john_smith").await;

    let response = send(&app, get("/api/profile", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, get("/api/profile", Some(&api_key))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["title"], "john_smith's profile");

    let response = send(&app, get("/api/users/john_smith", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["title"], "john_smith's profile");
    assert_eq!(body["data"]["lists"]["films"], 0);

    let response = send(&app, get("/api/users/unknown", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_dispatch() {
    let app = spawn_app().await;
    register_and_login(&app, "testUser1").await;

    let response = send(&app, get("/api/search?type=users&query=ab", None)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Search query must be at least 3 characters"
    );

    let response = send(&app, get("/api/search?type=users&query=%20%20ab", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/api/search/users?query=%20%20ab"
    );

    let response = send(&app, get("/api/search?query=abc", None)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid search type");

    let response = send(&app, get("/api/search?type=films&query=abc", None)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&app, get("/api/search?type=users&query=abc", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/api/search/users?query=abc"
    );

    let response = send(&app, get("/api/search/users?query=test", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["page"], 1);
    assert_eq!(body["data"]["results"][0]["username"], "testUser1");

    let response = send(&app, get("/api/search/users?query=te", None)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_media_and_relations() {
    let app = spawn_app().await;
    let (api_key, _) = register_and_login(&app, "john_smith").await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/media/films",
            None,
            &json!({ "title": "Film", "release_status": "released" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(
        &app,
        json_request("POST", "/api/media/films", Some(&api_key), &json!({ "title": "Film 2" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let odyssey = create_film(&app, &api_key, "2001: A Space Odyssey").await;
    let sequel = create_film(&app, &api_key, "2010: The Year We Make Contact").await;

    let response = send(&app, get(&format!("/api/media/{odyssey}"), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["media"]["title"], "2001: A Space Odyssey");
    assert_eq!(body["data"]["media"]["details"]["type"], "film");
    assert_eq!(body["data"]["media"]["details"]["runtime"], 120);

    let response = send(
        &app,
        json_request(
            "POST",
            &format!("/api/media/{odyssey}/relations"),
            Some(&api_key),
            &json!({ "other_id": sequel, "kind": "sequel" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["data"]["media1"], sequel);
    assert_eq!(body["data"]["media2"], odyssey);
    assert_eq!(body["data"]["relationship"], "sequel");

    let response = send(
        &app,
        json_request(
            "POST",
            &format!("/api/media/{sequel}/relations"),
            Some(&api_key),
            &json!({ "other_id": odyssey, "kind": "related" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let companion = create_film(&app, &api_key, "2001: The Making Of").await;
    let response = send(
        &app,
        json_request(
            "POST",
            &format!("/api/media/{odyssey}/relations"),
            Some(&api_key),
            &json!({ "other_id": companion, "kind": "related" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["data"]["media1"], companion);
    assert_eq!(body["data"]["media2"], odyssey);
    assert_eq!(body["data"]["relationship"], "related");

    let response = send(&app, get(&format!("/api/media/{odyssey}/sequels"), None)).await;
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["id"], sequel);

    let response = send(&app, get(&format!("/api/media/{sequel}/prequels"), None)).await;
    let body = body_json(response).await;
    assert_eq!(body["data"][0]["id"], odyssey);

    let response = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/media/{odyssey}/relations/{sequel}"))
            .header("X-Api-Key", &api_key)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, get(&format!("/api/media/{odyssey}/sequels"), None)).await;
    let body = body_json(response).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let response = send(&app, get("/api/media/999", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, get("/api/media?type=film&query=2010", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["id"], sequel);
}

#[tokio::test]
async fn test_lists() {
    let app = spawn_app().await;
    let (api_key, _) = register_and_login(&app, "john_smith").await;
    let film = create_film(&app, &api_key, "Arrival").await;

    let response = send(
        &app,
        json_request("POST", "/api/lists", Some(&api_key), &json!({ "media_id": film })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["data"]["progress"], 0);
    assert!(body["data"]["score"].is_null());

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/lists",
            Some(&api_key),
            &json!({ "media_id": film, "score": 9.0 }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/lists/{film}"),
            Some(&api_key),
            &json!({ "score": 8.5, "progress": 1 }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["score"], 8.5);
    assert_eq!(body["data"]["progress"], 1);

    let response = send(&app, get("/api/lists/films", Some(&api_key))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["title"], "john_smith's Film List");
    assert_eq!(body["data"]["entries"].as_array().unwrap().len(), 1);

    let response = send(&app, get("/api/lists/books", Some(&api_key))).await;
    let body = body_json(response).await;
    assert!(body["data"]["entries"].as_array().unwrap().is_empty());

    let response = send(&app, get("/api/users/john_smith/lists/film", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["entries"][0]["media"]["title"], "Arrival");

    let response = send(&app, get("/api/users/nobody/lists/film", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/lists/{film}"))
            .header("X-Api-Key", &api_key)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, get("/api/profile", Some(&api_key))).await;
    let body = body_json(response).await;
    assert_eq!(body["data"]["lists"]["films"], 0);
}

#[tokio::test]
async fn test_health_is_public() {
    let app = spawn_app().await;

    let response = send(&app, get("/api/system/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], true);
}

#[tokio::test]
async fn test_out_of_range_pages_are_rejected() {
    let app = spawn_app().await;

    for uri in [
        "/api/media?page=9223372036854775807&page_size=100",
        "/api/media?page=0",
        "/api/search/users?query=test&page=9223372036854775807",
        "/api/search/media?query=test&page=18446744073709551615",
        "/api/search?type=media&query=test&page=9223372036854775807",
    ] {
        let response = send(&app, get(uri, None)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
    }

    let response = send(&app, get("/api/media?page=2&page_size=100", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["page"], 2);
    assert!(body["data"]["items"].as_array().unwrap().is_empty());

    let response = send(&app, get("/api/system/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}
