// tests/report_tests.rs
//
// Moderation accumulator: per-pair uniqueness, self-report policy and the
// three-report automatic removal.

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use vecinet::{config::Config, routes, state::AppState};

async fn spawn_app() -> (String, SqlitePool) {
    let db_path = std::env::temp_dir().join(format!("vecinet_test_{}.db", uuid::Uuid::new_v4()));

    let options = SqliteConnectOptions::new()
        .filename(&db_path)
        .create_if_missing(true)
        .busy_timeout(std::time::Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .expect("Failed to open test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let config = Config {
        database_url: format!("sqlite://{}", db_path.display()),
        jwt_secret: "report_test_secret".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        default_radius_km: 5.0,
        max_radius_km: 20.0,
    };

    let state = AppState {
        pool: pool.clone(),
        config,
    };
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (address, pool)
}

async fn register_user(client: &reqwest::Client, address: &str, name: &str) -> (String, i64) {
    let email = format!(
        "{}_{}@vecinet.test",
        name.to_lowercase().replace(' ', "."),
        &uuid::Uuid::new_v4().to_string()[..8]
    );

    let body: serde_json::Value = client
        .post(format!("{address}/api/auth/register"))
        .json(&serde_json::json!({
            "name": name,
            "email": email,
            "password": "password123"
        }))
        .send()
        .await
        .expect("Failed to register")
        .json()
        .await
        .unwrap();

    (
        body["token"].as_str().unwrap().to_string(),
        body["user"]["id"].as_i64().unwrap(),
    )
}

async fn report(
    client: &reqwest::Client,
    address: &str,
    token: &str,
    post_id: i64,
    reason: serde_json::Value,
) -> reqwest::Response {
    client
        .post(format!("{address}/api/posts/{post_id}/report"))
        .header("Authorization", format!("Bearer {token}"))
        .json(&serde_json::json!({ "reason": reason }))
        .send()
        .await
        .expect("Failed to send report")
}

#[tokio::test]
async fn three_reports_remove_the_post() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let (owner_token, owner_id) = register_user(&client, &address, "Ana Vecina").await;

    let response = client
        .post(format!("{address}/api/posts"))
        .header("Authorization", format!("Bearer {owner_token}"))
        .json(&serde_json::json!({
            "category": "request",
            "title": "Busco taladro",
            "description": "Necesito un taladro para el fin de semana",
            "coordinates": { "lat": 40.4168, "lng": -3.7038 },
            "postal_code": "28001"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);
    let post: serde_json::Value = response.json().await.unwrap();
    let post_id = post["id"].as_i64().unwrap();

    // Two reports: still visible, counter climbing.
    for reporter in ["Benito Vecino", "Carmen Vecina"] {
        let (token, _) = register_user(&client, &address, reporter).await;
        let response = report(&client, &address, &token, post_id, serde_json::Value::Null).await;
        assert_eq!(response.status().as_u16(), 200);
        let outcome: serde_json::Value = response.json().await.unwrap();
        assert_eq!(outcome["already_reported"], false);
    }

    let feed: Vec<serde_json::Value> = client
        .get(format!("{address}/api/posts"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0]["reports_count"], 2);

    // The third distinct reporter trips the threshold.
    let (token, _) = register_user(&client, &address, "Diego Vecino").await;
    let response = report(&client, &address, &token, post_id, serde_json::Value::Null).await;
    assert_eq!(response.status().as_u16(), 200);

    let feed: Vec<serde_json::Value> = client
        .get(format!("{address}/api/posts"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(feed.is_empty());

    // Removal is irreversible: the post is gone, not hidden.
    let response = client
        .get(format!("{address}/api/posts/{post_id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);

    // The owner's live listing counter dropped with it.
    let profile: serde_json::Value = client
        .get(format!("{address}/api/users/{owner_id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(profile["total_posts"], 0);
}

#[tokio::test]
async fn duplicate_report_is_a_benign_no_op() {
    let (address, pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let (owner_token, _) = register_user(&client, &address, "Ana Vecina").await;
    let (reporter_token, reporter_id) = register_user(&client, &address, "Benito Vecino").await;

    let post: serde_json::Value = client
        .post(format!("{address}/api/posts"))
        .header("Authorization", format!("Bearer {owner_token}"))
        .json(&serde_json::json!({
            "category": "sale",
            "title": "Vendo bicicleta",
            "description": "Bicicleta de paseo en buen estado",
            "coordinates": { "lat": 40.4168, "lng": -3.7038 },
            "postal_code": "28001"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let post_id = post["id"].as_i64().unwrap();

    let response = report(
        &client,
        &address,
        &reporter_token,
        post_id,
        serde_json::json!("Contenido enganoso"),
    )
    .await;
    assert_eq!(response.status().as_u16(), 200);
    let outcome: serde_json::Value = response.json().await.unwrap();
    assert_eq!(outcome["already_reported"], false);

    // Same user again: distinct outcome, nothing mutated.
    let response = report(
        &client,
        &address,
        &reporter_token,
        post_id,
        serde_json::json!("Contenido enganoso"),
    )
    .await;
    assert_eq!(response.status().as_u16(), 200);
    let outcome: serde_json::Value = response.json().await.unwrap();
    assert_eq!(outcome["already_reported"], true);

    let current: serde_json::Value = client
        .get(format!("{address}/api/posts/{post_id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(current["reports_count"], 1);

    let reports = sqlx::query_as::<_, vecinet::models::report::Report>(
        "SELECT id, post_id, reporter_id, reason, created_at FROM reports WHERE post_id = ?",
    )
    .bind(post_id)
    .fetch_all(&pool)
    .await
    .unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].reporter_id, reporter_id);
}

#[tokio::test]
async fn self_report_is_rejected() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let (owner_token, _) = register_user(&client, &address, "Ana Vecina").await;

    let post: serde_json::Value = client
        .post(format!("{address}/api/posts"))
        .header("Authorization", format!("Bearer {owner_token}"))
        .json(&serde_json::json!({
            "category": "offer",
            "title": "Ofrezco clases de piano",
            "description": "Clases a domicilio por las tardes",
            "coordinates": { "lat": 40.4168, "lng": -3.7038 },
            "postal_code": "28001"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let post_id = post["id"].as_i64().unwrap();

    let response = report(&client, &address, &owner_token, post_id, serde_json::Value::Null).await;
    assert_eq!(response.status().as_u16(), 400);

    let current: serde_json::Value = client
        .get(format!("{address}/api/posts/{post_id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(current["reports_count"], 0);
}

#[tokio::test]
async fn reporting_a_missing_post_is_404() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let (token, _) = register_user(&client, &address, "Ana Vecina").await;

    let response = report(&client, &address, &token, 424242, serde_json::Value::Null).await;
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn report_reason_is_sanitized_before_storage() {
    let (address, pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let (owner_token, _) = register_user(&client, &address, "Ana Vecina").await;
    let (reporter_token, _) = register_user(&client, &address, "Benito Vecino").await;

    let post: serde_json::Value = client
        .post(format!("{address}/api/posts"))
        .header("Authorization", format!("Bearer {owner_token}"))
        .json(&serde_json::json!({
            "category": "exchange",
            "title": "Cambio libros",
            "description": "Novelas a cambio de ensayos",
            "coordinates": { "lat": 40.4168, "lng": -3.7038 },
            "postal_code": "28001"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let post_id = post["id"].as_i64().unwrap();

    let response = report(
        &client,
        &address,
        &reporter_token,
        post_id,
        serde_json::json!("<script>alert(1)</script>spam"),
    )
    .await;
    assert_eq!(response.status().as_u16(), 200);

    let (reason,): (Option<String>,) =
        sqlx::query_as("SELECT reason FROM reports WHERE post_id = ?")
            .bind(post_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    let reason = reason.unwrap();
    assert!(!reason.contains("<script"));
    assert!(reason.contains("spam"));
}
