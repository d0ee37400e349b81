#![allow(dead_code)]
use std::net::SocketAddr;

use sqlx::{postgres::PgPoolOptions, PgPool};

use followorg_backend::{api, auth, models::object_id::ObjectId, AppState};

pub const JWT_SECRET: &str = "test-secret-that-is-at-least-32-chars-long!!";
pub const JWT_EXPIRY_HOURS: u64 = 12;

/// Spin up a real axum server on a random port, returning its address and
/// the database pool. Returns None when TEST_DATABASE_URL is unset so tests
/// skip rather than fail in environments without Postgres. All tests share
/// the same database; isolation comes from unique orgs/users per test plus
/// cleanup afterwards.
pub async fn setup_test_app() -> Option<(SocketAddr, PgPool)> {
    let url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("TEST_DATABASE_URL not set; skipping test");
            return None;
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("Failed to connect to test database");

    // Run migrations to ensure schema is up-to-date
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let state = AppState {
        pool: pool.clone(),
        jwt_secret: JWT_SECRET.to_string(),
    };

    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Some((addr, pool))
}

/// Create a test organization with a unique name. Returns the org id.
pub async fn create_test_org(pool: &PgPool, suffix: &str) -> ObjectId {
    let id = ObjectId::new();
    // The random tail of the id keeps names unique across concurrent tests
    let name = format!("Test Org {} {}", suffix, &id.as_str()[16..]);

    sqlx::query(
        "INSERT INTO organizations (id, name, description, location, contact, img_url, geo_location)
         VALUES ($1, $2, 'A test organization', 'Testville', 'contact@test.local', 'https://test.local/logo.png', $3)",
    )
    .bind(&id)
    .bind(&name)
    .bind(serde_json::json!({ "lat": 45.52, "lng": -122.68 }))
    .execute(pool)
    .await
    .expect("Failed to create test org");

    id
}

/// Mint a bearer token for an arbitrary user id with the test secret.
pub fn auth_token(user_id: &ObjectId) -> String {
    auth::create_token(user_id.as_str(), JWT_SECRET, JWT_EXPIRY_HOURS)
        .expect("Failed to create token")
}

/// Create a JWT that is already expired (exp in the past), signed with the
/// same secret as the test app.
pub fn create_expired_token(user_id: &ObjectId) -> String {
    use followorg_backend::auth::Claims;
    use jsonwebtoken::{encode, EncodingKey, Header};

    let now = time::OffsetDateTime::now_utc();
    let claims = Claims {
        sub: user_id.as_str().to_string(),
        exp: (now - time::Duration::hours(1)).unix_timestamp(),
        iat: (now - time::Duration::hours(2)).unix_timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("Failed to create expired token")
}

/// Build a reqwest client (reusable across requests in a test).
pub fn http_client() -> reqwest::Client {
    reqwest::Client::new()
}

/// Clean up all follows touching an org, then the org itself.
pub async fn cleanup_test_org(pool: &PgPool, org_id: &ObjectId) {
    let _ = sqlx::query("DELETE FROM followings WHERE organization_id = $1")
        .bind(org_id)
        .execute(pool)
        .await;
    let _ = sqlx::query("DELETE FROM organizations WHERE id = $1")
        .bind(org_id)
        .execute(pool)
        .await;
}

/// Clean up all follows created by a test user.
pub async fn cleanup_test_user(pool: &PgPool, user_id: &ObjectId) {
    let _ = sqlx::query("DELETE FROM followings WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await;
}
