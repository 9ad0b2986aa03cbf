use synergy_backend::{
    api::router::create_router,
    config::Config,
    domain::services::access_control::AccessControl,
    domain::services::auth_service::AuthService,
    domain::services::dashboard_service::DashboardService,
    domain::services::notification_service::NotificationDispatcher,
    infra::repositories::{
        sqlite_auth_repo::SqliteAuthRepo,
        sqlite_dashboard_repo::SqliteDashboardRepo,
        sqlite_member_repo::SqliteMemberRepo,
        sqlite_message_repo::SqliteMessageRepo,
        sqlite_notification_repo::SqliteNotificationRepo,
        sqlite_project_repo::SqliteProjectRepo,
        sqlite_task_repo::SqliteTaskRepo,
        sqlite_user_repo::SqliteUserRepo,
    },
    state::AppState,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{header, Method, Request},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

pub struct AuthHeaders {
    pub access_token: String,
    pub refresh_token: String,
    pub csrf_token: String,
    pub user_id: String,
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let priv_key_pem = include_str!("../tests/keys/test_private.pem");
        let pub_key_pem = include_str!("../tests/keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_secret_key: priv_key_pem.to_string(),
            jwt_public_key: pub_key_pem.to_string(),
            auth_issuer: "test-issuer".to_string(),
        };

        let user_repo = Arc::new(SqliteUserRepo::new(pool.clone()));
        let project_repo = Arc::new(SqliteProjectRepo::new(pool.clone()));
        let member_repo = Arc::new(SqliteMemberRepo::new(pool.clone()));
        let task_repo = Arc::new(SqliteTaskRepo::new(pool.clone()));
        let message_repo = Arc::new(SqliteMessageRepo::new(pool.clone()));
        let notification_repo = Arc::new(SqliteNotificationRepo::new(pool.clone()));
        let dashboard_repo = Arc::new(SqliteDashboardRepo::new(pool.clone()));
        let auth_repo = Arc::new(SqliteAuthRepo::new(pool.clone()));

        let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config.clone()));
        let access_control = Arc::new(AccessControl::new(project_repo.clone()));
        let dashboard_service = Arc::new(DashboardService::new(
            project_repo.clone(),
            dashboard_repo.clone(),
            notification_repo.clone(),
        ));
        let dispatcher = Arc::new(NotificationDispatcher::new(
            notification_repo.clone(),
            user_repo.clone(),
            project_repo.clone(),
        ));

        let state = Arc::new(AppState {
            config: config.clone(),
            user_repo,
            project_repo,
            member_repo,
            task_repo,
            message_repo,
            notification_repo,
            dashboard_repo,
            auth_repo,
            auth_service,
            access_control,
            dashboard_service,
            dispatcher,
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> AuthHeaders {
        let payload = serde_json::json!({
            "name": name,
            "email": email,
            "password": password
        });

        let response = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap();

        if !response.status().is_success() {
            panic!("Registration failed in test helper: status {}", response.status());
        }

        Self::auth_headers_from(response).await
    }

    pub async fn login(&self, email: &str, password: &str) -> AuthHeaders {
        let payload = serde_json::json!({
            "email": email,
            "password": password
        });

        let response = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap();

        if !response.status().is_success() {
            panic!("Login failed in test helper: status {}", response.status());
        }

        Self::auth_headers_from(response).await
    }

    async fn auth_headers_from(response: axum::response::Response) -> AuthHeaders {
        let cookies: Vec<String> = response.headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|h| h.to_str().unwrap().to_string())
            .collect();

        let access_token = extract_cookie(&cookies, "access_token")
            .expect("No access_token cookie returned");
        let refresh_token = extract_cookie(&cookies, "refresh_token")
            .expect("No refresh_token cookie returned");

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body_json: Value = serde_json::from_slice(&body_bytes).unwrap();
        let csrf_token = body_json["csrf_token"].as_str().expect("No csrf_token in body").to_string();
        let user_id = body_json["user"]["id"].as_str().expect("No user id in body").to_string();

        AuthHeaders {
            access_token,
            refresh_token,
            csrf_token,
            user_id,
        }
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}

fn extract_cookie(cookies: &[String], name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    let cookie = cookies.iter().find(|c| c.starts_with(&prefix))?;
    let start = prefix.len();
    let end = cookie[start..].find(';').unwrap_or(cookie.len() - start);
    Some(cookie[start..start + end].to_string())
}

/// Request carrying the auth cookie and, for mutating methods, the CSRF header.
pub fn authed_request(method: Method, uri: &str, auth: &AuthHeaders, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method.clone())
        .uri(uri)
        .header(header::COOKIE, format!("access_token={}", auth.access_token));

    if method != Method::GET && method != Method::HEAD {
        builder = builder.header("X-CSRF-Token", &auth.csrf_token);
    }

    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}
