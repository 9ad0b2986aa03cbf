use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::AppState;
use crate::domain::services::access_control::AccessControl;
use crate::domain::services::auth_service::AuthService;
use crate::domain::services::dashboard_service::DashboardService;
use crate::domain::services::notification_service::NotificationDispatcher;
use crate::infra::repositories::{
    postgres_auth_repo::PostgresAuthRepo, postgres_dashboard_repo::PostgresDashboardRepo,
    postgres_member_repo::PostgresMemberRepo, postgres_message_repo::PostgresMessageRepo,
    postgres_notification_repo::PostgresNotificationRepo, postgres_project_repo::PostgresProjectRepo,
    postgres_task_repo::PostgresTaskRepo, postgres_user_repo::PostgresUserRepo,
    sqlite_auth_repo::SqliteAuthRepo, sqlite_dashboard_repo::SqliteDashboardRepo,
    sqlite_member_repo::SqliteMemberRepo, sqlite_message_repo::SqliteMessageRepo,
    sqlite_notification_repo::SqliteNotificationRepo, sqlite_project_repo::SqliteProjectRepo,
    sqlite_task_repo::SqliteTaskRepo, sqlite_user_repo::SqliteUserRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        let user_repo = Arc::new(PostgresUserRepo::new(pool.clone()));
        let project_repo = Arc::new(PostgresProjectRepo::new(pool.clone()));
        let member_repo = Arc::new(PostgresMemberRepo::new(pool.clone()));
        let task_repo = Arc::new(PostgresTaskRepo::new(pool.clone()));
        let message_repo = Arc::new(PostgresMessageRepo::new(pool.clone()));
        let notification_repo = Arc::new(PostgresNotificationRepo::new(pool.clone()));
        let dashboard_repo = Arc::new(PostgresDashboardRepo::new(pool.clone()));
        let auth_repo = Arc::new(PostgresAuthRepo::new(pool.clone()));

        assemble_state(
            config,
            user_repo, project_repo, member_repo, task_repo,
            message_repo, notification_repo, dashboard_repo, auth_repo,
        )
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        let user_repo = Arc::new(SqliteUserRepo::new(pool.clone()));
        let project_repo = Arc::new(SqliteProjectRepo::new(pool.clone()));
        let member_repo = Arc::new(SqliteMemberRepo::new(pool.clone()));
        let task_repo = Arc::new(SqliteTaskRepo::new(pool.clone()));
        let message_repo = Arc::new(SqliteMessageRepo::new(pool.clone()));
        let notification_repo = Arc::new(SqliteNotificationRepo::new(pool.clone()));
        let dashboard_repo = Arc::new(SqliteDashboardRepo::new(pool.clone()));
        let auth_repo = Arc::new(SqliteAuthRepo::new(pool.clone()));

        assemble_state(
            config,
            user_repo, project_repo, member_repo, task_repo,
            message_repo, notification_repo, dashboard_repo, auth_repo,
        )
    }
}

#[allow(clippy::too_many_arguments)]
fn assemble_state(
    config: &Config,
    user_repo: Arc<dyn crate::domain::ports::UserRepository>,
    project_repo: Arc<dyn crate::domain::ports::ProjectRepository>,
    member_repo: Arc<dyn crate::domain::ports::ProjectMemberRepository>,
    task_repo: Arc<dyn crate::domain::ports::TaskRepository>,
    message_repo: Arc<dyn crate::domain::ports::MessageRepository>,
    notification_repo: Arc<dyn crate::domain::ports::NotificationRepository>,
    dashboard_repo: Arc<dyn crate::domain::ports::DashboardRepository>,
    auth_repo: Arc<dyn crate::domain::ports::AuthRepository>,
) -> AppState {
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

    AppState {
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
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
