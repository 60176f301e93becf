#![allow(dead_code)]

use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use testcontainers_modules::testcontainers::runners::AsyncRunner;
use testcontainers_modules::{postgres, testcontainers};
use todo_server::config::Config;
use todo_server::web::{AppState, connect_database, create_app};

/// Opens a fresh, migrated in-memory SQLite database.
pub async fn setup_db() -> anyhow::Result<DatabaseConnection> {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().try_init();
    let db = connect_database("sqlite::memory:").await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

pub fn test_config() -> Config {
    Config {
        db_url: "sqlite::memory:".to_string(),
        port: 0,
        debug: false,
        max_per_page: 100,
    }
}

/// Builds the full application on a fresh database. The returned connection
/// shares the pool used by the router.
pub async fn setup_app() -> anyhow::Result<(axum::Router, DatabaseConnection)> {
    let db = setup_db().await?;
    let app = create_app(AppState::new(test_config(), db.clone()));
    Ok((app, db))
}

pub async fn setup_container() -> anyhow::Result<testcontainers::ContainerAsync<postgres::Postgres>>
{
    let container = postgres::Postgres::default().start().await?;
    Ok(container)
}

pub async fn setup_postgres_db(
    container: &testcontainers::ContainerAsync<postgres::Postgres>,
) -> anyhow::Result<DatabaseConnection> {
    let host = container.get_host().await?;
    let port = container.get_host_port_ipv4(5432).await?;
    let db_url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);
    let db = connect_database(&db_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}
