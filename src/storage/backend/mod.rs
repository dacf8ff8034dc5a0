//! SeaORM storage backend
//!
//! SQLite / MySQL(MariaDB) / PostgreSQL，按 URL 自动识别。

mod analytics;
mod click_sink;
mod connection;
mod converters;
mod links;
pub mod retry;
mod users;

use sea_orm::{ConnectionTrait, DatabaseConnection};
use tracing::info;

use crate::errors::{LinklyticsError, Result};

pub use analytics::{CategoryRow, ClickBreakdown, DailyRow};
pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{
    click_event_to_active_model, model_to_link, model_to_user, parse_browser, parse_device,
};

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(LinklyticsError::database_config(format!(
            "Cannot infer database type from URL: {}. Supported: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// 裸文件路径补全为 sqlite:// URL
fn normalize_sqlite_url(database_url: &str) -> String {
    if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else if database_url == ":memory:" {
        "sqlite::memory:".to_string()
    } else {
        format!("sqlite://{}", database_url)
    }
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
    retry_config: retry::RetryConfig,
}

impl SeaOrmStorage {
    /// 连接数据库并执行迁移
    pub async fn new(database_url: &str, backend_name: &str) -> Result<Self> {
        if database_url.is_empty() {
            return Err(LinklyticsError::database_config("database_url is not set"));
        }

        let db = if backend_name == "sqlite" {
            connect_sqlite(&normalize_sqlite_url(database_url)).await?
        } else {
            connect_generic(database_url, backend_name).await?
        };

        run_migrations(&db).await?;

        let storage = Self::from_connection(db, backend_name, retry::RetryConfig::from_config());
        info!("{} storage initialized", storage.backend_name.to_uppercase());
        Ok(storage)
    }

    /// 使用已建立（且已迁移）的连接构造
    pub fn from_connection(
        db: DatabaseConnection,
        backend_name: &str,
        retry_config: retry::RetryConfig,
    ) -> Self {
        Self {
            db,
            backend_name: match backend_name {
                "mariadb" => "mysql".to_string(),
                other => other.to_string(),
            },
            retry_config,
        }
    }

    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn get_backend_name(&self) -> &str {
        &self.backend_name
    }

    /// 就绪检查
    pub async fn ping(&self) -> Result<()> {
        self.db
            .execute_unprepared("SELECT 1")
            .await
            .map(|_| ())
            .map_err(|e| LinklyticsError::database_connection(e.to_string()))
    }
}
