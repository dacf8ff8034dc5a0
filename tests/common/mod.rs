//! 集成测试公共环境：临时 SQLite + 完整服务组装

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use linklytics::analytics::{ClickRecorder, ClickSink, IpHasher};
use linklytics::api::AppServices;
use linklytics::api::jwt::JwtService;
use linklytics::services::{LinkService, LinkSettings, RandomCodeGenerator};
use linklytics::storage::backend::retry::RetryConfig;
use linklytics::storage::backend::{SeaOrmStorage, connect_sqlite, run_migrations};
use linklytics::utils::ip::TrustedProxies;
use tempfile::TempDir;

pub const BASE_URL: &str = "https://sho.rt";
pub const JWT_SECRET: &str = "integration-test-secret";

pub struct TestEnv {
    // 持有临时目录，drop 时删除数据库文件
    _dir: TempDir,
    pub storage: Arc<SeaOrmStorage>,
    pub recorder: Arc<ClickRecorder>,
    pub services: AppServices,
}

pub async fn create_storage() -> (TempDir, Arc<SeaOrmStorage>) {
    let dir = TempDir::new().expect("创建临时目录失败");
    let db_path = dir.path().join("linklytics_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let db = connect_sqlite(&db_url).await.expect("连接 SQLite 失败");
    run_migrations(&db).await.expect("运行迁移失败");

    let retry = RetryConfig {
        max_retries: 3,
        base_delay_ms: 5,
        max_delay_ms: 50,
    };
    let storage = Arc::new(SeaOrmStorage::from_connection(db, "sqlite", retry));
    (dir, storage)
}

pub fn link_service(storage: &Arc<SeaOrmStorage>) -> LinkService {
    LinkService::new(
        storage.clone(),
        Arc::new(RandomCodeGenerator::new(7)),
        LinkSettings::default(),
    )
}

pub async fn setup() -> TestEnv {
    let (dir, storage) = create_storage().await;

    let sink: Arc<dyn ClickSink> = storage.clone();
    let recorder = Arc::new(ClickRecorder::new(
        sink,
        IpHasher::new("test-salt"),
        Duration::from_secs(3600),
        100_000,
    ));

    let services = AppServices::new(
        storage.clone(),
        link_service(&storage),
        recorder.clone(),
        JwtService::new(JWT_SECRET, 60),
        TrustedProxies::default(),
        BASE_URL,
    );

    TestEnv {
        _dir: dir,
        storage,
        recorder,
        services,
    }
}

pub const CHROME_DESKTOP: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const SAFARI_IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_2 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Mobile/15E148 Safari/604.1";
pub const FIREFOX_LINUX: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0";
