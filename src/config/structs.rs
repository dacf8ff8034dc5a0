use serde::{Deserialize, Serialize};

/// 静态配置（从 TOML 加载，启动时使用）
///
/// 包含：
/// - server: 监听地址、对外短链前缀、代理与 CORS
/// - database: 数据库连接与重试
/// - logging: 日志
/// - auth: JWT 签名与有效期
/// - links: 短码生成规则
/// - analytics: 点击缓冲、保留期与 IP 哈希盐
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub links: LinksConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：LL，分隔符：__
    /// 示例：LL__SERVER__PORT=9999
    pub fn load() -> Self {
        Self::load_from("config.toml")
    }

    pub fn load_from(path: &str) -> Self {
        use config::{Config, Environment, File};

        let builder = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("LL")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.trusted_proxies")
                    .with_list_parse_key("server.cors_allowed_origins")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
    /// 对外短链前缀，shortUrl = {public_base_url}/{shortCode}
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// 可信反向代理（IP 或 CIDR）
    #[serde(default)]
    pub trusted_proxies: Vec<String>,
    /// 允许跨域访问 /api 的来源（Dashboard 所在域名），"*" 表示任意
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_database_timeout")]
    pub timeout: u64,
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

/// 认证配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 签名密钥，留空则启动时随机生成（重启后旧 token 失效）
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_token_minutes")]
    pub token_minutes: u64,
}

/// 短码规则
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksConfig {
    #[serde(default = "default_code_length")]
    pub code_length: usize,
    #[serde(default = "default_max_generation_attempts")]
    pub max_generation_attempts: u32,
    #[serde(default = "default_alias_min_length")]
    pub alias_min_length: usize,
    #[serde(default = "default_alias_max_length")]
    pub alias_max_length: usize,
    #[serde(default = "default_max_expiration_days")]
    pub max_expiration_days: i64,
}

/// 点击统计配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default = "default_flush_interval_secs")]
    pub flush_interval_secs: u64,
    #[serde(default = "default_max_buffered_events")]
    pub max_buffered_events: usize,
    /// 缓冲区硬上限，超出时丢弃最旧的点击事件
    #[serde(default = "default_max_pending_events")]
    pub max_pending_events: usize,
    /// 同一批连续写入失败多少次后丢弃
    #[serde(default = "default_max_flush_failures")]
    pub max_flush_failures: u32,
    /// 点击事件保留天数，0 表示永久保留
    #[serde(default = "default_retention_days")]
    pub retention_days: u64,
    #[serde(default = "default_retention_interval_hours")]
    pub retention_interval_hours: u64,
    /// IP 哈希盐，留空则启动时随机生成
    #[serde(default)]
    pub ip_hash_salt: String,
}

// ============================================================
// Default value functions for static config
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_public_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_database_url() -> String {
    "linklytics.db".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_database_timeout() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    100
}

fn default_retry_max_delay_ms() -> u64 {
    2000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

fn default_token_minutes() -> u64 {
    24 * 60
}

fn default_code_length() -> usize {
    7
}

fn default_max_generation_attempts() -> u32 {
    5
}

fn default_alias_min_length() -> usize {
    3
}

fn default_alias_max_length() -> usize {
    32
}

fn default_max_expiration_days() -> i64 {
    3650
}

fn default_flush_interval_secs() -> u64 {
    5
}

fn default_max_buffered_events() -> usize {
    500
}

fn default_max_pending_events() -> usize {
    crate::analytics::recorder::DEFAULT_MAX_PENDING_EVENTS
}

fn default_max_flush_failures() -> u32 {
    crate::analytics::recorder::DEFAULT_MAX_FLUSH_FAILURES
}

fn default_retention_days() -> u64 {
    365
}

fn default_retention_interval_hours() -> u64 {
    24
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
            public_base_url: default_public_base_url(),
            trusted_proxies: Vec::new(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
            timeout: default_database_timeout(),
            retry_count: default_retry_count(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_minutes: default_token_minutes(),
        }
    }
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            code_length: default_code_length(),
            max_generation_attempts: default_max_generation_attempts(),
            alias_min_length: default_alias_min_length(),
            alias_max_length: default_alias_max_length(),
            max_expiration_days: default_max_expiration_days(),
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            flush_interval_secs: default_flush_interval_secs(),
            max_buffered_events: default_max_buffered_events(),
            max_pending_events: default_max_pending_events(),
            max_flush_failures: default_max_flush_failures(),
            retention_days: default_retention_days(),
            retention_interval_hours: default_retention_interval_hours(),
            ip_hash_salt: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StaticConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.links.code_length, 7);
        assert_eq!(config.links.max_generation_attempts, 5);
        assert_eq!(config.links.alias_min_length, 3);
        assert_eq!(config.links.alias_max_length, 32);
        assert_eq!(config.analytics.retention_days, 365);
        assert_eq!(config.analytics.max_pending_events, 100_000);
        assert_eq!(config.analytics.max_flush_failures, 5);
        assert!(config.auth.jwt_secret.is_empty());
    }

    #[test]
    fn test_sample_config_roundtrips_through_toml() {
        let sample = StaticConfig::generate_sample_config();
        assert!(sample.contains("[server]"));
        assert!(sample.contains("[analytics]"));

        let parsed: StaticConfig = toml::from_str(&sample).expect("sample config should parse");
        assert_eq!(parsed.links.code_length, 7);
        assert_eq!(parsed.server.public_base_url, "http://localhost:8080");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: StaticConfig = toml::from_str(
            r#"
            [links]
            code_length = 9
            "#,
        )
        .expect("partial config should parse");
        assert_eq!(parsed.links.code_length, 9);
        assert_eq!(parsed.links.max_generation_attempts, 5);
        assert_eq!(parsed.server.host, "127.0.0.1");
    }
}
