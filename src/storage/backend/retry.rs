//! 数据库错误分类与重试
//!
//! 连接类、锁冲突类错误按指数退避重试；唯一约束冲突单独识别，
//! 交给上层转换为业务错误（短码占用、邮箱重复）。

use std::future::Future;
use std::time::Duration;

use sea_orm::{DbErr, SqlErr};
use tokio::time::sleep;
use tracing::{debug, warn};

/// 数据库错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbErrorKind {
    /// 连接获取失败、死锁、SQLite BUSY 等，可重试
    Retryable,
    /// 唯一约束冲突
    UniqueViolation,
    Other,
}

pub fn classify_db_error(err: &DbErr) -> DbErrorKind {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        return DbErrorKind::UniqueViolation;
    }

    let retryable = match err {
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => true,
        DbErr::Exec(runtime_err) | DbErr::Query(runtime_err) => {
            is_retryable_runtime_error(runtime_err)
        }
        _ => false,
    };

    if retryable {
        DbErrorKind::Retryable
    } else {
        DbErrorKind::Other
    }
}

pub fn is_retryable_error(err: &DbErr) -> bool {
    classify_db_error(err) == DbErrorKind::Retryable
}

pub fn is_unique_violation(err: &DbErr) -> bool {
    classify_db_error(err) == DbErrorKind::UniqueViolation
}

fn is_retryable_runtime_error(err: &sea_orm::error::RuntimeErr) -> bool {
    use sea_orm::error::RuntimeErr;

    match err {
        RuntimeErr::SqlxError(sqlx_err) => {
            use std::ops::Deref;
            if let Some(code) = sqlx_err
                .deref()
                .as_database_error()
                .and_then(|db_err| db_err.code())
            {
                return matches!(
                    code.as_ref(),
                    // MySQL: 死锁 / 锁等待超时
                    "1213" | "1205"
                    // PostgreSQL: 序列化失败 / 死锁
                    | "40001" | "40P01"
                    // SQLite: BUSY / LOCKED
                    | "5" | "6"
                );
            }
            is_retryable_message(&sqlx_err.to_string().to_lowercase())
        }
        RuntimeErr::Internal(msg) => is_retryable_message(&msg.to_lowercase()),
        #[allow(unreachable_patterns)]
        _ => false,
    }
}

fn is_retryable_message(msg: &str) -> bool {
    msg.contains("deadlock")
        || msg.contains("lock wait timeout")
        || msg.contains("database is locked")
        || msg.contains("serialization failure")
}

/// 重试配置
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 100,
            max_delay_ms: 2000,
        }
    }
}

impl RetryConfig {
    pub fn from_config() -> Self {
        let db = &crate::config::get_config().database;
        Self {
            max_retries: db.retry_count,
            base_delay_ms: db.retry_base_delay_ms,
            max_delay_ms: db.retry_max_delay_ms,
        }
    }
}

/// 对可重试错误做指数退避重试，其余错误直接返回
pub async fn with_retry<T, F, Fut>(
    operation_name: &str,
    config: RetryConfig,
    mut operation: F,
) -> Result<T, DbErr>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbErr>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!("'{}' succeeded after {} retries", operation_name, attempt);
                }
                return Ok(value);
            }
            Err(e) if is_retryable_error(&e) && attempt < config.max_retries => {
                attempt += 1;
                let delay = calculate_backoff(attempt, config.base_delay_ms, config.max_delay_ms);
                warn!(
                    "'{}' failed (attempt {}/{}): {}; retrying in {} ms",
                    operation_name,
                    attempt,
                    config.max_retries + 1,
                    e,
                    delay
                );
                sleep(Duration::from_millis(delay)).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// 指数退避 + 0-25% 抖动
fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> u64 {
    let exp_delay = base_ms.saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)));
    let capped = exp_delay.min(max_ms);
    capped.saturating_add(rand::random_range(0..=capped / 4))
}
