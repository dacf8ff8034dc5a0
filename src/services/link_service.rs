//! Link management service
//!
//! 创建、列表、归属校验与短码解析。

use std::sync::Arc;

use chrono::{Duration, SubsecRound, Utc};
use tracing::{debug, info, warn};

use super::code_generator::{CodeGenerator, RandomCodeGenerator, validate_custom_alias};
use crate::analytics::ClickRecorder;
use crate::errors::{LinklyticsError, Result};
use crate::storage::{Link, LinkWithClicks, SeaOrmStorage};
use crate::utils::is_valid_short_code;
use crate::utils::url_validator::validate_url;

/// 创建短链请求
#[derive(Debug, Clone, Default)]
pub struct CreateLinkRequest {
    pub original_url: String,
    /// 为空或 None 时随机生成
    pub custom_alias: Option<String>,
    /// 0 表示立即过期
    pub expiration_days: Option<i64>,
}

/// 短码解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Active(Link),
    Expired(Link),
    NotFound,
}

#[derive(Debug, Clone)]
pub struct LinkSettings {
    pub max_generation_attempts: u32,
    pub alias_min_length: usize,
    pub alias_max_length: usize,
    pub max_expiration_days: i64,
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            max_generation_attempts: 5,
            alias_min_length: 3,
            alias_max_length: 32,
            max_expiration_days: 3650,
        }
    }
}

impl LinkSettings {
    pub fn from_config() -> Self {
        let links = &crate::config::get_config().links;
        Self {
            max_generation_attempts: links.max_generation_attempts.max(1),
            alias_min_length: links.alias_min_length,
            alias_max_length: links.alias_max_length,
            max_expiration_days: links.max_expiration_days,
        }
    }
}

pub struct LinkService {
    storage: Arc<SeaOrmStorage>,
    generator: Arc<dyn CodeGenerator>,
    settings: LinkSettings,
    recorder: Option<Arc<ClickRecorder>>,
}

impl LinkService {
    pub fn new(
        storage: Arc<SeaOrmStorage>,
        generator: Arc<dyn CodeGenerator>,
        settings: LinkSettings,
    ) -> Self {
        Self {
            storage,
            generator,
            settings,
            recorder: None,
        }
    }

    pub fn from_config(storage: Arc<SeaOrmStorage>) -> Self {
        let code_length = crate::config::get_config().links.code_length;
        Self::new(
            storage,
            Arc::new(RandomCodeGenerator::new(code_length)),
            LinkSettings::from_config(),
        )
    }

    /// 列表前先刷盘，保证点击数包含已缓冲的事件
    pub fn with_recorder(mut self, recorder: Arc<ClickRecorder>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    fn expiration_from_days(
        &self,
        created_at: chrono::DateTime<Utc>,
        days: Option<i64>,
    ) -> Result<Option<chrono::DateTime<Utc>>> {
        let Some(days) = days else {
            return Ok(None);
        };

        if days < 0 || days > self.settings.max_expiration_days {
            return Err(LinklyticsError::validation(format!(
                "expirationDays must be between 0 and {}",
                self.settings.max_expiration_days
            )));
        }

        // expiresAt 必须严格晚于 createdAt，0 天取最小时间粒度
        let expires_at = if days == 0 {
            created_at + Duration::microseconds(1)
        } else {
            created_at + Duration::days(days)
        };
        Ok(Some(expires_at))
    }

    pub async fn create_link(&self, owner_id: &str, req: CreateLinkRequest) -> Result<Link> {
        validate_url(&req.original_url)?;

        // 数据库时间精度为微秒
        let created_at = Utc::now().trunc_subsecs(6);
        let expires_at = self.expiration_from_days(created_at, req.expiration_days)?;

        let mut link = Link {
            id: uuid::Uuid::new_v4().to_string(),
            short_code: String::new(),
            original_url: req.original_url.trim().to_string(),
            owner_id: owner_id.to_string(),
            created_at,
            expires_at,
        };

        let alias = req
            .custom_alias
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());

        if let Some(alias) = alias {
            validate_custom_alias(
                &alias,
                self.settings.alias_min_length,
                self.settings.alias_max_length,
            )?;
            link.short_code = alias;
            self.storage.insert_link(&link).await?;
        } else {
            self.insert_with_generated_code(&mut link).await?;
        }

        info!(
            "LinkService: created link '{}' -> '{}' (owner {})",
            link.short_code, link.original_url, link.owner_id
        );
        Ok(link)
    }

    async fn insert_with_generated_code(&self, link: &mut Link) -> Result<()> {
        let attempts = self.settings.max_generation_attempts.max(1);

        for attempt in 1..=attempts {
            link.short_code = self.generator.generate();
            match self.storage.insert_link(link).await {
                Ok(()) => return Ok(()),
                Err(LinklyticsError::AliasTaken(_)) => {
                    debug!(
                        "Generated code '{}' collided (attempt {}/{})",
                        link.short_code, attempt, attempts
                    );
                }
                Err(e) => return Err(e),
            }
        }

        warn!("Short code generation exhausted after {} attempts", attempts);
        Err(LinklyticsError::generation_exhausted(format!(
            "Could not generate a unique short code after {} attempts",
            attempts
        )))
    }

    /// 当前用户的链接（新建在前）及点击数
    pub async fn list_links(&self, owner_id: &str) -> Result<Vec<LinkWithClicks>> {
        if let Some(recorder) = &self.recorder {
            recorder.flush().await;
        }

        let links = self.storage.list_links_by_owner(owner_id).await?;
        let ids: Vec<String> = links.iter().map(|l| l.id.clone()).collect();
        let counts = self.storage.count_clicks_by_links(&ids).await?;

        Ok(links
            .into_iter()
            .map(|link| {
                let total_clicks = counts.get(&link.id).copied().unwrap_or(0);
                LinkWithClicks { link, total_clicks }
            })
            .collect())
    }

    pub async fn total_clicks(&self, link_id: &str) -> Result<u64> {
        let counts = self
            .storage
            .count_clicks_by_links(&[link_id.to_string()])
            .await?;
        Ok(counts.get(link_id).copied().unwrap_or(0))
    }

    /// 他人的链接与不存在的链接一样返回 NotFound
    pub async fn get_owned_link(&self, owner_id: &str, link_id: &str) -> Result<Link> {
        self.storage
            .find_link_by_id(link_id)
            .await?
            .filter(|link| link.owner_id == owner_id)
            .ok_or_else(|| LinklyticsError::not_found("Link not found"))
    }

    /// 解析短码；格式非法的短码不访问存储
    pub async fn resolve(&self, code: &str) -> Result<Resolution> {
        if !is_valid_short_code(code) {
            return Ok(Resolution::NotFound);
        }

        Ok(match self.storage.find_link_by_code(code).await? {
            None => Resolution::NotFound,
            Some(link) if link.is_expired() => Resolution::Expired(link),
            Some(link) => Resolution::Active(link),
        })
    }
}
