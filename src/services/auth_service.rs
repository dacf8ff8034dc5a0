//! Dashboard 用户：登录校验与账号管理

use std::sync::Arc;

use chrono::{SubsecRound, Utc};
use tracing::{info, warn};

use crate::errors::{LinklyticsError, Result};
use crate::storage::{SeaOrmStorage, User};
use crate::utils::password::{
    MIN_PASSWORD_LENGTH, hash_password, verify_against_dummy, verify_password,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_email(email: &str) -> Result<()> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(LinklyticsError::validation("A valid email address is required")),
    }
}

fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(LinklyticsError::validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

pub struct AuthService {
    storage: Arc<SeaOrmStorage>,
}

impl AuthService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// 校验邮箱与密码，失败时不区分“用户不存在”和“密码错误”
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(LinklyticsError::validation("email and password are required"));
        }

        let Some(user) = self.storage.find_user_by_email(&email).await? else {
            verify_against_dummy(password);
            warn!("Login failed: unknown user");
            return Err(LinklyticsError::auth(INVALID_CREDENTIALS));
        };

        if !verify_password(password, &user.password_hash)? {
            warn!("Login failed: wrong password for user {}", user.id);
            return Err(LinklyticsError::auth(INVALID_CREDENTIALS));
        }

        info!("User {} logged in", user.id);
        Ok(user)
    }

    pub async fn create_user(&self, email: &str, password: &str) -> Result<User> {
        let email = normalize_email(email);
        validate_email(&email)?;
        validate_password(password)?;

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            email,
            password_hash: hash_password(password)?,
            created_at: Utc::now().trunc_subsecs(6),
        };
        self.storage.insert_user(&user).await?;

        info!("User created: {} ({})", user.email, user.id);
        Ok(user)
    }

    pub async fn set_password(&self, email: &str, password: &str) -> Result<()> {
        validate_password(password)?;
        let email = normalize_email(email);

        let user = self
            .storage
            .find_user_by_email(&email)
            .await?
            .ok_or_else(|| LinklyticsError::not_found(format!("User '{}' not found", email)))?;

        self.storage
            .update_user_password(&user.id, &hash_password(password)?)
            .await?;

        info!("Password updated for {}", user.email);
        Ok(())
    }
}
