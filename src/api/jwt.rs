use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::storage::User;

const ACCESS_TOKEN_TYPE: &str = "access";

/// Access Token Claims
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    /// 用户 id
    pub sub: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
    pub token_type: String,
}

/// Dashboard bearer token 的签发与校验（HS256）
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_minutes: u64,
}

impl JwtService {
    pub fn new(secret: &str, token_minutes: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_minutes: token_minutes.max(1),
        }
    }

    /// 未配置 jwt_secret 时随机生成，进程重启后已签发的 token 全部失效
    pub fn from_config() -> Self {
        let auth = &crate::config::get_config().auth;
        let secret = if auth.jwt_secret.is_empty() {
            warn!("auth.jwt_secret is empty, generating a random per-process secret");
            crate::utils::generate_random_code(48)
        } else {
            auth.jwt_secret.clone()
        };
        Self::new(&secret, auth.token_minutes)
    }

    pub fn generate_token(&self, user: &User) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: user.id.clone(),
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(self.token_minutes as i64)).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    pub fn validate_token(&self, token: &str) -> Result<AccessClaims, jsonwebtoken::errors::Error> {
        let token_data = decode::<AccessClaims>(token, &self.decoding_key, &Validation::default())?;

        if token_data.claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }

        Ok(token_data.claims)
    }
}
