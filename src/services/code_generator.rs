//! 短码生成与自定义别名校验

use crate::errors::{LinklyticsError, Result};
use crate::utils::generate_random_code;

/// 与路由冲突的保留短码（不区分大小写）
pub const RESERVED_CODES: &[&str] = &["api", "health"];

/// 短码来源，唯一性由存储层的唯一索引保证
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Base62 随机短码
#[derive(Debug, Clone, Copy)]
pub struct RandomCodeGenerator {
    length: usize,
}

impl RandomCodeGenerator {
    pub fn new(length: usize) -> Self {
        Self {
            length: length.max(1),
        }
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        generate_random_code(self.length)
    }
}

pub fn is_reserved_code(code: &str) -> bool {
    RESERVED_CODES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(code))
}

/// 校验用户指定的别名：仅字母数字，长度在 [min, max] 内，且不是保留字
pub fn validate_custom_alias(alias: &str, min_len: usize, max_len: usize) -> Result<()> {
    if !alias.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(LinklyticsError::validation(
            "customAlias may only contain letters and digits",
        ));
    }
    if alias.len() < min_len || alias.len() > max_len {
        return Err(LinklyticsError::validation(format!(
            "customAlias must be between {} and {} characters",
            min_len, max_len
        )));
    }
    if is_reserved_code(alias) {
        return Err(LinklyticsError::validation(format!(
            "customAlias '{}' is reserved",
            alias
        )));
    }
    Ok(())
}
