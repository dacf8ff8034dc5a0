pub mod ip;
pub mod password;
pub mod url_validator;

/// Base62 字母表
pub const BASE62_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// 短码最大长度（与 links.short_code 列宽一致）
pub const MAX_SHORT_CODE_LENGTH: usize = 64;

pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    iter::repeat_with(|| BASE62_ALPHABET[rand::random_range(0..BASE62_ALPHABET.len())] as char)
        .take(length)
        .collect()
}

/// 短码格式检查：非空、仅 ASCII 字母数字、不超过最大长度
///
/// 重定向入口用它在访问存储前拒绝畸形路径
#[inline]
pub fn is_valid_short_code(code: &str) -> bool {
    !code.is_empty()
        && code.len() <= MAX_SHORT_CODE_LENGTH
        && code.bytes().all(|b| b.is_ascii_alphanumeric())
}
