//! 密码处理模块

use bcrypt::{hash, verify, DEFAULT_COST};
use super::AuthError;

/// 哈希密码
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AuthError::AuthenticationFailed(format!("密码哈希失败: {}", e)))
}

/// 验证密码
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    verify(password, hash)
        .map_err(|e| AuthError::AuthenticationFailed(format!("密码验证失败: {}", e)))
}

/// 生成随机初始密码（重置密码时下发）
pub fn generate_initial_password() -> String {
    use rand::{distributions::Alphanumeric, Rng};

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed = hash_password("admin123456").unwrap();
        assert!(verify_password("admin123456", &hashed).unwrap());
        assert!(!verify_password("wrong", &hashed).unwrap());
    }

    #[test]
    fn test_generate_initial_password() {
        let first = generate_initial_password();
        let second = generate_initial_password();
        assert_eq!(first.len(), 16);
        assert_ne!(first, second);
    }
}
