//! JWT Token处理模块

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::AuthError;
use crate::shared::constants::jwt::{DEFAULT_TOKEN_EXPIRY_HOURS, TOKEN_ISSUER};

/// JWT Claims结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,          // 管理员ID
    pub username: String,     // 用户名
    pub is_super_admin: bool, // 超级管理员标记
    pub exp: i64,             // 过期时间
    pub iat: i64,             // 签发时间
    pub iss: String,          // 签发者
}

/// JWT Token服务
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    expiry_hours: i64,
}

impl JwtService {
    /// 创建新的JWT服务
    pub fn new(secret: &str) -> Self {
        Self::new_with_expiry(secret, DEFAULT_TOKEN_EXPIRY_HOURS)
    }

    /// 创建带自定义过期时间的JWT服务
    pub fn new_with_expiry(secret: &str, expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer: TOKEN_ISSUER.to_string(),
            expiry_hours,
        }
    }

    /// 生成JWT Token
    pub fn generate_token(
        &self,
        admin_id: i64,
        username: &str,
        is_super_admin: bool,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + Duration::hours(self.expiry_hours);

        let claims = Claims {
            sub: admin_id.to_string(),
            username: username.to_string(),
            is_super_admin,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::AuthenticationFailed(format!("Token生成失败: {}", e)))
    }

    /// 验证JWT Token
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::default();

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_and_verify() {
        let service = JwtService::new("test-secret");
        let token = service.generate_token(7, "root", true).unwrap();
        let claims = service.verify_token(&token).unwrap();

        assert_eq!(claims.sub, "7");
        assert_eq!(claims.username, "root");
        assert!(claims.is_super_admin);
        assert_eq!(claims.iss, TOKEN_ISSUER);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let service = JwtService::new("secret-a");
        let token = service.generate_token(1, "admin", false).unwrap();

        let other = JwtService::new("secret-b");
        assert!(other.verify_token(&token).is_err());
    }
}
