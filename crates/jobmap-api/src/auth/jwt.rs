//! 토큰 발급 및 검증.
//!
//! HMAC-SHA256으로 서명된 시간 제한 신원 토큰을 다룹니다. 발급자와
//! 검증자가 같은 배포 단위이므로 대칭 서명으로 충분합니다. 토큰에는
//! 철회 메커니즘이 없습니다. 유효성은 서명과 만료만의 함수입니다.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Role;

/// 토큰 수명 (일). 고정이며, 재로그인 없이는 갱신되지 않습니다.
pub const TOKEN_TTL_DAYS: i64 = 7;

/// 토큰 페이로드.
///
/// 검증을 통과하면 세 신원 필드(`sub`, `email`, `role`)는 발급 시점
/// 기준으로 진본입니다. 검증 이후 저장소를 다시 조회하지 않으므로
/// 역할 변경이나 비활성화는 토큰이 자연 만료될 때 반영됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - 사용자 ID
    pub sub: Uuid,
    /// 사용자 이메일
    pub email: String,
    /// 사용자 역할
    pub role: Role,
    /// Issued At - 토큰 발급 시간 (Unix timestamp)
    pub iat: i64,
    /// Expiration - 토큰 만료 시간 (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// 새로운 Claims 생성.
    ///
    /// # Arguments
    ///
    /// * `user_id` - 사용자 ID
    /// * `email` - 사용자 이메일
    /// * `role` - 사용자 역할
    /// * `ttl_days` - 만료 시간 (일)
    pub fn new(user_id: Uuid, email: impl Into<String>, role: Role, ttl_days: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            email: email.into(),
            role,
            iat: now.timestamp(),
            exp: (now + Duration::days(ttl_days)).timestamp(),
        }
    }

    /// 토큰이 만료되었는지 확인.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// 특정 역할 이상인지 확인.
    pub fn has_role(&self, required_role: Role) -> bool {
        self.role.level() >= required_role.level()
    }
}

/// 토큰 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("토큰 인코딩 실패: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),
    #[error("토큰 디코딩 실패")]
    DecodingError,
    #[error("토큰이 만료되었습니다")]
    TokenExpired,
    #[error("잘못된 토큰 형식")]
    InvalidToken,
}

/// 토큰 생성.
///
/// # Arguments
///
/// * `claims` - 토큰 페이로드
/// * `secret` - 서명 시크릿
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(JwtError::from)
}

/// 토큰 디코딩 및 검증.
///
/// 닫힌 실패(fail closed): 구조 손상, 서명 불일치, 만료 모두 에러를
/// 반환하며 부분적으로 신뢰된 페이로드를 내보내지 않습니다. 호출자는
/// 모든 실패를 "익명"으로 취급합니다.
///
/// # Arguments
///
/// * `token` - 토큰 문자열
/// * `secret` - 서명 시크릿
pub fn decode_token(token: &str, secret: &str) -> Result<TokenData<Claims>, JwtError> {
    let mut validation = Validation::default();
    validation.validate_exp = true;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
        jsonwebtoken::errors::ErrorKind::InvalidToken => JwtError::InvalidToken,
        _ => JwtError::DecodingError,
    })
}
