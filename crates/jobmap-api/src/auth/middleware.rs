//! Axum용 신원 확인 추출기.
//!
//! 요청의 `Authorization` 헤더에서 베어러 토큰을 추출하고 검증하여
//! 타입이 있는 주체(Claims)를 만듭니다. 저장소는 조회하지 않습니다.
//! 주체는 요청마다 새로 만들어지고 응답 후 버려집니다.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use jobmap_core::config::AuthConfig;

use super::policy::require_admin;
use super::{decode_token, Claims};
use crate::error::ApiErrorResponse;

/// Authorization 헤더 값에서 베어러 토큰을 추출합니다.
///
/// 정확히 `"Bearer <token>"` 형태만 인정합니다. 다른 스킴(`Basic ...`)이나
/// 맨 토큰은 토큰 검증을 호출하지 않고 `None`으로 처리됩니다.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    header_value.strip_prefix("Bearer ")
}

/// 신원 확인 에러.
///
/// 만료와 형식 손상은 클라이언트가 구분할 수 없도록 하나의
/// `InvalidToken`으로 합쳐집니다.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("인증 토큰이 필요합니다")]
    MissingToken,
    #[error("잘못된 Authorization 헤더 형식")]
    InvalidAuthHeader,
    #[error("유효하지 않거나 만료된 토큰입니다")]
    InvalidToken,
    #[error("권한이 부족합니다")]
    InsufficientPermission,
    #[error("서버 인증 설정 오류")]
    Misconfigured,
}

impl AuthError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "MISSING_TOKEN"),
            AuthError::InvalidAuthHeader => (StatusCode::UNAUTHORIZED, "INVALID_AUTH_HEADER"),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
            AuthError::InsufficientPermission => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            AuthError::Misconfigured => (StatusCode::INTERNAL_SERVER_ERROR, "AUTH_MISCONFIGURED"),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = Json(ApiErrorResponse::simple(code, self.to_string()));
        (status, body).into_response()
    }
}

/// 인증 추출기.
///
/// 핸들러에서 인증된 주체를 요구합니다. 토큰이 없거나 유효하지 않으면
/// 401로 거부됩니다.
///
/// # 사용 예시
///
/// ```rust,ignore
/// async fn protected_handler(
///     JwtAuth(claims): JwtAuth,
/// ) -> impl IntoResponse {
///     format!("Authenticated user: {}", claims.email)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct JwtAuth(pub Claims);

impl<S> FromRequestParts<S> for JwtAuth
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(AuthError::MissingToken)?;

        let token = bearer_token(auth_header).ok_or(AuthError::InvalidAuthHeader)?;

        // 서명 시크릿은 프로세스 시작 시 검증되어 요청 확장으로 주입됩니다.
        // 하드코딩된 기본값은 없습니다.
        let auth_config = parts
            .extensions
            .get::<AuthConfig>()
            .cloned()
            .ok_or(AuthError::Misconfigured)?;

        // 만료/서명 불일치/구조 손상은 모두 같은 거부로 수렴합니다
        let token_data =
            decode_token(token, &auth_config.secret).map_err(|_| AuthError::InvalidToken)?;

        Ok(JwtAuth(token_data.claims))
    }
}

/// 선택적 인증 추출기.
///
/// 토큰이 있으면 검증하고, 없거나 유효하지 않으면 `None`(익명)을
/// 반환합니다. 공개 데이터와 소유 데이터를 함께 제공하는 조회
/// 엔드포인트에서 사용합니다.
#[derive(Debug, Clone)]
pub struct OptionalJwtAuth(pub Option<Claims>);

impl<S> FromRequestParts<S> for OptionalJwtAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match JwtAuth::from_request_parts(parts, state).await {
            Ok(JwtAuth(claims)) => Ok(OptionalJwtAuth(Some(claims))),
            Err(_) => Ok(OptionalJwtAuth(None)),
        }
    }
}

/// 관리자 권한을 요구하는 추출기.
///
/// 인증 실패는 401, 유효한 신원이지만 관리자가 아니면 403입니다.
#[derive(Debug, Clone)]
pub struct AdminAuth(pub Claims);

impl<S> FromRequestParts<S> for AdminAuth
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let JwtAuth(claims) = JwtAuth::from_request_parts(parts, state).await?;
        require_admin(&claims).map_err(|_| AuthError::InsufficientPermission)?;
        Ok(AdminAuth(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::TOKEN_TTL_DAYS;
    use crate::auth::Role;
    use uuid::Uuid;

    #[test]
    fn test_bearer_token_shapes() {
        // 정확한 형태만 인정
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));

        // 빈 토큰은 추출되지만 이후 디코딩 단계에서 거부됨
        assert_eq!(bearer_token("Bearer "), Some(""));

        assert_eq!(bearer_token("Basic xyz"), None);
        assert_eq!(bearer_token("bearer abc"), None);
        assert_eq!(bearer_token("abc.def.ghi"), None);
        assert_eq!(bearer_token(""), None);
    }

    #[test]
    fn test_empty_bearer_token_never_verifies() {
        let token = bearer_token("Bearer ").unwrap();
        let result = decode_token(token, "test-secret-key-for-jwt-testing-minimum-32-chars");
        assert!(result.is_err());
    }

    #[test]
    fn test_auth_error_status_codes() {
        use axum::http::StatusCode;

        assert_eq!(
            AuthError::MissingToken.status_and_code().0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::InvalidToken.status_and_code().0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::InsufficientPermission.status_and_code().0,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthError::Misconfigured.status_and_code().0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_admin_check_uses_role_level() {
        let admin = Claims::new(Uuid::new_v4(), "a@x.com", Role::Admin, TOKEN_TTL_DAYS);
        let user = Claims::new(Uuid::new_v4(), "u@x.com", Role::User, TOKEN_TTL_DAYS);

        assert!(admin.has_role(Role::Admin));
        assert!(!user.has_role(Role::Admin));
    }
}
