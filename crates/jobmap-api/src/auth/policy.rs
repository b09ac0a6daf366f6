//! 접근 정책 가드.
//!
//! 핸들러가 상태를 변경하기 전에 적용하는 이름 있는 인가 술어 모음.
//! 모든 가드는 요청마다 한 번 평가되는 무상태 순수 함수이며, 실패는
//! 해당 요청에 대해 종결적입니다 (재시도 없음).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use super::{Claims, Role};
use crate::error::ApiErrorResponse;

/// 관리자의 자기 자신 대상 작업 종류.
///
/// 관리자가 스스로를 잠그거나 유일한 관리자 계정을 고아로 만드는 것을
/// 막기 위해 대상이 자기 자신이면 거부됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfAction {
    /// 사용자 삭제
    DeleteUser,
    /// 계정 비활성화
    Deactivate,
    /// 역할 변경
    ChangeRole,
}

impl SelfAction {
    /// 거부 사유 메시지. 보안에 민감하지 않은 규칙이므로 그대로 노출합니다.
    pub fn message(&self) -> &'static str {
        match self {
            SelfAction::DeleteUser => "자신의 관리자 계정은 삭제할 수 없습니다",
            SelfAction::Deactivate => "자신의 계정은 비활성화할 수 없습니다",
            SelfAction::ChangeRole => "자신의 역할은 변경할 수 없습니다",
        }
    }
}

impl std::fmt::Display for SelfAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// 인가 실패.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    /// 인증 필요 (토큰 없음/무효)
    #[error("인증이 필요합니다")]
    Unauthenticated,
    /// 유효한 신원이지만 권한 부족 또는 소유자가 아님
    #[error("이 작업을 수행할 권한이 없습니다")]
    Forbidden,
    /// 자기 자신 대상 가드 작동
    #[error("{0}")]
    SelfTargeted(SelfAction),
}

impl PolicyError {
    pub fn status(&self) -> StatusCode {
        match self {
            PolicyError::Unauthenticated => StatusCode::UNAUTHORIZED,
            PolicyError::Forbidden => StatusCode::FORBIDDEN,
            PolicyError::SelfTargeted(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            PolicyError::Unauthenticated => "UNAUTHENTICATED",
            PolicyError::Forbidden => "FORBIDDEN",
            PolicyError::SelfTargeted(_) => "SELF_TARGET",
        }
    }
}

impl IntoResponse for PolicyError {
    fn into_response(self) -> Response {
        let body = Json(ApiErrorResponse::simple(self.code(), self.to_string()));
        (self.status(), body).into_response()
    }
}

/// 인증된 주체를 요구합니다.
pub fn require_authenticated(principal: Option<&Claims>) -> Result<&Claims, PolicyError> {
    principal.ok_or(PolicyError::Unauthenticated)
}

/// 관리자 역할을 요구합니다.
pub fn require_admin(claims: &Claims) -> Result<(), PolicyError> {
    if claims.has_role(Role::Admin) {
        Ok(())
    } else {
        Err(PolicyError::Forbidden)
    }
}

/// 조회 접근: 공개 리소스는 누구나, 비공개 리소스는 소유자만.
pub fn require_owner_or_public(
    principal: Option<&Claims>,
    owner_id: Uuid,
    is_public: bool,
) -> Result<(), PolicyError> {
    if is_public {
        return Ok(());
    }
    match principal {
        None => Err(PolicyError::Unauthenticated),
        Some(claims) if claims.sub == owner_id => Ok(()),
        Some(_) => Err(PolicyError::Forbidden),
    }
}

/// 변경 접근: 리소스 소유자만.
pub fn require_owner(claims: &Claims, owner_id: Uuid) -> Result<(), PolicyError> {
    if claims.sub == owner_id {
        Ok(())
    } else {
        Err(PolicyError::Forbidden)
    }
}

/// 자기 자신 대상 작업을 거부합니다.
///
/// 핸들러마다 id 동등성 검사를 다시 구현하지 않도록 이 가드 하나로
/// 통합되어 있습니다.
pub fn forbid_self_target(
    claims: &Claims,
    target_id: Uuid,
    action: SelfAction,
) -> Result<(), PolicyError> {
    if claims.sub == target_id {
        Err(PolicyError::SelfTargeted(action))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::TOKEN_TTL_DAYS;

    fn claims(role: Role) -> Claims {
        Claims::new(Uuid::new_v4(), "user@x.com", role, TOKEN_TTL_DAYS)
    }

    #[test]
    fn test_require_authenticated() {
        let c = claims(Role::User);
        assert!(require_authenticated(Some(&c)).is_ok());
        assert_eq!(
            require_authenticated(None).unwrap_err(),
            PolicyError::Unauthenticated
        );
    }

    #[test]
    fn test_require_admin() {
        assert!(require_admin(&claims(Role::Admin)).is_ok());
        assert_eq!(
            require_admin(&claims(Role::User)).unwrap_err(),
            PolicyError::Forbidden
        );
    }

    #[test]
    fn test_owner_or_public_truth_table() {
        let owner = claims(Role::User);
        let other = claims(Role::User);
        let owner_id = owner.sub;

        // 공개 리소스는 주체와 무관하게 허용
        assert!(require_owner_or_public(None, owner_id, true).is_ok());
        assert!(require_owner_or_public(Some(&other), owner_id, true).is_ok());

        // 비공개 리소스는 소유자만
        assert!(require_owner_or_public(Some(&owner), owner_id, false).is_ok());
        assert_eq!(
            require_owner_or_public(Some(&other), owner_id, false).unwrap_err(),
            PolicyError::Forbidden
        );
        assert_eq!(
            require_owner_or_public(None, owner_id, false).unwrap_err(),
            PolicyError::Unauthenticated
        );
    }

    #[test]
    fn test_require_owner() {
        let owner = claims(Role::User);
        let other = claims(Role::User);

        assert!(require_owner(&owner, owner.sub).is_ok());
        assert_eq!(
            require_owner(&other, owner.sub).unwrap_err(),
            PolicyError::Forbidden
        );
    }

    #[test]
    fn test_forbid_self_target_matrix() {
        let admin = claims(Role::Admin);
        let other_id = Uuid::new_v4();

        for action in [
            SelfAction::DeleteUser,
            SelfAction::Deactivate,
            SelfAction::ChangeRole,
        ] {
            // 자기 자신 대상은 거부
            assert_eq!(
                forbid_self_target(&admin, admin.sub, action).unwrap_err(),
                PolicyError::SelfTargeted(action)
            );
            // 다른 대상은 허용
            assert!(forbid_self_target(&admin, other_id, action).is_ok());
        }
    }

    #[test]
    fn test_policy_error_status_codes() {
        assert_eq!(
            PolicyError::Unauthenticated.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(PolicyError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            PolicyError::SelfTargeted(SelfAction::ChangeRole).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
