//! 역할 기반 접근 제어 (RBAC).
//!
//! 사용자 역할 정의. 저장소와 토큰의 와이어 형식은 `"USER"` / `"ADMIN"`입니다.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 사용자 역할.
///
/// 시스템에서 사용자의 권한 수준을 정의합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// 일반 사용자 - 자신의 리소스 관리 권한
    User,
    /// 관리자 - 사용자 관리 권한 포함 모든 권한
    Admin,
}

impl Role {
    /// 역할의 우선순위 레벨 반환 (높을수록 더 많은 권한).
    pub fn level(&self) -> u8 {
        match self {
            Role::Admin => 100,
            Role::User => 10,
        }
    }

    /// 문자열에서 역할 파싱.
    ///
    /// 저장소에서 읽은 알 수 없는 역할 문자열은 호출자가 `User`로 처리합니다.
    /// 파싱 실패로 관리자 권한이 부여되는 일은 없습니다.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "USER" => Some(Role::User),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_level() {
        assert!(Role::Admin.level() > Role::User.level());
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse("User"), Some(Role::User));
        assert_eq!(Role::parse("superuser"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn test_role_display_matches_wire_form() {
        assert_eq!(Role::Admin.to_string(), "ADMIN");
        assert_eq!(Role::User.to_string(), "USER");
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&Role::Admin).unwrap();
        assert_eq!(json, "\"ADMIN\"");

        let parsed: Role = serde_json::from_str("\"USER\"").unwrap();
        assert_eq!(parsed, Role::User);
    }
}
