//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.
//!
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ApiErrorResponse;
use crate::repository::{AdminUserRecord, CommentRecord, CompanyRecord};
use crate::routes::{
    AdminStats, AdminUsersResponse, AuthResponse, AuthUser, CommentsListResponse,
    CompaniesListResponse, ComponentHealth, ComponentStatus, HealthResponse, LoginRequest,
    MeResponse, RegisterRequest, SuccessResponse,
};

/// JobMap API 문서.
///
/// 어노테이션된 엔드포인트와 스키마를 포함하는 OpenAPI 3.0 스펙입니다.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "JobMap API",
        version = "0.1.0",
        description = r#"
# JobMap 구직 지도 트래커 REST API

지도 기반 구직 지원 추적, 계정/토큰 인증, 회사별 토론, 관리자 패널 API입니다.

## 인증

보호된 엔드포인트는 `Authorization: Bearer <token>` 헤더를 요구합니다.
토큰은 로그인/가입 시 발급되며 7일 후 만료됩니다.
"#
    ),
    paths(
        crate::routes::health::health_check,
        crate::routes::health::health_ready,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::me,
        crate::routes::companies::list_companies,
        crate::routes::admin::list_users,
    ),
    components(schemas(
        ApiErrorResponse,
        AuthResponse,
        AuthUser,
        RegisterRequest,
        LoginRequest,
        MeResponse,
        CompaniesListResponse,
        CompanyRecord,
        CommentsListResponse,
        CommentRecord,
        SuccessResponse,
        AdminUsersResponse,
        AdminStats,
        AdminUserRecord,
        HealthResponse,
        ComponentHealth,
        ComponentStatus,
    )),
    tags(
        (name = "health", description = "헬스 체크"),
        (name = "auth", description = "계정 및 토큰"),
        (name = "companies", description = "회사 추적 항목"),
        (name = "admin", description = "관리자 사용자 관리")
    )
)]
pub struct ApiDoc;

/// Swagger UI 라우터 생성.
///
/// `/swagger-ui`에서 UI를, `/api-docs/openapi.json`에서 스펙을 제공합니다.
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_valid() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&spec).unwrap();

        // 기본 정보 확인
        assert!(json.contains("JobMap API"));

        // 태그 확인
        assert!(json.contains("health"));
        assert!(json.contains("auth"));
        assert!(json.contains("admin"));

        // 경로 확인
        assert!(json.contains("/health"));
        assert!(json.contains("/health/ready"));
        assert!(json.contains("/api/v1/auth/login"));
        assert!(json.contains("/api/v1/companies"));
        assert!(json.contains("/api/v1/admin/users"));
    }

    #[test]
    fn test_swagger_ui_router_creates() {
        let _router: Router<()> = swagger_ui_router();
    }

    #[test]
    fn test_openapi_contains_schemas() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string(&spec).unwrap();

        assert!(json.contains("AuthResponse"));
        assert!(json.contains("CompanyRecord"));
        assert!(json.contains("AdminUsersResponse"));
        assert!(json.contains("ApiErrorResponse"));
    }
}
