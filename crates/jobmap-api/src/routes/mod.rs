//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/api/v1/auth` - 가입/로그인/현재 사용자
//! - `/api/v1/companies` - 회사 추적 항목 + 회사별 댓글
//! - `/api/v1/admin` - 관리자 사용자 관리

pub mod admin;
pub mod auth;
pub mod comments;
pub mod companies;
pub mod health;

pub use admin::{admin_router, AdminStats, AdminUpdateUserRequest, AdminUsersResponse};
pub use auth::{auth_router, AuthResponse, AuthUser, LoginRequest, MeResponse, RegisterRequest};
pub use comments::{comments_router, CommentsListResponse, CreateCommentRequest};
pub use companies::{
    companies_router, CompaniesListResponse, CreateCompanyRequest, SuccessResponse,
    UpdateCompanyRequest,
};
pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
///
/// 모든 서브 라우터를 조합하여 하나의 라우터로 반환합니다.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        // 헬스 체크 엔드포인트
        .nest("/health", health_router())
        // API v1 엔드포인트
        .nest("/api/v1/auth", auth_router())
        .nest(
            "/api/v1/companies",
            companies_router().merge(comments_router()),
        )
        .nest("/api/v1/admin", admin_router())
}
