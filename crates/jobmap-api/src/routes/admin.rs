//! 관리자 패널 API 라우트.
//!
//! 모든 엔드포인트는 [`AdminAuth`] 추출기로 보호됩니다 (익명 401,
//! 관리자 아님 403). 자기 자신 대상 작업(삭제/비활성화/역할 변경)은
//! `forbid_self_target` 가드 하나로 차단됩니다.
//!
//! # 엔드포인트
//!
//! - `GET /api/v1/admin/users` - 사용자 목록 + 요약 통계
//! - `GET /api/v1/admin/users/{id}` - 사용자 상세
//! - `PATCH /api/v1/admin/users/{id}` - 사용자 수정 (비밀번호 재설정 포함)
//! - `DELETE /api/v1/admin/users/{id}` - 사용자 삭제 (소유 데이터 연쇄 삭제)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{
    forbid_self_target, hash_password, validate_password_strength, AdminAuth, Role, SelfAction,
};
use crate::error::{db_error, error_response, validation_error, ApiErrorResponse, ApiResult};
use crate::repository::{AdminUserRecord, UserChanges, UserRepository};
use crate::routes::companies::SuccessResponse;
use crate::state::AppState;

// ================================================================================================
// Request/Response Types
// ================================================================================================

/// 사용자 수정 요청. 빠진 필드는 기존 값을 유지합니다.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AdminUpdateUserRequest {
    #[validate(length(min = 2, message = "이름은 최소 2자 이상이어야 합니다"))]
    pub name: Option<String>,
    #[validate(email(message = "유효하지 않은 이메일 주소입니다"))]
    pub email: Option<String>,
    /// 역할 변경 ("USER" | "ADMIN")
    pub role: Option<Role>,
    /// 활성 플래그 변경
    pub is_active: Option<bool>,
    /// 관리자 직접 비밀번호 재설정 (재설정 메일 발송은 없음)
    pub new_password: Option<String>,
}

/// 사용자 요약 통계.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminStats {
    pub total_users: usize,
    pub active_users: usize,
    pub inactive_users: usize,
    pub admin_users: usize,
    pub never_logged_in: usize,
}

/// 사용자 목록 응답.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminUsersResponse {
    pub users: Vec<AdminUserRecord>,
    pub stats: AdminStats,
}

fn user_not_found() -> (StatusCode, Json<ApiErrorResponse>) {
    error_response(
        StatusCode::NOT_FOUND,
        "USER_NOT_FOUND",
        "사용자를 찾을 수 없습니다",
    )
}

// ================================================================================================
// Handlers
// ================================================================================================

/// GET /api/v1/admin/users - 사용자 목록 + 통계
#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    responses(
        (status = 200, description = "사용자 목록과 요약 통계", body = AdminUsersResponse),
        (status = 401, description = "인증 필요", body = ApiErrorResponse),
        (status = 403, description = "관리자 아님", body = ApiErrorResponse)
    ),
    tag = "admin"
)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    AdminAuth(_claims): AdminAuth,
) -> ApiResult<Json<AdminUsersResponse>> {
    let users = UserRepository::list_with_counts(&state.db_pool)
        .await
        .map_err(db_error)?;

    let stats = AdminStats {
        total_users: users.len(),
        active_users: users.iter().filter(|u| u.is_active).count(),
        inactive_users: users.iter().filter(|u| !u.is_active).count(),
        admin_users: users.iter().filter(|u| u.role == "ADMIN").count(),
        never_logged_in: users.iter().filter(|u| u.last_login_at.is_none()).count(),
    };

    Ok(Json(AdminUsersResponse { users, stats }))
}

/// GET /api/v1/admin/users/{id} - 사용자 상세
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    AdminAuth(_claims): AdminAuth,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<AdminUserRecord>> {
    let user = UserRepository::find_detail(&state.db_pool, id)
        .await
        .map_err(db_error)?
        .ok_or_else(user_not_found)?;

    Ok(Json(user))
}

/// PATCH /api/v1/admin/users/{id} - 사용자 수정
///
/// 비밀번호 재설정, 활성 플래그 토글, 역할 변경을 담당합니다.
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    AdminAuth(claims): AdminAuth,
    Path(id): Path<Uuid>,
    Json(req): Json<AdminUpdateUserRequest>,
) -> ApiResult<Json<AdminUserRecord>> {
    req.validate().map_err(|e| validation_error(&e))?;

    // 자기 자신 대상 가드: 역할 변경과 비활성화
    if req.role.is_some() {
        forbid_self_target(&claims, id, SelfAction::ChangeRole)?;
    }
    if req.is_active == Some(false) {
        forbid_self_target(&claims, id, SelfAction::Deactivate)?;
    }

    let password_hash = match &req.new_password {
        Some(password) => {
            validate_password_strength(password).map_err(|msg| {
                error_response(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg)
            })?;
            Some(hash_password(password).map_err(|e| {
                warn!(error = %e, "비밀번호 해싱 실패");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "요청을 처리할 수 없습니다",
                )
            })?)
        }
        None => None,
    };

    let changes = UserChanges {
        name: req.name,
        email: req.email,
        role: req.role.map(|r| r.to_string()),
        is_active: req.is_active,
        password_hash,
    };

    let updated = UserRepository::update(&state.db_pool, id, &changes)
        .await
        .map_err(|e| {
            if e.to_string().contains("users_email") {
                error_response(
                    StatusCode::CONFLICT,
                    "EMAIL_TAKEN",
                    "이미 등록된 이메일입니다",
                )
            } else {
                db_error(e)
            }
        })?
        .ok_or_else(user_not_found)?;

    info!(target_id = %id, admin_id = %claims.sub, "관리자 사용자 수정");
    Ok(Json(updated))
}

/// DELETE /api/v1/admin/users/{id} - 사용자 삭제
///
/// 소유 회사와 관련 댓글까지 연쇄 삭제합니다.
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    AdminAuth(claims): AdminAuth,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SuccessResponse>> {
    forbid_self_target(&claims, id, SelfAction::DeleteUser)?;

    let deleted = UserRepository::delete(&state.db_pool, id)
        .await
        .map_err(db_error)?;
    if !deleted {
        return Err(user_not_found());
    }

    info!(target_id = %id, admin_id = %claims.sub, "관리자 사용자 삭제");
    Ok(Json(SuccessResponse {
        success: true,
        message: "사용자가 삭제되었습니다".to_string(),
    }))
}

/// 관리자 라우터 생성.
pub fn admin_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users))
        .route(
            "/users/{id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
}
