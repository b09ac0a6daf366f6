//! 회사별 토론 댓글 API 라우트.
//!
//! # 엔드포인트
//!
//! - `GET /api/v1/companies/{id}/comments` - 댓글 목록 (공개 회사 또는 소유자)
//! - `POST /api/v1/companies/{id}/comments` - 댓글 작성 (인증 필요)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{require_owner_or_public, JwtAuth, OptionalJwtAuth};
use crate::error::{db_error, error_response, validation_error, ApiErrorResponse, ApiResult};
use crate::repository::{CommentRecord, CommentRepository, CompanyRepository};
use crate::state::AppState;

// ================================================================================================
// Request/Response Types
// ================================================================================================

/// 댓글 작성 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCommentRequest {
    /// 댓글 내용 (1 ~ 1000자)
    #[validate(length(min = 1, max = 1000, message = "댓글은 1 ~ 1000자여야 합니다"))]
    pub content: String,
    /// 답글 대상 댓글 (최상위 댓글이면 생략)
    #[serde(default)]
    pub parent_id: Option<Uuid>,
}

/// 댓글 목록 응답.
#[derive(Debug, Serialize, ToSchema)]
pub struct CommentsListResponse {
    pub comments: Vec<CommentRecord>,
    pub total: usize,
}

fn company_not_found() -> (StatusCode, Json<ApiErrorResponse>) {
    error_response(
        StatusCode::NOT_FOUND,
        "COMPANY_NOT_FOUND",
        "회사를 찾을 수 없습니다",
    )
}

// ================================================================================================
// Handlers
// ================================================================================================

/// GET /api/v1/companies/{id}/comments - 댓글 목록
///
/// 조회 가드: 공개 회사는 누구나, 비공개 회사는 소유자만.
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    OptionalJwtAuth(principal): OptionalJwtAuth,
    Path(company_id): Path<Uuid>,
) -> ApiResult<Json<CommentsListResponse>> {
    debug!(company_id = %company_id, "댓글 목록 조회");

    let company = CompanyRepository::find_by_id(&state.db_pool, company_id)
        .await
        .map_err(db_error)?
        .ok_or_else(company_not_found)?;

    require_owner_or_public(principal.as_ref(), company.user_id, company.is_public)?;

    let comments = CommentRepository::list_for_company(&state.db_pool, company_id)
        .await
        .map_err(db_error)?;

    let total = comments.len();
    Ok(Json(CommentsListResponse { comments, total }))
}

/// POST /api/v1/companies/{id}/comments - 댓글 작성
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    Path(company_id): Path<Uuid>,
    Json(req): Json<CreateCommentRequest>,
) -> ApiResult<(StatusCode, Json<CommentRecord>)> {
    req.validate().map_err(|e| validation_error(&e))?;

    if CompanyRepository::find_by_id(&state.db_pool, company_id)
        .await
        .map_err(db_error)?
        .is_none()
    {
        return Err(company_not_found());
    }

    let comment = CommentRepository::create(
        &state.db_pool,
        company_id,
        claims.sub,
        &req.content,
        req.parent_id,
    )
    .await
    .map_err(db_error)?;

    info!(comment_id = %comment.id, company_id = %company_id, "댓글 작성");
    Ok((StatusCode::CREATED, Json(comment)))
}

/// 댓글 라우터 생성. 회사 라우터와 같은 접두사 아래에 합쳐집니다.
pub fn comments_router() -> Router<Arc<AppState>> {
    Router::new().route("/{id}/comments", get(list_comments).post(create_comment))
}
