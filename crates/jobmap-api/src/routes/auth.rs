//! 계정 API 라우트.
//!
//! # 엔드포인트
//!
//! - `POST /api/v1/auth/register` - 회원 가입
//! - `POST /api/v1/auth/login` - 로그인 (토큰 발급)
//! - `GET /api/v1/auth/me` - 현재 사용자 조회
//!
//! 로그인 실패는 이메일 미존재/비밀번호 불일치/비활성 계정을 구분하지
//! 않고 같은 응답을 반환합니다 (계정 열거 방지).

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use jobmap_core::config::AuthConfig;

use crate::auth::{
    create_token, hash_password, validate_password_strength, verify_password, Claims, JwtAuth,
};
use crate::error::{db_error, error_response, validation_error, ApiErrorResponse, ApiResult};
use crate::repository::{UserRecord, UserRepository};
use crate::state::AppState;

// ================================================================================================
// Request/Response Types
// ================================================================================================

/// 가입 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// 표시 이름
    #[validate(length(min = 2, message = "이름은 최소 2자 이상이어야 합니다"))]
    pub name: String,
    /// 이메일 (로그인 키, 유일)
    #[validate(email(message = "유효하지 않은 이메일 주소입니다"))]
    pub email: String,
    /// 비밀번호 (강도 검증은 별도 수행)
    pub password: String,
}

/// 로그인 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "유효하지 않은 이메일 주소입니다"))]
    pub email: String,
    #[validate(length(min = 1, message = "비밀번호를 입력하세요"))]
    pub password: String,
}

/// 토큰과 함께 반환되는 사용자 요약.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<&UserRecord> for AuthUser {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
        }
    }
}

/// 가입/로그인 응답.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    /// 베어러 토큰 (7일 유효, 재로그인 없이는 갱신 불가)
    pub token: String,
    pub user: AuthUser,
}

/// 현재 사용자 응답.
///
/// 토큰 스냅샷이 아니라 저장소의 현재 상태를 반환합니다.
#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

// ================================================================================================
// Handlers
// ================================================================================================

/// 모든 로그인 실패 경로에서 같은 응답을 사용합니다.
fn invalid_credentials() -> (StatusCode, Json<ApiErrorResponse>) {
    error_response(
        StatusCode::UNAUTHORIZED,
        "INVALID_CREDENTIALS",
        "이메일 또는 비밀번호가 올바르지 않습니다",
    )
}

/// 발급된 토큰과 사용자 요약으로 응답 본문을 만듭니다.
fn issue_auth_response(
    user: &UserRecord,
    auth: &AuthConfig,
) -> Result<AuthResponse, (StatusCode, Json<ApiErrorResponse>)> {
    let claims = Claims::new(user.id, &user.email, user.role(), auth.token_ttl_days);
    let token = create_token(&claims, &auth.secret).map_err(|e| {
        warn!(error = %e, "토큰 발급 실패");
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "요청을 처리할 수 없습니다",
        )
    })?;

    Ok(AuthResponse {
        token,
        user: AuthUser::from(user),
    })
}

/// POST /api/v1/auth/register - 회원 가입
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "가입 성공, 토큰 발급", body = AuthResponse),
        (status = 400, description = "입력값 검증 실패", body = ApiErrorResponse),
        (status = 409, description = "이미 등록된 이메일", body = ApiErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthConfig>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    req.validate().map_err(|e| validation_error(&e))?;
    validate_password_strength(&req.password)
        .map_err(|msg| error_response(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg))?;

    if UserRepository::find_by_email(&state.db_pool, &req.email)
        .await
        .map_err(db_error)?
        .is_some()
    {
        return Err(error_response(
            StatusCode::CONFLICT,
            "EMAIL_TAKEN",
            "이미 등록된 이메일입니다",
        ));
    }

    let password_hash = hash_password(&req.password).map_err(|e| {
        warn!(error = %e, "비밀번호 해싱 실패");
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "요청을 처리할 수 없습니다",
        )
    })?;

    let user = UserRepository::create(&state.db_pool, &req.name, &req.email, &password_hash)
        .await
        .map_err(|e| {
            // 사전 검사와 생성 사이의 경쟁은 유일 제약 위반으로 잡습니다
            if e.to_string().contains("users_email") {
                error_response(
                    StatusCode::CONFLICT,
                    "EMAIL_TAKEN",
                    "이미 등록된 이메일입니다",
                )
            } else {
                db_error(e)
            }
        })?;

    info!(user_id = %user.id, "신규 사용자 등록");

    let body = issue_auth_response(&user, &auth)?;
    Ok((StatusCode::CREATED, Json(body)))
}

/// POST /api/v1/auth/login - 로그인
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "로그인 성공, 토큰 발급", body = AuthResponse),
        (status = 400, description = "입력값 검증 실패", body = ApiErrorResponse),
        (status = 401, description = "잘못된 자격증명", body = ApiErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthConfig>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate().map_err(|e| validation_error(&e))?;

    let user = match UserRepository::find_by_email(&state.db_pool, &req.email)
        .await
        .map_err(db_error)?
    {
        Some(user) => user,
        None => {
            debug!("로그인 실패: 자격증명 불일치");
            return Err(invalid_credentials());
        }
    };

    // 비활성 계정도 동일한 응답을 반환합니다. 계정 상태를 노출하지 않습니다.
    if !user.is_active || !verify_password(&req.password, &user.password_hash) {
        debug!("로그인 실패: 자격증명 불일치");
        return Err(invalid_credentials());
    }

    if let Err(e) = UserRepository::touch_last_login(&state.db_pool, user.id).await {
        warn!(error = %e, user_id = %user.id, "last_login_at 갱신 실패");
    }

    info!(user_id = %user.id, "로그인 성공");

    let body = issue_auth_response(&user, &auth)?;
    Ok(Json(body))
}

/// GET /api/v1/auth/me - 현재 사용자 조회
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "현재 사용자", body = MeResponse),
        (status = 401, description = "인증 필요", body = ApiErrorResponse),
        (status = 404, description = "계정이 더 이상 존재하지 않음", body = ApiErrorResponse)
    ),
    tag = "auth"
)]
pub async fn me(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
) -> ApiResult<Json<MeResponse>> {
    let user = UserRepository::find_by_id(&state.db_pool, claims.sub)
        .await
        .map_err(db_error)?
        .ok_or_else(|| {
            error_response(
                StatusCode::NOT_FOUND,
                "USER_NOT_FOUND",
                "사용자를 찾을 수 없습니다",
            )
        })?;

    Ok(Json(MeResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
        is_active: user.is_active,
        created_at: user.created_at,
    }))
}

/// 계정 라우터 생성.
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
}
