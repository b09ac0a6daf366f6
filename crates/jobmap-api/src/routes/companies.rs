//! 회사(지원 추적 항목) API 라우트.
//!
//! # 엔드포인트
//!
//! - `GET /api/v1/companies` - 목록 조회 (익명: 공개만, 인증: 본인 + 공개)
//! - `POST /api/v1/companies` - 생성 (인증 필요)
//! - `PATCH /api/v1/companies/{id}` - 부분 수정 (소유자만)
//! - `DELETE /api/v1/companies/{id}` - 삭제 (소유자만)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::auth::{require_owner, JwtAuth, OptionalJwtAuth};
use crate::error::{db_error, error_response, validation_error, ApiErrorResponse, ApiResult};
use crate::repository::{CompanyChanges, CompanyRecord, CompanyRepository, NewCompany};
use crate::state::AppState;

// ================================================================================================
// Request/Response Types
// ================================================================================================

/// 지원 상태 와이어 값.
pub const COMPANY_STATUSES: [&str; 5] =
    ["APPLIED", "INTERVIEW", "OFFERED", "JOINED", "REJECTED"];

fn validate_status(status: &str) -> Result<(), ValidationError> {
    if COMPANY_STATUSES.contains(&status) {
        Ok(())
    } else {
        let mut err = ValidationError::new("status");
        err.message = Some("유효하지 않은 지원 상태입니다".into());
        Err(err)
    }
}

/// 회사 생성 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCompanyRequest {
    #[validate(length(min = 1, message = "회사 이름은 필수입니다"))]
    pub name: String,
    #[validate(length(min = 1, message = "업종은 필수입니다"))]
    pub sub_sector: String,
    #[validate(range(min = -90.0, max = 90.0, message = "위도는 -90 ~ 90 범위여야 합니다"))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "경도는 -180 ~ 180 범위여야 합니다"))]
    pub longitude: f64,
    /// 지원 상태 ("APPLIED" | "INTERVIEW" | "OFFERED" | "JOINED" | "REJECTED")
    #[validate(custom(function = "validate_status"))]
    pub status: String,
    #[validate(range(min = 1, max = 5, message = "평점은 1 ~ 5 범위여야 합니다"))]
    pub rating_salary: i32,
    #[validate(range(min = 1, max = 5, message = "평점은 1 ~ 5 범위여야 합니다"))]
    pub rating_stability: i32,
    #[validate(range(min = 1, max = 5, message = "평점은 1 ~ 5 범위여야 합니다"))]
    pub rating_culture: i32,
    #[serde(default)]
    pub notes: Option<String>,
    /// 공개 여부 (기본: 비공개)
    #[serde(default)]
    pub is_public: bool,
}

/// 회사 부분 수정 요청. 빠진 필드는 기존 값을 유지합니다.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCompanyRequest {
    #[validate(length(min = 1, message = "회사 이름은 비울 수 없습니다"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "업종은 비울 수 없습니다"))]
    pub sub_sector: Option<String>,
    #[validate(range(min = -90.0, max = 90.0, message = "위도는 -90 ~ 90 범위여야 합니다"))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "경도는 -180 ~ 180 범위여야 합니다"))]
    pub longitude: Option<f64>,
    #[validate(custom(function = "validate_status"))]
    pub status: Option<String>,
    #[validate(range(min = 1, max = 5, message = "평점은 1 ~ 5 범위여야 합니다"))]
    pub rating_salary: Option<i32>,
    #[validate(range(min = 1, max = 5, message = "평점은 1 ~ 5 범위여야 합니다"))]
    pub rating_stability: Option<i32>,
    #[validate(range(min = 1, max = 5, message = "평점은 1 ~ 5 범위여야 합니다"))]
    pub rating_culture: Option<i32>,
    pub notes: Option<String>,
    pub is_public: Option<bool>,
}

/// 회사 목록 응답.
#[derive(Debug, Serialize, ToSchema)]
pub struct CompaniesListResponse {
    pub companies: Vec<CompanyRecord>,
    pub total: usize,
}

/// 성공 응답.
#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
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

/// GET /api/v1/companies - 목록 조회
///
/// 익명 요청은 공개 회사만, 인증된 요청은 본인 소유와 다른 사용자의
/// 공개 회사를 함께 반환합니다.
#[utoipa::path(
    get,
    path = "/api/v1/companies",
    responses(
        (status = 200, description = "회사 목록", body = CompaniesListResponse)
    ),
    tag = "companies"
)]
pub async fn list_companies(
    State(state): State<Arc<AppState>>,
    OptionalJwtAuth(principal): OptionalJwtAuth,
) -> ApiResult<Json<CompaniesListResponse>> {
    debug!(authenticated = principal.is_some(), "회사 목록 조회");

    let companies = match &principal {
        Some(claims) => CompanyRepository::list_visible_for(&state.db_pool, claims.sub)
            .await
            .map_err(db_error)?,
        None => CompanyRepository::list_public(&state.db_pool)
            .await
            .map_err(db_error)?,
    };

    let total = companies.len();
    Ok(Json(CompaniesListResponse { companies, total }))
}

/// POST /api/v1/companies - 생성
pub async fn create_company(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    Json(req): Json<CreateCompanyRequest>,
) -> ApiResult<(StatusCode, Json<CompanyRecord>)> {
    req.validate().map_err(|e| validation_error(&e))?;

    let input = NewCompany {
        name: req.name,
        sub_sector: req.sub_sector,
        latitude: req.latitude,
        longitude: req.longitude,
        status: req.status,
        rating_salary: req.rating_salary,
        rating_stability: req.rating_stability,
        rating_culture: req.rating_culture,
        notes: req.notes,
        is_public: req.is_public,
    };

    let company = CompanyRepository::create(&state.db_pool, claims.sub, &input)
        .await
        .map_err(db_error)?;

    info!(company_id = %company.id, user_id = %claims.sub, "회사 생성");
    Ok((StatusCode::CREATED, Json(company)))
}

/// PATCH /api/v1/companies/{id} - 부분 수정 (소유자만)
pub async fn update_company(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCompanyRequest>,
) -> ApiResult<Json<CompanyRecord>> {
    req.validate().map_err(|e| validation_error(&e))?;

    let company = CompanyRepository::find_by_id(&state.db_pool, id)
        .await
        .map_err(db_error)?
        .ok_or_else(company_not_found)?;

    require_owner(&claims, company.user_id)?;

    let changes = CompanyChanges {
        name: req.name,
        sub_sector: req.sub_sector,
        latitude: req.latitude,
        longitude: req.longitude,
        status: req.status,
        rating_salary: req.rating_salary,
        rating_stability: req.rating_stability,
        rating_culture: req.rating_culture,
        notes: req.notes,
        is_public: req.is_public,
    };

    let updated = CompanyRepository::update(&state.db_pool, id, &changes)
        .await
        .map_err(db_error)?
        .ok_or_else(company_not_found)?;

    info!(company_id = %id, "회사 수정");
    Ok(Json(updated))
}

/// DELETE /api/v1/companies/{id} - 삭제 (소유자만)
pub async fn delete_company(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SuccessResponse>> {
    let company = CompanyRepository::find_by_id(&state.db_pool, id)
        .await
        .map_err(db_error)?
        .ok_or_else(company_not_found)?;

    require_owner(&claims, company.user_id)?;

    let deleted = CompanyRepository::delete(&state.db_pool, id)
        .await
        .map_err(db_error)?;
    if !deleted {
        return Err(company_not_found());
    }

    info!(company_id = %id, "회사 삭제");
    Ok(Json(SuccessResponse {
        success: true,
        message: "회사가 삭제되었습니다".to_string(),
    }))
}

/// 회사 라우터 생성.
pub fn companies_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_companies).post(create_company))
        .route("/{id}", patch(update_company).delete(delete_company))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_status() {
        for status in COMPANY_STATUSES {
            assert!(validate_status(status).is_ok());
        }
        assert!(validate_status("HIRED").is_err());
        assert!(validate_status("applied").is_err());
        assert!(validate_status("").is_err());
    }

    #[test]
    fn test_create_request_validation() {
        let req = CreateCompanyRequest {
            name: "Acme Foods".to_string(),
            sub_sector: "FMCG".to_string(),
            latitude: 37.5665,
            longitude: 126.9780,
            status: "APPLIED".to_string(),
            rating_salary: 4,
            rating_stability: 3,
            rating_culture: 5,
            notes: None,
            is_public: false,
        };
        assert!(req.validate().is_ok());

        let bad = CreateCompanyRequest {
            latitude: 123.0,
            rating_salary: 6,
            status: "MAYBE".to_string(),
            ..req
        };
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("latitude"));
        assert!(errors.field_errors().contains_key("rating_salary"));
        assert!(errors.field_errors().contains_key("status"));
    }
}
