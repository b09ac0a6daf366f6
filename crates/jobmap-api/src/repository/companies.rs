//! 회사(지원 추적 항목) 저장소.
//!
//! 모든 조회는 소유자 표시 이름을 함께 반환합니다. 가시성 규칙
//! (본인 소유 + 공개)은 SQL 필터로 구현되고, 개별 리소스에 대한
//! 소유권 검사는 핸들러의 접근 정책에서 수행됩니다.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;
use uuid::Uuid;

// ================================================================================================
// Types
// ================================================================================================

/// 회사 레코드 (소유자 이름 조인 포함).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct CompanyRecord {
    pub id: Uuid,
    /// 소유자 사용자 ID
    pub user_id: Uuid,
    pub name: String,
    pub sub_sector: String,
    pub latitude: f64,
    pub longitude: f64,
    /// 지원 상태 ("APPLIED" | "INTERVIEW" | "OFFERED" | "JOINED" | "REJECTED")
    pub status: String,
    pub rating_salary: i32,
    pub rating_stability: i32,
    pub rating_culture: i32,
    pub notes: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    /// 소유자 표시 이름
    pub owner_name: String,
}

/// 새 회사 입력.
#[derive(Debug, Clone)]
pub struct NewCompany {
    pub name: String,
    pub sub_sector: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status: String,
    pub rating_salary: i32,
    pub rating_stability: i32,
    pub rating_culture: i32,
    pub notes: Option<String>,
    pub is_public: bool,
}

/// 회사 부분 수정 입력. `None` 필드는 기존 값을 유지합니다.
#[derive(Debug, Clone, Default)]
pub struct CompanyChanges {
    pub name: Option<String>,
    pub sub_sector: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: Option<String>,
    pub rating_salary: Option<i32>,
    pub rating_stability: Option<i32>,
    pub rating_culture: Option<i32>,
    pub notes: Option<String>,
    pub is_public: Option<bool>,
}

const SELECT_COMPANY: &str = r#"
SELECT c.id, c.user_id, c.name, c.sub_sector, c.latitude, c.longitude, c.status,
       c.rating_salary, c.rating_stability, c.rating_culture, c.notes, c.is_public,
       c.created_at, u.name AS owner_name
FROM companies c
JOIN users u ON u.id = c.user_id
"#;

// ================================================================================================
// Repository
// ================================================================================================

/// 회사 데이터베이스 연산.
pub struct CompanyRepository;

impl CompanyRepository {
    /// 공개 회사 목록 (익명 조회용, 최신순).
    pub async fn list_public(pool: &PgPool) -> Result<Vec<CompanyRecord>, sqlx::Error> {
        sqlx::query_as::<_, CompanyRecord>(&format!(
            "{SELECT_COMPANY} WHERE c.is_public = TRUE ORDER BY c.created_at DESC"
        ))
        .fetch_all(pool)
        .await
    }

    /// 인증 사용자 조회: 본인 소유 + 다른 사용자의 공개 회사 (최신순).
    pub async fn list_visible_for(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<CompanyRecord>, sqlx::Error> {
        sqlx::query_as::<_, CompanyRecord>(&format!(
            "{SELECT_COMPANY} WHERE c.user_id = $1 OR c.is_public = TRUE ORDER BY c.created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// id로 회사 조회.
    pub async fn find_by_id(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<CompanyRecord>, sqlx::Error> {
        sqlx::query_as::<_, CompanyRecord>(&format!("{SELECT_COMPANY} WHERE c.id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// 새 회사 생성. 소유자는 호출 핸들러의 주체입니다.
    pub async fn create(
        pool: &PgPool,
        owner_id: Uuid,
        input: &NewCompany,
    ) -> Result<CompanyRecord, sqlx::Error> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO companies
                (id, user_id, name, sub_sector, latitude, longitude, status,
                 rating_salary, rating_stability, rating_culture, notes, is_public, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, NOW())
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(&input.name)
        .bind(&input.sub_sector)
        .bind(input.latitude)
        .bind(input.longitude)
        .bind(&input.status)
        .bind(input.rating_salary)
        .bind(input.rating_stability)
        .bind(input.rating_culture)
        .bind(input.notes.as_deref())
        .bind(input.is_public)
        .fetch_one(pool)
        .await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// 회사 부분 수정. 대상이 없으면 `None`을 반환합니다.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        changes: &CompanyChanges,
    ) -> Result<Option<CompanyRecord>, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE companies SET
                name = COALESCE($2, name),
                sub_sector = COALESCE($3, sub_sector),
                latitude = COALESCE($4, latitude),
                longitude = COALESCE($5, longitude),
                status = COALESCE($6, status),
                rating_salary = COALESCE($7, rating_salary),
                rating_stability = COALESCE($8, rating_stability),
                rating_culture = COALESCE($9, rating_culture),
                notes = COALESCE($10, notes),
                is_public = COALESCE($11, is_public)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.sub_sector.as_deref())
        .bind(changes.latitude)
        .bind(changes.longitude)
        .bind(changes.status.as_deref())
        .bind(changes.rating_salary)
        .bind(changes.rating_stability)
        .bind(changes.rating_culture)
        .bind(changes.notes.as_deref())
        .bind(changes.is_public)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::find_by_id(pool, id).await
    }

    /// 회사 삭제. 딸린 댓글도 한 트랜잭션으로 함께 삭제합니다.
    ///
    /// 대상이 없으면 `false`를 반환합니다.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM comments WHERE company_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
