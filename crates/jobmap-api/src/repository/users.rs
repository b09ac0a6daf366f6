//! 사용자 저장소.
//!
//! 자격증명 레코드에 대한 데이터베이스 연산을 담당합니다. 이메일(로그인)
//! 또는 id(토큰 subject)를 키로 조회합니다. 인가 판단은 여기 없습니다.
//! 핸들러가 접근 정책을 적용한 뒤에 호출합니다.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::Role;

// ================================================================================================
// Types
// ================================================================================================

/// 자격증명 레코드.
///
/// 비밀번호 해시를 포함하므로 클라이언트로 직렬화하지 않습니다.
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// 저장된 역할 문자열을 타입으로 변환합니다.
    ///
    /// 알 수 없는 값은 `User`로 처리합니다. 파싱 실패로 관리자 권한이
    /// 부여되는 일은 없습니다.
    pub fn role(&self) -> Role {
        Role::parse(&self.role).unwrap_or(Role::User)
    }
}

/// 관리자 화면용 사용자 레코드 (보유 회사 수 포함, 해시 제외).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct AdminUserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    /// 해당 사용자가 소유한 회사 수
    pub company_count: i64,
}

/// 관리자 사용자 수정 입력.
///
/// `None` 필드는 기존 값을 유지합니다.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
    pub password_hash: Option<String>,
}

// ================================================================================================
// Repository
// ================================================================================================

/// 사용자 데이터베이스 연산.
pub struct UserRepository;

impl UserRepository {
    /// 이메일로 사용자 조회 (대소문자 무시).
    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<UserRecord>, sqlx::Error> {
        sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, name, email, password_hash, role, is_active, last_login_at, created_at
            FROM users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    /// id로 사용자 조회.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UserRecord>, sqlx::Error> {
        sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, name, email, password_hash, role, is_active, last_login_at, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// 새 사용자 생성. 역할은 USER, 활성 상태로 시작합니다.
    pub async fn create(
        pool: &PgPool,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<UserRecord, sqlx::Error> {
        sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (id, name, email, password_hash, role, is_active, created_at)
            VALUES ($1, $2, $3, $4, 'USER', TRUE, NOW())
            RETURNING id, name, email, password_hash, role, is_active, last_login_at, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(pool)
        .await
    }

    /// 로그인 성공 시각 기록.
    pub async fn touch_last_login(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// 전체 사용자 목록 (보유 회사 수 포함, 최신순).
    pub async fn list_with_counts(pool: &PgPool) -> Result<Vec<AdminUserRecord>, sqlx::Error> {
        sqlx::query_as::<_, AdminUserRecord>(
            r#"
            SELECT u.id, u.name, u.email, u.role, u.is_active, u.last_login_at, u.created_at,
                   COUNT(c.id) AS company_count
            FROM users u
            LEFT JOIN companies c ON c.user_id = u.id
            GROUP BY u.id, u.name, u.email, u.role, u.is_active, u.last_login_at, u.created_at
            ORDER BY u.created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// 단일 사용자 상세 (보유 회사 수 포함).
    pub async fn find_detail(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<AdminUserRecord>, sqlx::Error> {
        sqlx::query_as::<_, AdminUserRecord>(
            r#"
            SELECT u.id, u.name, u.email, u.role, u.is_active, u.last_login_at, u.created_at,
                   COUNT(c.id) AS company_count
            FROM users u
            LEFT JOIN companies c ON c.user_id = u.id
            WHERE u.id = $1
            GROUP BY u.id, u.name, u.email, u.role, u.is_active, u.last_login_at, u.created_at
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// 사용자 부분 수정. 대상이 없으면 `None`을 반환합니다.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        changes: &UserChanges,
    ) -> Result<Option<AdminUserRecord>, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                role = COALESCE($4, role),
                is_active = COALESCE($5, is_active),
                password_hash = COALESCE($6, password_hash)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.email.as_deref())
        .bind(changes.role.as_deref())
        .bind(changes.is_active)
        .bind(changes.password_hash.as_deref())
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::find_detail(pool, id).await
    }

    /// 사용자 삭제.
    ///
    /// 소유 회사와 그 회사들의 댓글, 그리고 본인이 작성한 댓글까지 한
    /// 트랜잭션으로 함께 삭제합니다. 대상이 없으면 `false`를 반환합니다.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM comments
            WHERE user_id = $1
               OR company_id IN (SELECT id FROM companies WHERE user_id = $1)
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM companies WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(role: &str) -> UserRecord {
        UserRecord {
            id: Uuid::new_v4(),
            name: "Ann".to_string(),
            email: "ann@x.com".to_string(),
            password_hash: "$2b$12$abcdefghijklmnopqrstuv".to_string(),
            role: role.to_string(),
            is_active: true,
            last_login_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_record_role_parsing() {
        assert_eq!(record("ADMIN").role(), Role::Admin);
        assert_eq!(record("USER").role(), Role::User);
    }

    #[test]
    fn test_unknown_role_falls_back_to_user() {
        // 손상된 역할 값이 관리자 권한으로 이어지지 않아야 함
        assert_eq!(record("ROOT").role(), Role::User);
        assert_eq!(record("").role(), Role::User);
    }
}
