//! 회사별 토론 댓글 저장소.
//!
//! 댓글은 `parent_id`로 스레드를 구성합니다. 트리 조립은 클라이언트
//! 몫이고 저장소는 시간순 평면 목록만 반환합니다.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;
use uuid::Uuid;

/// 댓글 레코드 (작성자 이름 조인 포함).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct CommentRecord {
    pub id: Uuid,
    pub company_id: Uuid,
    pub user_id: Uuid,
    /// 답글 대상 댓글 (최상위 댓글이면 None)
    pub parent_id: Option<Uuid>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// 작성자 표시 이름
    pub author_name: String,
}

const SELECT_COMMENT: &str = r#"
SELECT m.id, m.company_id, m.user_id, m.parent_id, m.content, m.created_at,
       u.name AS author_name
FROM comments m
JOIN users u ON u.id = m.user_id
"#;

/// 댓글 데이터베이스 연산.
pub struct CommentRepository;

impl CommentRepository {
    /// 회사의 댓글 목록 (오래된 순).
    pub async fn list_for_company(
        pool: &PgPool,
        company_id: Uuid,
    ) -> Result<Vec<CommentRecord>, sqlx::Error> {
        sqlx::query_as::<_, CommentRecord>(&format!(
            "{SELECT_COMMENT} WHERE m.company_id = $1 ORDER BY m.created_at ASC"
        ))
        .bind(company_id)
        .fetch_all(pool)
        .await
    }

    /// 새 댓글 생성.
    pub async fn create(
        pool: &PgPool,
        company_id: Uuid,
        user_id: Uuid,
        content: &str,
        parent_id: Option<Uuid>,
    ) -> Result<CommentRecord, sqlx::Error> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO comments (id, company_id, user_id, parent_id, content, created_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(company_id)
        .bind(user_id)
        .bind(parent_id)
        .bind(content)
        .fetch_one(pool)
        .await?;

        sqlx::query_as::<_, CommentRecord>(&format!("{SELECT_COMMENT} WHERE m.id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }
}
