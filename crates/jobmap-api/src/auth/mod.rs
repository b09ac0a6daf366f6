//! 인증 및 권한 부여.
//!
//! 토큰 기반 인증 및 역할/소유권 기반 접근 제어를 제공합니다.
//! 요청 핸들러 간에 공유되는 세션 상태는 없습니다. 모든 핸들러가
//! 베어러 토큰만으로 신원을 독립적으로 재구성합니다.
//!
//! # 구성 요소
//!
//! - [`password`]: 비밀번호 해싱/검증 (가입/로그인/재설정 시에만 사용)
//! - [`Claims`]: 토큰 페이로드와 발급/검증 함수
//! - [`JwtAuth`] / [`OptionalJwtAuth`] / [`AdminAuth`]: Axum 신원 추출기
//! - [`policy`]: 핸들러가 변경 전에 적용하는 이름 있는 인가 가드
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! async fn delete_company(
//!     JwtAuth(claims): JwtAuth,
//!     Path(id): Path<Uuid>,
//! ) -> impl IntoResponse {
//!     // ...리소스 조회 후...
//!     require_owner(&claims, company.user_id)?;
//!     // ...삭제...
//! }
//! ```

mod jwt;
mod middleware;
mod password;
mod policy;
mod roles;

pub use jwt::{create_token, decode_token, Claims, JwtError, TOKEN_TTL_DAYS};
pub use middleware::{bearer_token, AdminAuth, AuthError, JwtAuth, OptionalJwtAuth};
pub use password::{
    hash_password, validate_password_strength, verify_password, PasswordError, BCRYPT_COST,
};
pub use policy::{
    forbid_self_target, require_admin, require_authenticated, require_owner,
    require_owner_or_public, PolicyError, SelfAction,
};
pub use roles::Role;
