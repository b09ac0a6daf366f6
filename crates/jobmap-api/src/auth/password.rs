//! 비밀번호 해싱 유틸리티.
//!
//! bcrypt 기반 비밀번호 해싱 및 검증. 해싱은 가입/로그인/관리자 재설정
//! 경로에서만 사용되며 토큰 처리와는 독립적입니다.

use bcrypt::{hash, verify};

/// bcrypt 비용 계수. 무차별 대입을 비실용적으로 만드는 수준입니다.
pub const BCRYPT_COST: u32 = 12;

/// 비밀번호 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("비밀번호 해싱 실패")]
    HashingFailed,
}

/// 비밀번호 해싱.
///
/// bcrypt 알고리즘을 사용하여 비밀번호를 해싱합니다. 솔트는 자동으로
/// 생성되어 다이제스트에 포함됩니다.
///
/// # Arguments
///
/// * `password` - 해싱할 평문 비밀번호
///
/// # Returns
///
/// 모듈러 크립트 형식의 해시 문자열 (`$2b$12$...`)
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    hash(password, BCRYPT_COST).map_err(|_| PasswordError::HashingFailed)
}

/// 비밀번호 검증.
///
/// 저장된 다이제스트와 입력된 비밀번호를 알고리즘 자체 비교기로 비교합니다.
/// 손상된 다이제스트는 `false`로 처리합니다. 호출자 제어 흐름으로 에러를
/// 던지지 않으며, 호출자는 `false`를 "잘못된 자격증명"으로 취급합니다.
pub fn verify_password(password: &str, digest: &str) -> bool {
    verify(password, digest).unwrap_or(false)
}

/// 비밀번호 강도 검증.
///
/// 가입 및 관리자 재설정 시의 최소 요구사항(6자 이상)을 확인합니다.
pub fn validate_password_strength(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < 6 {
        return Err("비밀번호는 최소 6자 이상이어야 합니다");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let password = "secret1";
        let digest = hash_password(password).unwrap();

        // 모듈러 크립트 형식 확인
        assert!(digest.starts_with("$2"));

        assert!(verify_password(password, &digest));
        assert!(!verify_password("secret2", &digest));
    }

    #[test]
    fn test_different_passwords_different_hashes() {
        let d1 = hash_password("password1").unwrap();
        let d2 = hash_password("password1").unwrap();

        // 같은 비밀번호라도 솔트가 다르므로 해시가 다름
        assert_ne!(d1, d2);

        assert!(verify_password("password1", &d1));
        assert!(verify_password("password1", &d2));
    }

    #[test]
    fn test_malformed_digest_is_false_not_error() {
        assert!(!verify_password("password", "not-a-valid-digest"));
        assert!(!verify_password("password", ""));
    }

    #[test]
    fn test_password_strength_validation() {
        assert!(validate_password_strength("secret1").is_ok());
        assert!(validate_password_strength("abcdef").is_ok());

        assert!(validate_password_strength("short").is_err());
        assert!(validate_password_strength("").is_err());
    }

    #[test]
    fn test_unicode_password() {
        let password = "한글비밀번호123";
        let digest = hash_password(password).unwrap();
        assert!(verify_password(password, &digest));
    }
}
