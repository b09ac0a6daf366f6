//! 설정 관리.
//!
//! 애플리케이션 설정을 정의하고 로드합니다. 우선순위는
//! 기본값 → 설정 파일(TOML) → `JOBMAP__` 접두사 환경 변수 순입니다.
//! `DATABASE_URL`, `JWT_SECRET`은 배포 플랫폼 관례에 따라 별칭으로도 읽습니다.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

use crate::error::{CoreError, CoreResult};

/// 서명 시크릿의 최소 길이 (바이트).
pub const MIN_SECRET_LEN: usize = 32;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 데이터베이스 설정
    pub database: DatabaseConfig,
    /// 인증 설정
    pub auth: AuthConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// 소켓 주소 반환.
    ///
    /// # Errors
    /// `host:port` 형식이 유효하지 않으면 `CoreError::Config`를 반환합니다.
    pub fn socket_addr(&self) -> CoreResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| CoreError::Config(format!("유효하지 않은 소켓 주소: {}", e)))
    }
}

/// 데이터베이스 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Postgres 연결 URL (필수)
    pub url: String,
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 타임아웃 (초)
    pub connection_timeout_secs: u64,
}

/// 인증 설정.
///
/// 토큰 서명 시크릿은 반드시 외부에서 주입되어야 하며, 누락되거나 너무 짧으면
/// 프로세스 시작 자체가 실패합니다. 하드코딩된 기본 시크릿은 존재하지 않습니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// 토큰 서명 시크릿 (HMAC-SHA256). 최소 32바이트.
    pub secret: String,
    /// 토큰 수명 (일). 재로그인 없이는 갱신되지 않습니다.
    pub token_ttl_days: i64,
}

impl AuthConfig {
    /// 시크릿 요구사항을 검증합니다.
    pub fn validate(&self) -> CoreResult<()> {
        if self.secret.is_empty() {
            return Err(CoreError::Config(
                "auth.secret이 설정되지 않았습니다 (JOBMAP__AUTH__SECRET 또는 JWT_SECRET)"
                    .to_string(),
            ));
        }
        if self.secret.len() < MIN_SECRET_LEN {
            return Err(CoreError::Config(format!(
                "auth.secret은 최소 {}바이트여야 합니다 (현재 {}바이트)",
                MIN_SECRET_LEN,
                self.secret.len()
            )));
        }
        if self.token_ttl_days <= 0 {
            return Err(CoreError::Config(
                "auth.token_ttl_days는 양수여야 합니다".to_string(),
            ));
        }
        Ok(())
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨 필터 (예: "info", "jobmap_api=debug")
    pub level: String,
    /// 출력 형식 ("pretty" | "json" | "compact")
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let builder = Self::base_builder()?
            .add_source(config::File::from(path.as_ref()))
            .add_source(Self::env_source());

        Self::finish(builder)
    }

    /// 기본 경로에서 설정을 로드합니다. 파일이 없으면 환경 변수만 사용합니다.
    pub fn load_default() -> CoreResult<Self> {
        let default_path = Path::new("config/default.toml");
        if default_path.exists() {
            Self::load(default_path)
        } else {
            Self::from_env()
        }
    }

    /// 환경 변수(및 기본값)에서만 설정을 로드합니다.
    pub fn from_env() -> CoreResult<Self> {
        let builder = Self::base_builder()?.add_source(Self::env_source());
        Self::finish(builder)
    }

    fn base_builder() -> CoreResult<config::builder::ConfigBuilder<config::builder::DefaultState>> {
        // url과 secret의 기본값은 빈 문자열입니다. 실제 값 검증은 validate()가
        // 수행하며, 비어 있으면 프로세스 시작이 거부됩니다.
        let mut builder = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("database.url", "")?
            .set_default("database.max_connections", 10)?
            .set_default("database.connection_timeout_secs", 30)?
            .set_default("auth.secret", "")?
            .set_default("auth.token_ttl_days", 7)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?;

        // 배포 플랫폼 관례 별칭. JOBMAP__ 접두사 변수가 있으면 그쪽이 우선합니다.
        if let Ok(url) = std::env::var("DATABASE_URL") {
            builder = builder.set_default("database.url", url)?;
        }
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            builder = builder.set_default("auth.secret", secret)?;
        }

        Ok(builder)
    }

    fn env_source() -> config::Environment {
        config::Environment::with_prefix("JOBMAP")
            .separator("__")
            .try_parsing(true)
    }

    fn finish(
        builder: config::builder::ConfigBuilder<config::builder::DefaultState>,
    ) -> CoreResult<Self> {
        let cfg: AppConfig = builder
            .build()?
            .try_deserialize()
            .map_err(|e| CoreError::Config(format!("설정 역직렬화 실패: {}", e)))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// 전체 설정을 검증합니다. 실패 시 프로세스는 시작되지 않아야 합니다.
    pub fn validate(&self) -> CoreResult<()> {
        if self.database.url.is_empty() {
            return Err(CoreError::Config(
                "database.url이 설정되지 않았습니다 (JOBMAP__DATABASE__URL 또는 DATABASE_URL)"
                    .to_string(),
            ));
        }
        self.auth.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_auth() -> AuthConfig {
        AuthConfig {
            secret: "0123456789abcdef0123456789abcdef".to_string(),
            token_ttl_days: 7,
        }
    }

    #[test]
    fn test_auth_secret_required() {
        let cfg = AuthConfig {
            secret: String::new(),
            token_ttl_days: 7,
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_auth_secret_min_length() {
        let cfg = AuthConfig {
            secret: "too-short".to_string(),
            token_ttl_days: 7,
        };
        assert!(cfg.validate().is_err());

        assert!(valid_auth().validate().is_ok());
    }

    #[test]
    fn test_auth_ttl_positive() {
        let cfg = AuthConfig {
            token_ttl_days: 0,
            ..valid_auth()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_database_url_required() {
        let cfg = AppConfig {
            server: ServerConfig::default(),
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 10,
                connection_timeout_secs: 30,
            },
            auth: valid_auth(),
            logging: LoggingConfig::default(),
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_socket_addr() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.socket_addr().unwrap().port(), 3000);

        let bad = ServerConfig {
            host: "not a host".to_string(),
            port: 3000,
        };
        assert!(bad.socket_addr().is_err());
    }
}
