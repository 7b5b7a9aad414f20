use std::env;

/// 개발용 JWT 시크릿 (JWT_SECRET 미설정 시)
const DEV_JWT_SECRET: &str = "dev-secret";

/// 애플리케이션 설정
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration: i64,
    pub db_schema_update: bool,

    // 외부 시나리오 메타데이터 수집
    pub scraper_timeout_secs: u64,
    pub scraper_user_agent: String,
}

impl AppConfig {
    /// 환경 변수에서 설정 로드
    pub fn from_env() -> Result<Self, ConfigError> {
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let database_url = env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)?;

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!(
                "JWT_SECRET 환경변수가 설정되지 않았습니다. 프로덕션 환경에서는 반드시 설정하세요."
            );
            DEV_JWT_SECRET.to_string()
        });

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .unwrap_or_else(|_| "86400".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidExpiration)?;

        let db_schema_update = env::var("DB_SCHEMA_UPDATE")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .unwrap_or_else(|_| {
                tracing::warn!(
                    "Invalid DB_SCHEMA_UPDATE value, defaulting to false. Use 'true' or 'false'."
                );
                false
            });

        let scraper_timeout_secs = env::var("SCRAPER_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidScraperTimeout)?;

        let scraper_user_agent = env::var("SCRAPER_USER_AGENT")
            .unwrap_or_else(|_| format!("trpg-server/{}", env!("CARGO_PKG_VERSION")));

        Ok(Self {
            server_port,
            database_url,
            jwt_secret,
            jwt_expiration,
            db_schema_update,
            scraper_timeout_secs,
            scraper_user_agent,
        })
    }

    /// 테스트 및 로컬 실행용 설정
    pub fn for_database(database_url: impl Into<String>) -> Self {
        Self {
            server_port: 8080,
            database_url: database_url.into(),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_expiration: 86400,
            db_schema_update: true,
            scraper_timeout_secs: 10,
            scraper_user_agent: format!("trpg-server/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port number")]
    InvalidPort,
    #[error("Invalid expiration time")]
    InvalidExpiration,
    #[error("Invalid scraper timeout")]
    InvalidScraperTimeout,
    #[error("DATABASE_URL environment variable is required")]
    MissingDatabaseUrl,
}
