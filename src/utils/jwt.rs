use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::error::AppError;

/// Access Token 타입 식별자
const ACCESS_TOKEN_TYPE: &str = "access";

/// JWT Claims 구조체
///
/// 토큰 발급은 외부 인증 서비스가 담당하며, 이 서버는 검증만 수행합니다.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (User ID, ULID)
    pub sub: String,
    /// Issued At
    pub iat: usize,
    /// Expiration
    pub exp: usize,
    /// Token Type (access)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

/// Access Token 생성
pub fn encode_token(sub: String, secret: &str, expiration_seconds: i64) -> Result<String, AppError> {
    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::seconds(expiration_seconds))
        .ok_or_else(|| AppError::InternalError("Invalid token expiration".to_string()))?
        .timestamp() as usize;

    let claims = Claims {
        sub,
        iat: now.timestamp() as usize,
        exp: expiration,
        token_type: Some(ACCESS_TOKEN_TYPE.to_string()),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalError(format!("Token creation failed: {}", e)))
}

/// JWT 토큰 검증
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    let validation = Validation::default();

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::Unauthorized("토큰이 만료되었습니다.".into())
        }
        _ => AppError::Unauthorized("유효하지 않은 토큰입니다.".into()),
    })
}

/// Access Token만 허용하는 검증
pub fn decode_access_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    let claims = decode_token(token, secret)?;

    match claims.token_type.as_deref() {
        Some(ACCESS_TOKEN_TYPE) | None => Ok(claims),
        Some(_) => Err(AppError::Unauthorized(
            "Access Token이 아닙니다.".to_string(),
        )),
    }
}
