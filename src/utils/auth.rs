use axum::{
    async_trait, extract::FromRequestParts, http::header::AUTHORIZATION, http::header::COOKIE,
    http::request::Parts,
};

use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::jwt::{decode_access_token, Claims};

/// Access Token 쿠키 이름
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// 인증된 사용자 정보를 담는 Extractor
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// JWT Claims에서 사용자 ID를 추출합니다.
    pub fn user_id(&self) -> &str {
        &self.0.sub
    }
}

/// 로그인하지 않아도 되는 API용 Extractor
///
/// 토큰이 없으면 `None`, 토큰이 있지만 유효하지 않으면 401을 반환합니다.
pub struct OptionalAuthUser(pub Option<Claims>);

impl OptionalAuthUser {
    pub fn user_id(&self) -> Option<&str> {
        self.0.as_ref().map(|c| c.sub.as_str())
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts)?
            .ok_or_else(|| AppError::Unauthorized("로그인이 필요합니다.".to_string()))?;

        // 토큰 검증 및 디코딩 (access token만 허용)
        let claims = decode_access_token(&token, &state.config.jwt_secret)?;

        Ok(AuthUser(claims))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for OptionalAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match extract_token(parts)? {
            Some(token) => {
                let claims = decode_access_token(&token, &state.config.jwt_secret)?;
                Ok(OptionalAuthUser(Some(claims)))
            }
            None => Ok(OptionalAuthUser(None)),
        }
    }
}

/// Authorization 헤더 → 쿠키 순서로 토큰을 찾습니다.
fn extract_token(parts: &Parts) -> Result<Option<String>, AppError> {
    if let Some(auth_header) = parts.headers.get(AUTHORIZATION) {
        let auth_header_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthorized("잘못된 헤더 형식입니다.".to_string()))?;

        return match auth_header_str.strip_prefix("Bearer ") {
            Some(token) if !token.is_empty() => Ok(Some(token.to_string())),
            _ => Err(AppError::Unauthorized(
                "토큰 형식이 올바르지 않습니다.".to_string(),
            )),
        };
    }

    extract_token_from_cookie(parts)
}

/// 쿠키에서 access_token 추출
fn extract_token_from_cookie(parts: &Parts) -> Result<Option<String>, AppError> {
    let Some(cookie_header) = parts.headers.get(COOKIE) else {
        return Ok(None);
    };

    let cookie_str = cookie_header
        .to_str()
        .map_err(|_| AppError::Unauthorized("잘못된 쿠키 형식입니다.".to_string()))?;

    // 쿠키 파싱: "name1=value1; name2=value2" 형식
    let prefix = format!("{}=", ACCESS_TOKEN_COOKIE);
    for cookie in cookie_str.split(';') {
        if let Some(value) = cookie.trim().strip_prefix(&prefix) {
            if !value.is_empty() {
                return Ok(Some(value.to_string()));
            }
        }
    }

    Ok(None)
}
