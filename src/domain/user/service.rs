use sea_orm::{ConnectionTrait, EntityTrait};

use super::entity::user;
use crate::utils::error::AppError;

pub struct UserService;

impl UserService {
    /// 토큰의 사용자 ID로 사용자 조회
    ///
    /// 인증 서비스에는 있지만 아직 동기화되지 않은 사용자는 401로 처리합니다.
    pub async fn find_user<C>(db: &C, user_id: &str) -> Result<user::Model, AppError>
    where
        C: ConnectionTrait,
    {
        user::Entity::find_by_id(user_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| AppError::Unauthorized("등록되지 않은 사용자입니다.".to_string()))
    }

    /// 모더레이터 권한 확인
    pub async fn require_moderator<C>(db: &C, user_id: &str) -> Result<user::Model, AppError>
    where
        C: ConnectionTrait,
    {
        let user = Self::find_user(db, user_id).await?;
        if !user.is_moderator() {
            return Err(AppError::Forbidden(
                "모더레이터만 수행할 수 있는 작업입니다.".to_string(),
            ));
        }
        Ok(user)
    }
}
