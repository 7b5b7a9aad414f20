use sea_orm::entity::prelude::*;
use sea_orm::sea_query::StringLen;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[sea_orm(string_value = "USER")]
    User,
    /// 피드백 상태 변경 및 공식 답변 권한
    #[sea_orm(string_value = "MODERATOR")]
    Moderator,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub role: UserRole,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::domain::feedback::entity::feedback::Entity")]
    Feedback,
    #[sea_orm(has_many = "crate::domain::session::entity::session_participant::Entity")]
    SessionParticipant,
}

impl Related<crate::domain::feedback::entity::feedback::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Feedback.def()
    }
}

impl Related<crate::domain::session::entity::session_participant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SessionParticipant.def()
    }
}

impl Model {
    pub fn is_moderator(&self) -> bool {
        self.role == UserRole::Moderator
    }
}

impl ActiveModelBehavior for ActiveModel {}
