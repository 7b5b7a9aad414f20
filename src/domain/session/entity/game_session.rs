use sea_orm::entity::prelude::*;
use sea_orm::sea_query::StringLen;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 세션 진행 단계
///
/// RECRUITING → PREPARATION → IN_PROGRESS → COMPLETED, 종료 전이면 언제든 CANCELLED
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionPhase {
    #[sea_orm(string_value = "RECRUITING")]
    Recruiting,
    #[sea_orm(string_value = "PREPARATION")]
    Preparation,
    #[sea_orm(string_value = "IN_PROGRESS")]
    InProgress,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

impl SessionPhase {
    pub const ACTIVE: [SessionPhase; 3] = [
        SessionPhase::Recruiting,
        SessionPhase::Preparation,
        SessionPhase::InProgress,
    ];

    pub const FINISHED: [SessionPhase; 2] = [SessionPhase::Completed, SessionPhase::Cancelled];

    pub fn is_terminal(self) -> bool {
        matches!(self, SessionPhase::Completed | SessionPhase::Cancelled)
    }

    /// 허용되는 단계 전이인지 확인
    pub fn can_transition_to(self, next: SessionPhase) -> bool {
        use SessionPhase::*;

        match (self, next) {
            (Recruiting, Preparation) | (Preparation, InProgress) | (InProgress, Completed) => true,
            (from, Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionVisibility {
    #[sea_orm(string_value = "PUBLIC")]
    Public,
    #[sea_orm(string_value = "FOLLOWERS_ONLY")]
    FollowersOnly,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "game_session")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    /// None = 시나리오 미정
    pub scenario_id: Option<String>,
    pub keeper_id: String,
    pub phase: SessionPhase,
    pub scheduled_at: Option<DateTime>,
    pub recruited_player_count: Option<i32>,
    pub visibility: SessionVisibility,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::domain::scenario::entity::scenario::Entity",
        from = "Column::ScenarioId",
        to = "crate::domain::scenario::entity::scenario::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Scenario,
    #[sea_orm(
        belongs_to = "crate::domain::user::entity::user::Entity",
        from = "Column::KeeperId",
        to = "crate::domain::user::entity::user::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Keeper,
    #[sea_orm(has_many = "super::session_participant::Entity")]
    SessionParticipant,
}

impl Related<crate::domain::scenario::entity::scenario::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Scenario.def()
    }
}

impl Related<super::session_participant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SessionParticipant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
