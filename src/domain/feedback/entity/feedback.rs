use sea_orm::entity::prelude::*;
use sea_orm::sea_query::StringLen;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedbackCategory {
    #[sea_orm(string_value = "BUG")]
    Bug,
    #[sea_orm(string_value = "FEATURE")]
    Feature,
    #[sea_orm(string_value = "UI_UX")]
    UiUx,
    #[sea_orm(string_value = "OTHER")]
    Other,
}

/// NEW → TRIAGED → PLANNED → IN_PROGRESS → DONE, 또는 WONT_FIX / DUPLICATE
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedbackStatus {
    #[sea_orm(string_value = "NEW")]
    New,
    #[sea_orm(string_value = "TRIAGED")]
    Triaged,
    #[sea_orm(string_value = "PLANNED")]
    Planned,
    #[sea_orm(string_value = "IN_PROGRESS")]
    InProgress,
    #[sea_orm(string_value = "DONE")]
    Done,
    #[sea_orm(string_value = "WONT_FIX")]
    WontFix,
    #[sea_orm(string_value = "DUPLICATE")]
    Duplicate,
}

impl FeedbackStatus {
    /// 작성자가 수정할 수 있는 상태인지
    pub fn is_editable(self) -> bool {
        matches!(self, FeedbackStatus::New | FeedbackStatus::Triaged)
    }

    /// 작성자가 삭제할 수 있는 상태인지
    pub fn is_deletable(self) -> bool {
        self == FeedbackStatus::New
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedbackPriority {
    #[sea_orm(string_value = "LOW")]
    Low,
    #[sea_orm(string_value = "MEDIUM")]
    Medium,
    #[sea_orm(string_value = "HIGH")]
    High,
    #[sea_orm(string_value = "CRITICAL")]
    Critical,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "feedback")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub category: FeedbackCategory,
    pub status: FeedbackStatus,
    pub priority: Option<FeedbackPriority>,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// feedback_vote 행 수 (비정규화)
    #[sea_orm(default_value = 0)]
    pub vote_count: i32,
    /// feedback_comment 행 수 (비정규화)
    #[sea_orm(default_value = 0)]
    pub comment_count: i32,
    pub author_id: String,
    pub merged_into_id: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::domain::user::entity::user::Entity",
        from = "Column::AuthorId",
        to = "crate::domain::user::entity::user::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Author,
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::MergedIntoId",
        to = "Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    MergedInto,
    #[sea_orm(has_many = "super::feedback_vote::Entity")]
    FeedbackVote,
    #[sea_orm(has_many = "super::feedback_comment::Entity")]
    FeedbackComment,
}

impl Related<crate::domain::user::entity::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::feedback_vote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeedbackVote.def()
    }
}

impl Related<super::feedback_comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeedbackComment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
