use sea_orm::entity::prelude::*;
use sea_orm::sea_query::StringLen;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 시나리오 등록 경로
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScenarioSource {
    #[sea_orm(string_value = "MANUAL")]
    Manual,
    #[sea_orm(string_value = "BOOTH")]
    Booth,
    #[sea_orm(string_value = "TALTO")]
    Talto,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "scenario")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub system_id: String,
    pub author: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub min_player: Option<i32>,
    pub max_player: Option<i32>,
    /// 분 단위
    pub min_playtime: Option<i32>,
    /// 분 단위
    pub max_playtime: Option<i32>,
    pub image_url: Option<String>,
    /// 끝의 '/'를 제거한 배포 URL
    #[sea_orm(unique)]
    pub distribute_url: Option<String>,
    pub source_type: ScenarioSource,
    pub external_id: Option<String>,
    pub created_by: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::game_system::Entity",
        from = "Column::SystemId",
        to = "super::game_system::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    GameSystem,
    #[sea_orm(
        belongs_to = "crate::domain::user::entity::user::Entity",
        from = "Column::CreatedBy",
        to = "crate::domain::user::entity::user::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Creator,
    #[sea_orm(has_many = "super::scenario_tag::Entity")]
    ScenarioTag,
}

impl Related<super::game_system::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameSystem.def()
    }
}

impl Related<super::scenario_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScenarioTag.def()
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::scenario_tag::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::scenario_tag::Relation::Scenario.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
