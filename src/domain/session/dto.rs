use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::entity::game_session::{SessionPhase, SessionVisibility};
use super::entity::session_participant::{ParticipantStatus, ParticipantType};

// ============== 세션 검색/목록 ==============

/// `/api/sessions/search` 쿼리 문자열 (가공 전)
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct SessionSearchQuery {
    /// 쉼표 구분 단계 목록 (예: RECRUITING,PREPARATION)
    pub phases: Option<String>,
    /// 세션 이름/설명 검색어
    pub q: Option<String>,
    pub scenario_id: Option<String>,
    /// true면 시나리오 미정 세션만 (scenarioId보다 우선)
    pub scenario_undecided: Option<String>,
    /// newest / scheduled
    pub sort: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// 내 세션 목록(upcoming/history) 페이지
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct SessionListQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionScenarioItem {
    pub scenario_id: String,
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionItem {
    pub session_id: String,
    pub name: String,
    pub description: Option<String>,
    /// None = 시나리오 미정
    pub scenario: Option<SessionScenarioItem>,
    pub keeper_id: String,
    pub keeper_name: String,
    pub phase: SessionPhase,
    pub scheduled_at: Option<String>,
    pub recruited_player_count: Option<i32>,
    /// 확정된 PLAYER 수
    pub confirmed_player_count: i32,
    pub visibility: SessionVisibility,
    pub created_at: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionSearchResponse {
    pub sessions: Vec<SessionItem>,
    pub total_count: u64,
}

// ============== 세션 상세 ==============

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantItem {
    pub user_id: String,
    pub name: String,
    pub participant_type: ParticipantType,
    pub participant_status: ParticipantStatus,
    pub joined_at: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionDetailResponse {
    pub session: SessionItem,
    pub participants: Vec<ParticipantItem>,
}

// ============== 세션 생성/참가/단계 변경 ==============

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    #[validate(length(min = 1, max = 100, message = "세션 이름은 1~100자여야 합니다."))]
    pub name: String,

    #[validate(length(max = 5000, message = "설명은 5000자 이하여야 합니다."))]
    pub description: Option<String>,

    /// 비우면 시나리오 미정
    pub scenario_id: Option<String>,

    /// 예: 2026-11-01T19:30:00
    #[schema(value_type = Option<String>)]
    pub scheduled_at: Option<NaiveDateTime>,

    #[validate(range(min = 1, max = 100, message = "모집 인원은 1~100명이어야 합니다."))]
    pub recruited_player_count: Option<i32>,

    /// 기본값 PUBLIC
    pub visibility: Option<SessionVisibility>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JoinSessionRequest {
    /// PLAYER 또는 SPECTATOR
    pub participant_type: ParticipantType,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePhaseRequest {
    pub phase: SessionPhase,
}
