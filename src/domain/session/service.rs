use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use super::dto::{
    CreateSessionRequest, JoinSessionRequest, ParticipantItem, SessionDetailResponse, SessionItem,
    SessionScenarioItem, SessionSearchResponse, UpdatePhaseRequest,
};
use super::entity::game_session::{self, SessionPhase, SessionVisibility};
use super::entity::session_participant::{self, ParticipantStatus, ParticipantType};
use super::search::{compose_query, participating_query, SessionSearchParams};
use crate::domain::scenario::entity::scenario;
use crate::domain::user::entity::user;
use crate::domain::user::service::UserService;
use crate::search::{sort_and_paginate, Page, SortSpec};
use crate::state::AppState;
use crate::utils::datetime::{format_iso, now};
use crate::utils::error::AppError;
use crate::utils::id::new_id;

/// 모집 인원이 다 찼을 때
const SESSION_FULL: &str = "SESSION4091";
/// 현재 단계에서 할 수 없는 작업일 때
const SESSION_PHASE_CONFLICT: &str = "SESSION4092";

pub struct SessionService;

impl SessionService {
    /// 공개 세션 검색
    pub async fn search(
        state: AppState,
        params: SessionSearchParams,
    ) -> Result<SessionSearchResponse, AppError> {
        let query = compose_query(&params);
        let total_count = query.clone().count(&state.db).await?;

        let models = sort_and_paginate(
            query,
            params.sort.spec(),
            game_session::Column::Id,
            params.page,
        )
        .all(&state.db)
        .await?;

        let sessions = Self::to_items(&state.db, models).await?;

        info!(
            result_count = sessions.len(),
            total_count = total_count,
            "세션 검색 완료"
        );

        Ok(SessionSearchResponse {
            sessions,
            total_count,
        })
    }

    /// 내가 참가 중인 진행 전/진행 중 세션 (예정 시각 순)
    pub async fn upcoming(
        state: AppState,
        user_id: &str,
        page: Page,
    ) -> Result<SessionSearchResponse, AppError> {
        Self::list_participating(
            state,
            user_id,
            &SessionPhase::ACTIVE,
            SortSpec::asc(game_session::Column::ScheduledAt).nulls_last(),
            page,
        )
        .await
    }

    /// 내가 참가했던 종료/취소 세션 (최근 순)
    pub async fn history(
        state: AppState,
        user_id: &str,
        page: Page,
    ) -> Result<SessionSearchResponse, AppError> {
        Self::list_participating(
            state,
            user_id,
            &SessionPhase::FINISHED,
            SortSpec::desc(game_session::Column::UpdatedAt),
            page,
        )
        .await
    }

    async fn list_participating(
        state: AppState,
        user_id: &str,
        phases: &[SessionPhase],
        sort: SortSpec<game_session::Column>,
        page: Page,
    ) -> Result<SessionSearchResponse, AppError> {
        let query = participating_query(user_id, phases);
        let total_count = query.clone().count(&state.db).await?;

        let models = sort_and_paginate(query, sort, game_session::Column::Id, page)
            .all(&state.db)
            .await?;

        let sessions = Self::to_items(&state.db, models).await?;

        info!(
            user_id = user_id,
            result_count = sessions.len(),
            total_count = total_count,
            "참가 세션 조회 완료"
        );

        Ok(SessionSearchResponse {
            sessions,
            total_count,
        })
    }

    /// 세션 생성
    ///
    /// 생성자는 항상 확정된 KEEPER로 함께 등록됩니다.
    pub async fn create(
        state: AppState,
        user_id: &str,
        req: CreateSessionRequest,
    ) -> Result<SessionDetailResponse, AppError> {
        UserService::find_user(&state.db, user_id).await?;

        let scenario_id = req
            .scenario_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());
        if let Some(scenario_id) = &scenario_id {
            scenario::Entity::find_by_id(scenario_id.clone())
                .one(&state.db)
                .await?
                .ok_or_else(|| AppError::bad_request("존재하지 않는 시나리오입니다."))?;
        }

        let txn = state.db.begin().await?;

        let timestamp = now();
        let session = game_session::ActiveModel {
            id: Set(new_id()),
            name: Set(req.name.trim().to_string()),
            description: Set(req.description),
            scenario_id: Set(scenario_id),
            keeper_id: Set(user_id.to_string()),
            phase: Set(SessionPhase::Recruiting),
            scheduled_at: Set(req.scheduled_at),
            recruited_player_count: Set(req.recruited_player_count),
            visibility: Set(req.visibility.unwrap_or(SessionVisibility::Public)),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        }
        .insert(&txn)
        .await?;

        session_participant::ActiveModel {
            session_id: Set(session.id.clone()),
            user_id: Set(user_id.to_string()),
            participant_type: Set(ParticipantType::Keeper),
            participant_status: Set(ParticipantStatus::Confirmed),
            joined_at: Set(timestamp),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(user_id = user_id, session_id = %session.id, "세션 생성 완료");

        Self::to_detail(&state.db, session).await
    }

    /// 세션 상세 (참가자 포함)
    ///
    /// FOLLOWERS_ONLY 세션은 참가자에게만 보이고, 그 외에는 존재하지 않는 것으로 응답합니다.
    pub async fn get_detail(
        state: AppState,
        viewer_id: Option<&str>,
        session_id: &str,
    ) -> Result<SessionDetailResponse, AppError> {
        let session = Self::find_session(&state.db, session_id).await?;

        if session.visibility == SessionVisibility::FollowersOnly {
            let is_participant = match viewer_id {
                Some(viewer_id) => Self::find_participant(&state.db, session_id, viewer_id)
                    .await?
                    .is_some(),
                None => false,
            };
            if !is_participant {
                return Err(AppError::not_found("존재하지 않는 세션입니다."));
            }
        }

        Self::to_detail(&state.db, session).await
    }

    /// 참가 신청 (PENDING)
    pub async fn join(
        state: AppState,
        user_id: &str,
        session_id: &str,
        req: JoinSessionRequest,
    ) -> Result<ParticipantItem, AppError> {
        let user = UserService::find_user(&state.db, user_id).await?;

        if req.participant_type == ParticipantType::Keeper {
            return Err(AppError::bad_request("KEEPER로는 참가 신청할 수 없습니다."));
        }

        let session = Self::find_session(&state.db, session_id).await?;
        if session.phase != SessionPhase::Recruiting {
            return Err(AppError::invalid_state(
                SESSION_PHASE_CONFLICT,
                "모집 중인 세션에만 참가할 수 있습니다.",
            ));
        }

        if Self::find_participant(&state.db, session_id, user_id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("이미 참가 신청한 세션입니다."));
        }

        let participant = session_participant::ActiveModel {
            session_id: Set(session_id.to_string()),
            user_id: Set(user_id.to_string()),
            participant_type: Set(req.participant_type),
            participant_status: Set(ParticipantStatus::Pending),
            joined_at: Set(now()),
        }
        .insert(&state.db)
        .await?;

        info!(
            user_id = user_id,
            session_id = session_id,
            participant_type = ?participant.participant_type,
            "세션 참가 신청 완료"
        );

        Ok(Self::participant_item(participant, user.name))
    }

    /// 참가 확정 (KEEPER 전용)
    ///
    /// PLAYER는 모집 인원까지만 확정할 수 있습니다.
    pub async fn confirm(
        state: AppState,
        keeper_id: &str,
        session_id: &str,
        participant_id: &str,
    ) -> Result<ParticipantItem, AppError> {
        let session = Self::find_session(&state.db, session_id).await?;
        if session.keeper_id != keeper_id {
            return Err(AppError::forbidden("KEEPER만 참가를 확정할 수 있습니다."));
        }
        if session.phase.is_terminal() {
            return Err(AppError::invalid_state(
                SESSION_PHASE_CONFLICT,
                "종료된 세션입니다.",
            ));
        }

        let txn = state.db.begin().await?;
        let confirmed = match Self::confirm_participant(&txn, &session, participant_id).await {
            Ok(confirmed) => {
                txn.commit().await?;
                confirmed
            }
            Err(e) => {
                txn.rollback().await?;
                return Err(e);
            }
        };

        let name = UserService::find_user(&state.db, participant_id)
            .await
            .map(|u| u.name)
            .unwrap_or_default();

        info!(
            keeper_id = keeper_id,
            session_id = session_id,
            participant_id = participant_id,
            "참가 확정 완료"
        );

        Ok(Self::participant_item(confirmed, name))
    }

    /// 단계 변경 (KEEPER 전용)
    pub async fn update_phase(
        state: AppState,
        user_id: &str,
        session_id: &str,
        req: UpdatePhaseRequest,
    ) -> Result<SessionItem, AppError> {
        let session = Self::find_session(&state.db, session_id).await?;
        if session.keeper_id != user_id {
            return Err(AppError::forbidden("KEEPER만 단계를 변경할 수 있습니다."));
        }

        let from = session.phase;
        if !from.can_transition_to(req.phase) {
            return Err(AppError::invalid_state(
                SESSION_PHASE_CONFLICT,
                format!("{:?}에서 {:?}(으)로 변경할 수 없습니다.", from, req.phase),
            ));
        }

        let mut active = session.into_active_model();
        active.phase = Set(req.phase);
        active.updated_at = Set(now());
        let updated = active.update(&state.db).await?;

        info!(
            user_id = user_id,
            session_id = session_id,
            from = ?from,
            to = ?updated.phase,
            "세션 단계 변경 완료"
        );

        Self::to_items(&state.db, vec![updated])
            .await?
            .pop()
            .ok_or_else(|| AppError::internal_error("session item conversion failed"))
    }

    async fn confirm_participant<C>(
        db: &C,
        session: &game_session::Model,
        participant_id: &str,
    ) -> Result<session_participant::Model, AppError>
    where
        C: ConnectionTrait,
    {
        let participant = Self::find_participant(db, &session.id, participant_id)
            .await?
            .ok_or_else(|| AppError::not_found("참가 신청 내역이 없습니다."))?;

        if participant.participant_status == ParticipantStatus::Confirmed {
            return Err(AppError::conflict("이미 확정된 참가자입니다."));
        }

        if participant.participant_type == ParticipantType::Player {
            if let Some(capacity) = session.recruited_player_count {
                let confirmed = session_participant::Entity::find()
                    .filter(session_participant::Column::SessionId.eq(session.id.as_str()))
                    .filter(session_participant::Column::ParticipantType.eq(ParticipantType::Player))
                    .filter(
                        session_participant::Column::ParticipantStatus
                            .eq(ParticipantStatus::Confirmed),
                    )
                    .count(db)
                    .await?;
                if confirmed >= capacity as u64 {
                    return Err(AppError::invalid_state(
                        SESSION_FULL,
                        "모집 인원이 모두 찼습니다.",
                    ));
                }
            }
        }

        let mut active = participant.into_active_model();
        active.participant_status = Set(ParticipantStatus::Confirmed);
        Ok(active.update(db).await?)
    }

    async fn find_session<C>(db: &C, session_id: &str) -> Result<game_session::Model, AppError>
    where
        C: ConnectionTrait,
    {
        game_session::Entity::find_by_id(session_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("존재하지 않는 세션입니다."))
    }

    async fn find_participant<C>(
        db: &C,
        session_id: &str,
        user_id: &str,
    ) -> Result<Option<session_participant::Model>, AppError>
    where
        C: ConnectionTrait,
    {
        Ok(
            session_participant::Entity::find_by_id((session_id.to_string(), user_id.to_string()))
                .one(db)
                .await?,
        )
    }

    fn participant_item(model: session_participant::Model, name: String) -> ParticipantItem {
        ParticipantItem {
            user_id: model.user_id,
            name,
            participant_type: model.participant_type,
            participant_status: model.participant_status,
            joined_at: format_iso(&model.joined_at),
        }
    }

    async fn to_detail<C>(
        db: &C,
        session: game_session::Model,
    ) -> Result<SessionDetailResponse, AppError>
    where
        C: ConnectionTrait,
    {
        let rows = session_participant::Entity::find()
            .filter(session_participant::Column::SessionId.eq(session.id.as_str()))
            .find_also_related(user::Entity)
            .order_by_asc(session_participant::Column::JoinedAt)
            .order_by_asc(session_participant::Column::UserId)
            .all(db)
            .await?;

        let participants = rows
            .into_iter()
            .map(|(p, u)| Self::participant_item(p, u.map(|u| u.name).unwrap_or_default()))
            .collect();

        let session = Self::to_items(db, vec![session])
            .await?
            .pop()
            .ok_or_else(|| AppError::internal_error("session item conversion failed"))?;

        Ok(SessionDetailResponse {
            session,
            participants,
        })
    }

    /// KEEPER 이름, 시나리오 이름, 확정 PLAYER 수를 붙여 응답 항목으로 변환
    async fn to_items<C>(
        db: &C,
        models: Vec<game_session::Model>,
    ) -> Result<Vec<SessionItem>, AppError>
    where
        C: ConnectionTrait,
    {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let keeper_ids: Vec<String> = models.iter().map(|m| m.keeper_id.clone()).collect();
        let keepers: HashMap<String, String> = user::Entity::find()
            .filter(user::Column::Id.is_in(keeper_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|u| (u.id, u.name))
            .collect();

        let scenario_ids: Vec<String> = models.iter().filter_map(|m| m.scenario_id.clone()).collect();
        let scenarios: HashMap<String, String> = if scenario_ids.is_empty() {
            HashMap::new()
        } else {
            scenario::Entity::find()
                .filter(scenario::Column::Id.is_in(scenario_ids))
                .all(db)
                .await?
                .into_iter()
                .map(|s| (s.id, s.name))
                .collect()
        };

        let session_ids: Vec<String> = models.iter().map(|m| m.id.clone()).collect();
        let mut confirmed_players: HashMap<String, i32> = HashMap::new();
        for p in session_participant::Entity::find()
            .filter(session_participant::Column::SessionId.is_in(session_ids))
            .filter(session_participant::Column::ParticipantType.eq(ParticipantType::Player))
            .filter(session_participant::Column::ParticipantStatus.eq(ParticipantStatus::Confirmed))
            .all(db)
            .await?
        {
            *confirmed_players.entry(p.session_id).or_default() += 1;
        }

        Ok(models
            .into_iter()
            .map(|m| SessionItem {
                scenario: m.scenario_id.as_ref().map(|id| SessionScenarioItem {
                    scenario_id: id.clone(),
                    name: scenarios.get(id).cloned().unwrap_or_default(),
                }),
                keeper_name: keepers.get(&m.keeper_id).cloned().unwrap_or_default(),
                confirmed_player_count: confirmed_players.get(&m.id).copied().unwrap_or(0),
                session_id: m.id,
                name: m.name,
                description: m.description,
                keeper_id: m.keeper_id,
                phase: m.phase,
                scheduled_at: m.scheduled_at.as_ref().map(format_iso),
                recruited_player_count: m.recruited_player_count,
                visibility: m.visibility,
                created_at: format_iso(&m.created_at),
            })
            .collect())
    }
}
