use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use validator::Validate;

use super::dto::{
    CreateSessionRequest, JoinSessionRequest, ParticipantItem, SessionDetailResponse, SessionItem,
    SessionListQuery, SessionSearchQuery, SessionSearchResponse, UpdatePhaseRequest,
};
use super::service::SessionService;
use crate::search::Page;
use crate::state::AppState;
use crate::utils::auth::{AuthUser, OptionalAuthUser};
use crate::utils::error::AppError;
use crate::utils::{BaseResponse, ErrorResponse};

/// 세션 검색 API
///
/// 공개 세션만 검색합니다.
#[utoipa::path(
    get,
    path = "/api/sessions/search",
    params(SessionSearchQuery),
    responses(
        (status = 200, description = "검색 성공", body = SessionSearchResponse)
    ),
    tag = "Session"
)]
pub async fn search_sessions(
    State(state): State<AppState>,
    query: Result<Query<SessionSearchQuery>, QueryRejection>,
) -> Result<Json<BaseResponse<SessionSearchResponse>>, AppError> {
    let Query(query) = query?;

    let result = SessionService::search(state, query.to_search_params()).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 참가 예정 세션 API
#[utoipa::path(
    get,
    path = "/api/sessions/upcoming",
    params(SessionListQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "조회 성공", body = SessionSearchResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse)
    ),
    tag = "Session"
)]
pub async fn upcoming_sessions(
    State(state): State<AppState>,
    user: AuthUser,
    query: Result<Query<SessionListQuery>, QueryRejection>,
) -> Result<Json<BaseResponse<SessionSearchResponse>>, AppError> {
    let Query(query) = query?;
    let page = Page::from_raw(query.limit.as_deref(), query.offset.as_deref());

    let result = SessionService::upcoming(state, user.user_id(), page).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 지난 세션 API
#[utoipa::path(
    get,
    path = "/api/sessions/history",
    params(SessionListQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "조회 성공", body = SessionSearchResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse)
    ),
    tag = "Session"
)]
pub async fn session_history(
    State(state): State<AppState>,
    user: AuthUser,
    query: Result<Query<SessionListQuery>, QueryRejection>,
) -> Result<Json<BaseResponse<SessionSearchResponse>>, AppError> {
    let Query(query) = query?;
    let page = Page::from_raw(query.limit.as_deref(), query.offset.as_deref());

    let result = SessionService::history(state, user.user_id(), page).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 세션 생성 API
///
/// 생성자는 확정된 KEEPER로 등록됩니다.
#[utoipa::path(
    post,
    path = "/api/sessions",
    request_body = CreateSessionRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "생성 성공", body = SessionDetailResponse),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse)
    ),
    tag = "Session"
)]
pub async fn create_session(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CreateSessionRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<SessionDetailResponse>>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let result = SessionService::create(state, user.user_id(), req).await?;

    Ok(Json(BaseResponse::success_with_message(
        result,
        "세션이 생성되었습니다.",
    )))
}

/// 세션 상세 API
#[utoipa::path(
    get,
    path = "/api/sessions/{session_id}",
    params(("session_id" = String, Path, description = "세션 ID")),
    responses(
        (status = 200, description = "조회 성공", body = SessionDetailResponse),
        (status = 404, description = "존재하지 않는 세션", body = ErrorResponse)
    ),
    tag = "Session"
)]
pub async fn get_session(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    Path(session_id): Path<String>,
) -> Result<Json<BaseResponse<SessionDetailResponse>>, AppError> {
    let result = SessionService::get_detail(state, viewer.user_id(), &session_id).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 세션 참가 신청 API
#[utoipa::path(
    post,
    path = "/api/sessions/{session_id}/join",
    params(("session_id" = String, Path, description = "세션 ID")),
    request_body = JoinSessionRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "신청 성공", body = ParticipantItem),
        (status = 404, description = "존재하지 않는 세션", body = ErrorResponse),
        (status = 409, description = "이미 신청했거나 모집 중이 아님", body = ErrorResponse)
    ),
    tag = "Session"
)]
pub async fn join_session(
    State(state): State<AppState>,
    user: AuthUser,
    Path(session_id): Path<String>,
    payload: Result<Json<JoinSessionRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<ParticipantItem>>, AppError> {
    let Json(req) = payload?;

    let result = SessionService::join(state, user.user_id(), &session_id, req).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 참가 확정 API (KEEPER 전용)
#[utoipa::path(
    post,
    path = "/api/sessions/{session_id}/participants/{user_id}/confirm",
    params(
        ("session_id" = String, Path, description = "세션 ID"),
        ("user_id" = String, Path, description = "참가자 ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "확정 성공", body = ParticipantItem),
        (status = 403, description = "KEEPER가 아님", body = ErrorResponse),
        (status = 409, description = "모집 인원 초과", body = ErrorResponse)
    ),
    tag = "Session"
)]
pub async fn confirm_participant(
    State(state): State<AppState>,
    user: AuthUser,
    Path((session_id, participant_id)): Path<(String, String)>,
) -> Result<Json<BaseResponse<ParticipantItem>>, AppError> {
    let result =
        SessionService::confirm(state, user.user_id(), &session_id, &participant_id).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 단계 변경 API (KEEPER 전용)
#[utoipa::path(
    patch,
    path = "/api/sessions/{session_id}/phase",
    params(("session_id" = String, Path, description = "세션 ID")),
    request_body = UpdatePhaseRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "변경 성공", body = SessionItem),
        (status = 403, description = "KEEPER가 아님", body = ErrorResponse),
        (status = 409, description = "허용되지 않는 단계 전이", body = ErrorResponse)
    ),
    tag = "Session"
)]
pub async fn update_phase(
    State(state): State<AppState>,
    user: AuthUser,
    Path(session_id): Path<String>,
    payload: Result<Json<UpdatePhaseRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<SessionItem>>, AppError> {
    let Json(req) = payload?;

    let result = SessionService::update_phase(state, user.user_id(), &session_id, req).await?;

    Ok(Json(BaseResponse::success(result)))
}
