use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use validator::Validate;

use super::dto::{
    CommentItem, CreateCommentRequest, CreateFeedbackRequest, DeleteFeedbackResponse,
    FeedbackDetailResponse, FeedbackListItem, FeedbackSearchQuery, FeedbackSearchResponse,
    UpdateFeedbackRequest, UpdateStatusRequest, VoteToggleResponse,
};
use super::service::FeedbackService;
use crate::state::AppState;
use crate::utils::auth::{AuthUser, OptionalAuthUser};
use crate::utils::error::AppError;
use crate::utils::{BaseResponse, ErrorResponse};

/// 피드백 검색 API
///
/// 카테고리, 상태 목록, 키워드로 필터링하고 정렬/페이지네이션한 결과를 반환합니다.
/// 로그인한 경우 각 항목에 투표 여부가 표시됩니다.
#[utoipa::path(
    get,
    path = "/api/feedback/search",
    params(FeedbackSearchQuery),
    responses(
        (status = 200, description = "검색 성공", body = FeedbackSearchResponse),
        (status = 401, description = "유효하지 않은 토큰", body = ErrorResponse)
    ),
    tag = "Feedback"
)]
pub async fn search_feedback(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    query: Result<Query<FeedbackSearchQuery>, QueryRejection>,
) -> Result<Json<BaseResponse<FeedbackSearchResponse>>, AppError> {
    let Query(query) = query?;

    let result =
        FeedbackService::search(state, viewer.user_id(), query.to_search_params()).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 피드백 작성 API
#[utoipa::path(
    post,
    path = "/api/feedback",
    request_body = CreateFeedbackRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "작성 성공", body = FeedbackListItem),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse)
    ),
    tag = "Feedback"
)]
pub async fn create_feedback(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CreateFeedbackRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<FeedbackListItem>>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let result = FeedbackService::create(state, user.user_id(), req).await?;

    Ok(Json(BaseResponse::success_with_message(
        result,
        "피드백이 등록되었습니다.",
    )))
}

/// 피드백 상세 조회 API
#[utoipa::path(
    get,
    path = "/api/feedback/{feedback_id}",
    params(("feedback_id" = String, Path, description = "피드백 ID")),
    responses(
        (status = 200, description = "조회 성공", body = FeedbackDetailResponse),
        (status = 404, description = "존재하지 않는 피드백", body = ErrorResponse)
    ),
    tag = "Feedback"
)]
pub async fn get_feedback(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    Path(feedback_id): Path<String>,
) -> Result<Json<BaseResponse<FeedbackDetailResponse>>, AppError> {
    let result = FeedbackService::get_detail(state, viewer.user_id(), &feedback_id).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 피드백 수정 API
///
/// 작성자만, NEW/TRIAGED 상태에서만 수정할 수 있습니다.
#[utoipa::path(
    patch,
    path = "/api/feedback/{feedback_id}",
    params(("feedback_id" = String, Path, description = "피드백 ID")),
    request_body = UpdateFeedbackRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "수정 성공", body = FeedbackListItem),
        (status = 403, description = "작성자가 아님", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 피드백", body = ErrorResponse),
        (status = 409, description = "수정할 수 없는 상태", body = ErrorResponse)
    ),
    tag = "Feedback"
)]
pub async fn update_feedback(
    State(state): State<AppState>,
    user: AuthUser,
    Path(feedback_id): Path<String>,
    payload: Result<Json<UpdateFeedbackRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<FeedbackListItem>>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let result = FeedbackService::update(state, user.user_id(), &feedback_id, req).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 피드백 삭제 API
#[utoipa::path(
    delete,
    path = "/api/feedback/{feedback_id}",
    params(("feedback_id" = String, Path, description = "피드백 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "삭제 성공", body = DeleteFeedbackResponse),
        (status = 403, description = "작성자가 아님", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 피드백", body = ErrorResponse),
        (status = 409, description = "삭제할 수 없는 상태", body = ErrorResponse)
    ),
    tag = "Feedback"
)]
pub async fn delete_feedback(
    State(state): State<AppState>,
    user: AuthUser,
    Path(feedback_id): Path<String>,
) -> Result<Json<BaseResponse<DeleteFeedbackResponse>>, AppError> {
    let result = FeedbackService::delete(state, user.user_id(), &feedback_id).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 투표 토글 API
#[utoipa::path(
    post,
    path = "/api/feedback/{feedback_id}/vote",
    params(("feedback_id" = String, Path, description = "피드백 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "토글 성공", body = VoteToggleResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 피드백", body = ErrorResponse)
    ),
    tag = "Feedback"
)]
pub async fn toggle_vote(
    State(state): State<AppState>,
    user: AuthUser,
    Path(feedback_id): Path<String>,
) -> Result<Json<BaseResponse<VoteToggleResponse>>, AppError> {
    let result = FeedbackService::toggle_vote(state, user.user_id(), &feedback_id).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 댓글 작성 API
#[utoipa::path(
    post,
    path = "/api/feedback/{feedback_id}/comments",
    params(("feedback_id" = String, Path, description = "피드백 ID")),
    request_body = CreateCommentRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "작성 성공", body = CommentItem),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 피드백", body = ErrorResponse)
    ),
    tag = "Feedback"
)]
pub async fn create_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(feedback_id): Path<String>,
    payload: Result<Json<CreateCommentRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<CommentItem>>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let result =
        FeedbackService::create_comment(state, user.user_id(), &feedback_id, req).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 상태 변경 API (모더레이터 전용)
#[utoipa::path(
    patch,
    path = "/api/feedback/{feedback_id}/status",
    params(("feedback_id" = String, Path, description = "피드백 ID")),
    request_body = UpdateStatusRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "변경 성공", body = FeedbackListItem),
        (status = 400, description = "병합 대상 누락", body = ErrorResponse),
        (status = 403, description = "모더레이터가 아님", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 피드백", body = ErrorResponse)
    ),
    tag = "Feedback"
)]
pub async fn update_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(feedback_id): Path<String>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<FeedbackListItem>>, AppError> {
    let Json(req) = payload?;

    let result =
        FeedbackService::update_status(state, user.user_id(), &feedback_id, req).await?;

    Ok(Json(BaseResponse::success(result)))
}
