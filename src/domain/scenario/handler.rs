use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use validator::Validate;

use super::dto::{
    CreateScenarioRequest, ImportScenarioRequest, ImportScenarioResponse, ScenarioItem,
    ScenarioSearchQuery, ScenarioSearchResponse, SystemItem, TagItem,
};
use super::service::ScenarioService;
use crate::state::AppState;
use crate::utils::auth::AuthUser;
use crate::utils::error::AppError;
use crate::utils::{BaseResponse, ErrorResponse};

/// 시나리오 검색 API
///
/// 시스템(OR), 태그(AND), 키워드, 인원/플레이 시간 범위로 필터링합니다.
#[utoipa::path(
    get,
    path = "/api/scenarios/search",
    params(ScenarioSearchQuery),
    responses(
        (status = 200, description = "검색 성공", body = ScenarioSearchResponse)
    ),
    tag = "Scenario"
)]
pub async fn search_scenarios(
    State(state): State<AppState>,
    query: Result<Query<ScenarioSearchQuery>, QueryRejection>,
) -> Result<Json<BaseResponse<ScenarioSearchResponse>>, AppError> {
    let Query(query) = query?;

    let result = ScenarioService::search(state, query.to_search_params()).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 시나리오 등록 API
#[utoipa::path(
    post,
    path = "/api/scenarios",
    request_body = CreateScenarioRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "등록 성공", body = ScenarioItem),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse),
        (status = 409, description = "배포 URL 또는 이름 중복", body = ErrorResponse)
    ),
    tag = "Scenario"
)]
pub async fn create_scenario(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CreateScenarioRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<ScenarioItem>>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let result = ScenarioService::create(state, user.user_id(), req).await?;

    Ok(Json(BaseResponse::success_with_message(
        result,
        "시나리오가 등록되었습니다.",
    )))
}

/// 시나리오 상세 API
#[utoipa::path(
    get,
    path = "/api/scenarios/{scenario_id}",
    params(("scenario_id" = String, Path, description = "시나리오 ID")),
    responses(
        (status = 200, description = "조회 성공", body = ScenarioItem),
        (status = 404, description = "존재하지 않는 시나리오", body = ErrorResponse)
    ),
    tag = "Scenario"
)]
pub async fn get_scenario(
    State(state): State<AppState>,
    Path(scenario_id): Path<String>,
) -> Result<Json<BaseResponse<ScenarioItem>>, AppError> {
    let result = ScenarioService::get_detail(state, &scenario_id).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 외부 시나리오 가져오기 API
///
/// Booth/TALTO URL에서 메타데이터를 읽어 등록 폼용 미리보기를 돌려줍니다. 저장하지 않습니다.
#[utoipa::path(
    post,
    path = "/api/scenarios/import",
    request_body = ImportScenarioRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "가져오기 성공", body = ImportScenarioResponse),
        (status = 400, description = "지원하지 않는 URL", body = ErrorResponse),
        (status = 502, description = "외부 사이트 오류", body = ErrorResponse)
    ),
    tag = "Scenario"
)]
pub async fn import_scenario(
    State(state): State<AppState>,
    _user: AuthUser,
    payload: Result<Json<ImportScenarioRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<ImportScenarioResponse>>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let result = ScenarioService::import(state, req).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 태그 목록 API
#[utoipa::path(
    get,
    path = "/api/tags",
    responses((status = 200, description = "조회 성공", body = [TagItem])),
    tag = "Scenario"
)]
pub async fn list_tags(
    State(state): State<AppState>,
) -> Result<Json<BaseResponse<Vec<TagItem>>>, AppError> {
    let result = ScenarioService::list_tags(state).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 게임 시스템 목록 API
#[utoipa::path(
    get,
    path = "/api/systems",
    responses((status = 200, description = "조회 성공", body = [SystemItem])),
    tag = "Scenario"
)]
pub async fn list_systems(
    State(state): State<AppState>,
) -> Result<Json<BaseResponse<Vec<SystemItem>>>, AppError> {
    let result = ScenarioService::list_systems(state).await?;

    Ok(Json(BaseResponse::success(result)))
}
