use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use super::entity::scenario::ScenarioSource;
use super::scraper::ParsedScenario;

// ============== 시나리오 검색 ==============

/// `/api/scenarios/search` 쿼리 문자열 (가공 전)
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSearchQuery {
    /// 쉼표 구분 게임 시스템 ID 목록 (하나라도 일치)
    pub systems: Option<String>,
    /// 쉼표 구분 태그 ID 목록 (모두 일치)
    pub tags: Option<String>,
    /// 이름/작가/설명 검색어
    pub q: Option<String>,
    pub min_player: Option<String>,
    pub max_player: Option<String>,
    /// 분 단위
    pub min_playtime: Option<String>,
    /// 분 단위
    pub max_playtime: Option<String>,
    /// newest / name / playtime_asc / playtime_desc
    pub sort: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagItem {
    pub tag_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SystemItem {
    pub system_id: String,
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioItem {
    pub scenario_id: String,
    pub name: String,
    pub system: SystemItem,
    pub author: Option<String>,
    pub description: Option<String>,
    pub min_player: Option<i32>,
    pub max_player: Option<i32>,
    pub min_playtime: Option<i32>,
    pub max_playtime: Option<i32>,
    pub image_url: Option<String>,
    pub distribute_url: Option<String>,
    pub source_type: ScenarioSource,
    pub tags: Vec<TagItem>,
    pub created_at: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSearchResponse {
    pub scenarios: Vec<ScenarioItem>,
    pub total_count: u64,
}

impl ScenarioSearchResponse {
    pub fn empty() -> Self {
        Self {
            scenarios: Vec::new(),
            total_count: 0,
        }
    }
}

// ============== 시나리오 등록 ==============

/// 최소값이 최대값보다 크면 안 됩니다.
fn validate_ranges(req: &CreateScenarioRequest) -> Result<(), ValidationError> {
    if let (Some(min), Some(max)) = (req.min_player, req.max_player) {
        if min > max {
            return Err(ValidationError::new("player_range")
                .with_message(Cow::from("최소 인원은 최대 인원보다 클 수 없습니다.")));
        }
    }
    if let (Some(min), Some(max)) = (req.min_playtime, req.max_playtime) {
        if min > max {
            return Err(ValidationError::new("playtime_range")
                .with_message(Cow::from("최소 플레이 시간은 최대 플레이 시간보다 클 수 없습니다.")));
        }
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_ranges"))]
pub struct CreateScenarioRequest {
    #[validate(length(min = 1, max = 100, message = "시나리오 이름은 1~100자여야 합니다."))]
    pub name: String,

    #[validate(length(min = 1, message = "게임 시스템을 선택해 주세요."))]
    pub system_id: String,

    #[validate(length(max = 100, message = "작가명은 100자 이하여야 합니다."))]
    pub author: Option<String>,

    #[validate(length(max = 5000, message = "설명은 5000자 이하여야 합니다."))]
    pub description: Option<String>,

    #[validate(range(min = 1, max = 100, message = "인원은 1~100명이어야 합니다."))]
    pub min_player: Option<i32>,

    #[validate(range(min = 1, max = 100, message = "인원은 1~100명이어야 합니다."))]
    pub max_player: Option<i32>,

    #[validate(range(min = 1, max = 100000, message = "플레이 시간은 1~100000분이어야 합니다."))]
    pub min_playtime: Option<i32>,

    #[validate(range(min = 1, max = 100000, message = "플레이 시간은 1~100000분이어야 합니다."))]
    pub max_playtime: Option<i32>,

    #[validate(url(message = "이미지 URL 형식이 올바르지 않습니다."))]
    pub image_url: Option<String>,

    #[validate(url(message = "배포 URL 형식이 올바르지 않습니다."))]
    pub distribute_url: Option<String>,

    #[serde(default)]
    pub tag_ids: Vec<String>,

    /// 외부 가져오기로 채운 경우 BOOTH / TALTO
    pub source_type: Option<ScenarioSource>,
    pub external_id: Option<String>,
}

// ============== 외부 가져오기 ==============

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportScenarioRequest {
    #[validate(url(message = "URL 형식이 올바르지 않습니다."))]
    pub url: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportScenarioResponse {
    pub parsed: ParsedScenario,
    /// 같은 배포 URL로 이미 등록된 시나리오가 있으면 그 ID
    pub existing_scenario_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateScenarioRequest {
        serde_json::from_str(r#"{"name":"밤의 저택","systemId":"coc7"}"#).unwrap()
    }

    #[test]
    fn minimal_request_should_be_valid() {
        let req = request();

        assert!(req.tag_ids.is_empty());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn should_reject_inverted_player_range() {
        let mut req = request();
        req.min_player = Some(5);
        req.max_player = Some(3);

        assert!(req.validate().is_err());
    }

    #[test]
    fn should_reject_out_of_bounds_playtime() {
        let mut req = request();
        req.min_playtime = Some(0);

        assert!(req.validate().is_err());
    }

    #[test]
    fn should_reject_non_url_distribute_url() {
        let mut req = request();
        req.distribute_url = Some("booth item 42".to_string());

        assert!(req.validate().is_err());
    }
}
