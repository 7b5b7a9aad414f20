use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use super::dto::{
    CreateScenarioRequest, ImportScenarioRequest, ImportScenarioResponse, ScenarioItem,
    ScenarioSearchResponse, SystemItem, TagItem,
};
use super::entity::scenario::{self, ScenarioSource};
use super::entity::{game_system, scenario_tag, tag};
use super::search::{compose_query, resolve_tag_filter, ScenarioSearchParams};
use crate::domain::user::service::UserService;
use crate::search::sort_and_paginate;
use crate::state::AppState;
use crate::utils::datetime::{format_iso, now};
use crate::utils::error::AppError;
use crate::utils::id::new_id;

/// 배포 URL 끝의 '/'를 제거합니다. 비어 있으면 None.
pub fn normalize_distribute_url(raw: Option<&str>) -> Option<String> {
    raw.map(|url| url.trim().trim_end_matches('/'))
        .filter(|url| !url.is_empty())
        .map(str::to_string)
}

pub struct ScenarioService;

impl ScenarioService {
    /// 시나리오 검색
    pub async fn search(
        state: AppState,
        params: ScenarioSearchParams,
    ) -> Result<ScenarioSearchResponse, AppError> {
        let scenario_ids = resolve_tag_filter(&state.db, &params.tag_ids).await?;

        // 태그를 모두 가진 시나리오가 없으면 본 쿼리 생략
        if matches!(&scenario_ids, Some(ids) if ids.is_empty()) {
            info!(tag_ids = ?params.tag_ids, "태그 조건을 만족하는 시나리오 없음");
            return Ok(ScenarioSearchResponse::empty());
        }

        let query = compose_query(&params, scenario_ids);
        let total_count = query.clone().count(&state.db).await?;

        let models = sort_and_paginate(
            query,
            params.sort.spec(),
            scenario::Column::Id,
            params.page,
        )
        .all(&state.db)
        .await?;

        let scenarios = Self::to_items(&state.db, models).await?;

        info!(
            result_count = scenarios.len(),
            total_count = total_count,
            "시나리오 검색 완료"
        );

        Ok(ScenarioSearchResponse {
            scenarios,
            total_count,
        })
    }

    /// 시나리오 상세
    pub async fn get_detail(state: AppState, scenario_id: &str) -> Result<ScenarioItem, AppError> {
        let model = scenario::Entity::find_by_id(scenario_id.to_string())
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::not_found("존재하지 않는 시나리오입니다."))?;

        Self::to_item(&state.db, model).await
    }

    /// 시나리오 등록
    ///
    /// 배포 URL 중복과 (이름, 시스템) 중복을 먼저 확인한 뒤, 시나리오와 태그 연결을
    /// 하나의 트랜잭션으로 저장합니다.
    pub async fn create(
        state: AppState,
        user_id: &str,
        req: CreateScenarioRequest,
    ) -> Result<ScenarioItem, AppError> {
        UserService::find_user(&state.db, user_id).await?;

        let name = req.name.trim().to_string();
        let distribute_url = normalize_distribute_url(req.distribute_url.as_deref());

        if let Some(url) = &distribute_url {
            let duplicated = scenario::Entity::find()
                .filter(scenario::Column::DistributeUrl.eq(url.as_str()))
                .one(&state.db)
                .await?;
            if duplicated.is_some() {
                return Err(AppError::conflict("이미 등록된 배포 URL입니다."));
            }
        }

        let duplicated_name = scenario::Entity::find()
            .filter(scenario::Column::Name.eq(name.as_str()))
            .filter(scenario::Column::SystemId.eq(req.system_id.as_str()))
            .one(&state.db)
            .await?;
        if duplicated_name.is_some() {
            return Err(AppError::conflict(
                "같은 게임 시스템에 같은 이름의 시나리오가 이미 있습니다.",
            ));
        }

        game_system::Entity::find_by_id(req.system_id.clone())
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::bad_request("존재하지 않는 게임 시스템입니다."))?;

        let mut tag_ids: Vec<String> = Vec::new();
        for tag_id in req.tag_ids {
            if !tag_ids.contains(&tag_id) {
                tag_ids.push(tag_id);
            }
        }
        if !tag_ids.is_empty() {
            let found = tag::Entity::find()
                .filter(tag::Column::Id.is_in(tag_ids.clone()))
                .count(&state.db)
                .await?;
            if found as usize != tag_ids.len() {
                return Err(AppError::bad_request("존재하지 않는 태그가 포함되어 있습니다."));
            }
        }

        let (source_type, external_id) = match req.source_type {
            Some(ScenarioSource::Manual) | None => (ScenarioSource::Manual, None),
            Some(source) => (source, req.external_id.filter(|id| !id.trim().is_empty())),
        };

        let txn = state.db.begin().await?;

        let timestamp = now();
        let model = scenario::ActiveModel {
            id: Set(new_id()),
            name: Set(name),
            system_id: Set(req.system_id),
            author: Set(req.author.map(|a| a.trim().to_string()).filter(|a| !a.is_empty())),
            description: Set(req.description),
            min_player: Set(req.min_player),
            max_player: Set(req.max_player),
            min_playtime: Set(req.min_playtime),
            max_playtime: Set(req.max_playtime),
            image_url: Set(req.image_url),
            distribute_url: Set(distribute_url),
            source_type: Set(source_type),
            external_id: Set(external_id),
            created_by: Set(user_id.to_string()),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        }
        .insert(&txn)
        .await?;

        if !tag_ids.is_empty() {
            let links = tag_ids.iter().map(|tag_id| scenario_tag::ActiveModel {
                scenario_id: Set(model.id.clone()),
                tag_id: Set(tag_id.clone()),
            });
            scenario_tag::Entity::insert_many(links)
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;

        info!(
            user_id = user_id,
            scenario_id = %model.id,
            tag_count = tag_ids.len(),
            "시나리오 등록 완료"
        );

        Self::to_item(&state.db, model).await
    }

    /// 외부 URL에서 메타데이터를 읽어 등록 폼 미리보기를 만듭니다.
    pub async fn import(
        state: AppState,
        req: ImportScenarioRequest,
    ) -> Result<ImportScenarioResponse, AppError> {
        let parsed = state.scraper.scrape(&req.url).await?;

        let existing_scenario_id = scenario::Entity::find()
            .filter(scenario::Column::DistributeUrl.eq(parsed.distribute_url.as_str()))
            .one(&state.db)
            .await?
            .map(|s| s.id);

        Ok(ImportScenarioResponse {
            parsed,
            existing_scenario_id,
        })
    }

    /// 태그 목록 (이름순)
    pub async fn list_tags(state: AppState) -> Result<Vec<TagItem>, AppError> {
        let tags = tag::Entity::find()
            .order_by_asc(tag::Column::Name)
            .all(&state.db)
            .await?;

        Ok(tags
            .into_iter()
            .map(|t| TagItem {
                tag_id: t.id,
                name: t.name,
            })
            .collect())
    }

    /// 게임 시스템 목록 (이름순)
    pub async fn list_systems(state: AppState) -> Result<Vec<SystemItem>, AppError> {
        let systems = game_system::Entity::find()
            .order_by_asc(game_system::Column::Name)
            .all(&state.db)
            .await?;

        Ok(systems
            .into_iter()
            .map(|s| SystemItem {
                system_id: s.id,
                name: s.name,
            })
            .collect())
    }

    async fn to_item<C>(db: &C, model: scenario::Model) -> Result<ScenarioItem, AppError>
    where
        C: ConnectionTrait,
    {
        Self::to_items(db, vec![model])
            .await?
            .pop()
            .ok_or_else(|| AppError::internal_error("scenario item conversion failed"))
    }

    /// 시스템 이름과 태그를 붙여 응답 항목으로 변환 (입력 순서 유지)
    async fn to_items<C>(db: &C, models: Vec<scenario::Model>) -> Result<Vec<ScenarioItem>, AppError>
    where
        C: ConnectionTrait,
    {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let system_ids: Vec<String> = models.iter().map(|m| m.system_id.clone()).collect();
        let systems: HashMap<String, String> = game_system::Entity::find()
            .filter(game_system::Column::Id.is_in(system_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();

        let scenario_ids: Vec<String> = models.iter().map(|m| m.id.clone()).collect();
        let links = scenario_tag::Entity::find()
            .filter(scenario_tag::Column::ScenarioId.is_in(scenario_ids))
            .find_also_related(tag::Entity)
            .order_by_asc(scenario_tag::Column::TagId)
            .all(db)
            .await?;

        let mut tags_by_scenario: HashMap<String, Vec<TagItem>> = HashMap::new();
        for (link, tag) in links {
            if let Some(tag) = tag {
                tags_by_scenario
                    .entry(link.scenario_id)
                    .or_default()
                    .push(TagItem {
                        tag_id: tag.id,
                        name: tag.name,
                    });
            }
        }

        Ok(models
            .into_iter()
            .map(|m| ScenarioItem {
                system: SystemItem {
                    name: systems.get(&m.system_id).cloned().unwrap_or_default(),
                    system_id: m.system_id,
                },
                tags: tags_by_scenario.remove(&m.id).unwrap_or_default(),
                scenario_id: m.id,
                name: m.name,
                author: m.author,
                description: m.description,
                min_player: m.min_player,
                max_player: m.max_player,
                min_playtime: m.min_playtime,
                max_playtime: m.max_playtime,
                image_url: m.image_url,
                distribute_url: m.distribute_url,
                source_type: m.source_type,
                created_at: format_iso(&m.created_at),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::database::establish_connection;
    use crate::config::AppConfig;
    use crate::domain::scenario::scraper::{MockScenarioScraperTrait, ParsedScenario};

    #[test]
    fn should_strip_trailing_slashes() {
        assert_eq!(
            normalize_distribute_url(Some(" https://booth.pm/ja/items/1// ")),
            Some("https://booth.pm/ja/items/1".to_string())
        );
        assert_eq!(normalize_distribute_url(Some("///")), None);
        assert_eq!(normalize_distribute_url(None), None);
    }

    #[tokio::test]
    async fn import_should_return_scraped_preview() {
        // Arrange
        let db = establish_connection("sqlite::memory:", true).await.unwrap();
        let mut scraper = MockScenarioScraperTrait::new();
        scraper.expect_scrape().times(1).returning(|url| {
            Ok(ParsedScenario {
                name: "밤의 저택".to_string(),
                author: None,
                description: None,
                image_url: None,
                distribute_url: url.trim_end_matches('/').to_string(),
                source_type: ScenarioSource::Booth,
                external_id: "1".to_string(),
            })
        });
        let state = AppState {
            db,
            config: AppConfig::for_database("sqlite::memory:"),
            scraper: Arc::new(scraper),
        };

        // Act
        let result = ScenarioService::import(
            state,
            ImportScenarioRequest {
                url: "https://booth.pm/ja/items/1/".to_string(),
            },
        )
        .await
        .unwrap();

        // Assert
        assert_eq!(result.parsed.name, "밤의 저택");
        assert_eq!(result.parsed.distribute_url, "https://booth.pm/ja/items/1");
        assert_eq!(result.existing_scenario_id, None);
    }

    #[tokio::test]
    async fn import_should_propagate_scraper_error() {
        // Arrange
        let db = establish_connection("sqlite::memory:", true).await.unwrap();
        let mut scraper = MockScenarioScraperTrait::new();
        scraper
            .expect_scrape()
            .returning(|_| Err(AppError::ExternalServiceError("timeout".to_string())));
        let state = AppState {
            db,
            config: AppConfig::for_database("sqlite::memory:"),
            scraper: Arc::new(scraper),
        };

        // Act
        let result = ScenarioService::import(
            state,
            ImportScenarioRequest {
                url: "https://talto.cc/projects/x".to_string(),
            },
        )
        .await;

        // Assert
        assert!(matches!(result, Err(AppError::ExternalServiceError(_))));
    }
}
