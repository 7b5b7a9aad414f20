mod common;

use common::{seed_scenario, seed_system, seed_tag, seed_user, test_state, ScenarioSeed};
use trpg_server::domain::scenario::dto::{
    CreateScenarioRequest, ImportScenarioRequest, ScenarioSearchQuery,
};
use trpg_server::domain::scenario::service::ScenarioService;
use trpg_server::domain::user::entity::user::UserRole;
use trpg_server::utils::error::AppError;
use trpg_server::AppState;

/// 태그/시스템/인원/시간이 서로 다른 시나리오 4개
///
/// | id | system | players | playtime | tags |
/// |----|--------|---------|----------|------|
/// | s1 | coc    | 2..4    | 120..240 | horror, short |
/// | s2 | coc    | 5..8    | 300..600 | horror |
/// | s3 | dnd    | -       | -        | short |
/// | s4 | dnd    | 1..1    | 60..60   | - |
async fn seeded_state() -> AppState {
    let state = test_state().await;
    seed_user(&state.db, "u1", UserRole::User).await;
    seed_system(&state.db, "coc", "크툴루의 부름").await;
    seed_system(&state.db, "dnd", "던전 앤 드래곤").await;
    seed_tag(&state.db, "horror").await;
    seed_tag(&state.db, "short").await;

    seed_scenario(
        &state.db,
        "u1",
        ScenarioSeed {
            id: "s1",
            name: "안개 낀 항구",
            system_id: "coc",
            players: (Some(2), Some(4)),
            playtime: (Some(120), Some(240)),
            tags: &["horror", "short"],
            created_at: "2026-01-01 00:00:00",
        },
    )
    .await;
    seed_scenario(
        &state.db,
        "u1",
        ScenarioSeed {
            id: "s2",
            name: "깊은 곳의 목소리",
            system_id: "coc",
            players: (Some(5), Some(8)),
            playtime: (Some(300), Some(600)),
            tags: &["horror"],
            created_at: "2026-01-02 00:00:00",
        },
    )
    .await;
    seed_scenario(
        &state.db,
        "u1",
        ScenarioSeed {
            id: "s3",
            name: "고블린 동굴",
            system_id: "dnd",
            players: (None, None),
            playtime: (None, None),
            tags: &["short"],
            created_at: "2026-01-03 00:00:00",
        },
    )
    .await;
    seed_scenario(
        &state.db,
        "u1",
        ScenarioSeed {
            id: "s4",
            name: "나홀로 던전",
            system_id: "dnd",
            players: (Some(1), Some(1)),
            playtime: (Some(60), Some(60)),
            tags: &[],
            created_at: "2026-01-04 00:00:00",
        },
    )
    .await;

    state
}

async fn search_ids(state: &AppState, query: ScenarioSearchQuery) -> (Vec<String>, u64) {
    let result = ScenarioService::search(state.clone(), query.to_search_params())
        .await
        .unwrap();
    let ids = result.scenarios.into_iter().map(|s| s.scenario_id).collect();
    (ids, result.total_count)
}

fn create_request(name: &str, system_id: &str, url: Option<&str>, tags: &[&str]) -> CreateScenarioRequest {
    CreateScenarioRequest {
        name: name.to_string(),
        system_id: system_id.to_string(),
        author: None,
        description: None,
        min_player: Some(3),
        max_player: Some(5),
        min_playtime: None,
        max_playtime: None,
        image_url: None,
        distribute_url: url.map(str::to_string),
        tag_ids: tags.iter().map(|t| t.to_string()).collect(),
        source_type: None,
        external_id: None,
    }
}

mod search {
    use super::*;

    #[tokio::test]
    async fn no_filter_should_return_all_newest_first() {
        let state = seeded_state().await;

        let (ids, total) = search_ids(&state, ScenarioSearchQuery::default()).await;

        assert_eq!(ids, vec!["s4", "s3", "s2", "s1"]);
        assert_eq!(total, 4);
    }

    #[tokio::test]
    async fn tags_should_require_every_tag() {
        // Arrange
        let state = seeded_state().await;
        let query = ScenarioSearchQuery {
            tags: Some("horror,short".to_string()),
            ..Default::default()
        };

        // Act
        let (ids, total) = search_ids(&state, query).await;

        // Assert
        assert_eq!(ids, vec!["s1"]);
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn unmatched_tag_should_return_empty() {
        let state = seeded_state().await;
        let query = ScenarioSearchQuery {
            tags: Some("horror,unknown".to_string()),
            ..Default::default()
        };

        let (ids, total) = search_ids(&state, query).await;

        assert!(ids.is_empty());
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn systems_should_match_any_listed_system() {
        let state = seeded_state().await;
        let query = ScenarioSearchQuery {
            systems: Some("dnd, none".to_string()),
            ..Default::default()
        };

        let (ids, _) = search_ids(&state, query).await;

        assert_eq!(ids, vec!["s4", "s3"]);
    }

    #[tokio::test]
    async fn player_range_should_use_overlap_and_match_open_bounds() {
        // Arrange
        let state = seeded_state().await;
        let query = ScenarioSearchQuery {
            min_player: Some("4".to_string()),
            max_player: Some("5".to_string()),
            ..Default::default()
        };

        // Act
        let (ids, _) = search_ids(&state, query).await;

        // Assert
        // s1(2..4)와 s2(5..8)는 경계에서 겹치고, s3는 인원 정보가 없어 포함
        assert_eq!(ids, vec!["s3", "s2", "s1"]);
    }

    #[tokio::test]
    async fn inverted_playtime_bounds_should_be_swapped() {
        let state = seeded_state().await;
        let query = ScenarioSearchQuery {
            min_playtime: Some("90".to_string()),
            max_playtime: Some("30".to_string()),
            ..Default::default()
        };

        let (ids, _) = search_ids(&state, query).await;

        assert_eq!(ids, vec!["s4", "s3"]);
    }

    #[tokio::test]
    async fn keyword_should_match_name_and_compose_with_tags() {
        let state = seeded_state().await;
        let query = ScenarioSearchQuery {
            tags: Some("horror".to_string()),
            q: Some("항구".to_string()),
            ..Default::default()
        };

        let (ids, total) = search_ids(&state, query).await;

        assert_eq!(ids, vec!["s1"]);
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn playtime_asc_should_put_unknown_playtime_last() {
        let state = seeded_state().await;
        let query = ScenarioSearchQuery {
            sort: Some("playtime_asc".to_string()),
            ..Default::default()
        };

        let (ids, _) = search_ids(&state, query).await;

        assert_eq!(ids, vec!["s4", "s1", "s2", "s3"]);
    }

    #[tokio::test]
    async fn limit_and_offset_should_page_without_changing_total() {
        let state = seeded_state().await;
        let query = ScenarioSearchQuery {
            limit: Some("2".to_string()),
            offset: Some("2".to_string()),
            ..Default::default()
        };

        let (ids, total) = search_ids(&state, query).await;

        assert_eq!(ids, vec!["s2", "s1"]);
        assert_eq!(total, 4);
    }

    #[tokio::test]
    async fn overflowing_offset_should_fall_back_to_first_page() {
        // Arrange
        let state = seeded_state().await;
        let query = ScenarioSearchQuery {
            offset: Some("18446744073709551615".to_string()),
            ..Default::default()
        };

        // Act
        let (ids, total) = search_ids(&state, query).await;

        // Assert
        assert_eq!(ids, vec!["s4", "s3", "s2", "s1"]);
        assert_eq!(total, 4);
    }

    #[tokio::test]
    async fn min_player_only_should_use_default_max() {
        // Arrange
        let state = seeded_state().await;
        let query = ScenarioSearchQuery {
            min_player: Some("6".to_string()),
            ..Default::default()
        };

        // Act
        let (ids, _) = search_ids(&state, query).await;

        // Assert
        // s2(5..8)만 6명 이상을 수용하고, s3는 인원 정보가 없어 포함
        assert_eq!(ids, vec!["s3", "s2"]);
    }

    #[tokio::test]
    async fn min_player_beyond_default_max_should_keep_user_bound() {
        let state = seeded_state().await;
        let query = ScenarioSearchQuery {
            min_player: Some("25".to_string()),
            ..Default::default()
        };

        let (ids, _) = search_ids(&state, query).await;

        // {25, 20}은 어떤 구간과도 겹치지 않으므로 인원 정보가 없는 s3만 남음
        assert_eq!(ids, vec!["s3"]);
    }

    #[tokio::test]
    async fn items_should_carry_system_and_tags() {
        let state = seeded_state().await;

        let item = ScenarioService::get_detail(state, "s1").await.unwrap();

        assert_eq!(item.system.system_id, "coc");
        assert_eq!(item.system.name, "크툴루의 부름");
        let mut tags: Vec<String> = item.tags.into_iter().map(|t| t.tag_id).collect();
        tags.sort();
        assert_eq!(tags, vec!["horror", "short"]);
    }
}

mod create {
    use super::*;

    #[tokio::test]
    async fn should_create_scenario_with_tags() {
        // Arrange
        let state = seeded_state().await;
        let req = create_request(
            "새 시나리오",
            "coc",
            Some("https://booth.pm/ja/items/42/"),
            &["horror", "horror", "short"],
        );

        // Act
        let created = ScenarioService::create(state.clone(), "u1", req).await.unwrap();

        // Assert
        assert_eq!(created.distribute_url.as_deref(), Some("https://booth.pm/ja/items/42"));
        assert_eq!(created.tags.len(), 2);
        let query = ScenarioSearchQuery {
            tags: Some("horror,short".to_string()),
            ..Default::default()
        };
        let (ids, _) = search_ids(&state, query).await;
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&created.scenario_id));
    }

    #[tokio::test]
    async fn trailing_slash_should_not_bypass_url_duplicate_check() {
        // Arrange
        let state = seeded_state().await;
        ScenarioService::create(
            state.clone(),
            "u1",
            create_request("첫 번째", "coc", Some("https://booth.pm/ja/items/7"), &[]),
        )
        .await
        .unwrap();

        // Act
        let result = ScenarioService::create(
            state,
            "u1",
            create_request("두 번째", "dnd", Some("https://booth.pm/ja/items/7/"), &[]),
        )
        .await;

        // Assert
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn same_name_in_same_system_should_conflict() {
        let state = seeded_state().await;

        let same_system =
            ScenarioService::create(state.clone(), "u1", create_request("고블린 동굴", "dnd", None, &[])).await;
        let other_system =
            ScenarioService::create(state, "u1", create_request("고블린 동굴", "coc", None, &[])).await;

        assert!(matches!(same_system, Err(AppError::Conflict(_))));
        assert!(other_system.is_ok());
    }

    #[tokio::test]
    async fn unknown_system_or_tag_should_be_bad_request() {
        let state = seeded_state().await;

        let unknown_system =
            ScenarioService::create(state.clone(), "u1", create_request("a", "gurps", None, &[])).await;
        let unknown_tag =
            ScenarioService::create(state, "u1", create_request("b", "coc", None, &["missing"])).await;

        assert!(matches!(unknown_system, Err(AppError::BadRequest(_))));
        assert!(matches!(unknown_tag, Err(AppError::BadRequest(_))));
    }
}

mod catalog {
    use super::*;

    #[tokio::test]
    async fn tags_and_systems_should_be_listed_by_name() {
        let state = seeded_state().await;

        let tags = ScenarioService::list_tags(state.clone()).await.unwrap();
        let systems = ScenarioService::list_systems(state).await.unwrap();

        let tag_names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(tag_names, vec!["horror", "short"]);
        let system_ids: Vec<&str> = systems.iter().map(|s| s.system_id.as_str()).collect();
        assert_eq!(system_ids, vec!["dnd", "coc"]);
    }

    #[tokio::test]
    async fn import_should_point_to_existing_scenario() {
        // Arrange
        let state = seeded_state().await;
        let created = ScenarioService::create(
            state.clone(),
            "u1",
            create_request("기존", "coc", Some("https://booth.pm/ja/items/1"), &[]),
        )
        .await
        .unwrap();

        // Act
        let imported = ScenarioService::import(
            state,
            ImportScenarioRequest {
                url: "https://booth.pm/ja/items/1/".to_string(),
            },
        )
        .await
        .unwrap();

        // Assert
        assert_eq!(imported.parsed.name, "스텁 시나리오");
        assert_eq!(imported.existing_scenario_id, Some(created.scenario_id));
    }
}
