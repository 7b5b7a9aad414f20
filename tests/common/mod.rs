#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDateTime;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use trpg_server::config::{establish_connection, AppConfig};
use trpg_server::domain::feedback::entity::feedback::{self, FeedbackCategory, FeedbackStatus};
use trpg_server::domain::scenario::entity::scenario::{self, ScenarioSource};
use trpg_server::domain::scenario::entity::{game_system, scenario_tag, tag};
use trpg_server::domain::scenario::scraper::{ParsedScenario, ScenarioScraperTrait};
use trpg_server::domain::user::entity::user::{self, UserRole};
use trpg_server::utils::datetime::now;
use trpg_server::utils::error::AppError;
use trpg_server::utils::jwt::encode_token;
use trpg_server::AppState;

pub const IN_MEMORY_DB: &str = "sqlite::memory:";

/// 네트워크 없이 고정된 결과를 돌려주는 스크래퍼
pub struct StubScraper;

#[async_trait::async_trait]
impl ScenarioScraperTrait for StubScraper {
    async fn scrape(&self, url: &str) -> Result<ParsedScenario, AppError> {
        if !url.contains("booth.pm") {
            return Err(AppError::bad_request("지원하지 않는 URL입니다."));
        }
        Ok(ParsedScenario {
            name: "스텁 시나리오".to_string(),
            author: Some("스텁 작가".to_string()),
            description: None,
            image_url: None,
            distribute_url: url.trim_end_matches('/').to_string(),
            source_type: ScenarioSource::Booth,
            external_id: "1".to_string(),
        })
    }
}

pub async fn test_state() -> AppState {
    let db = establish_connection(IN_MEMORY_DB, true).await.unwrap();
    AppState {
        db,
        config: AppConfig::for_database(IN_MEMORY_DB),
        scraper: Arc::new(StubScraper),
    }
}

pub fn bearer(state: &AppState, user_id: &str) -> String {
    let token = encode_token(user_id.to_string(), &state.config.jwt_secret, 3600).unwrap();
    format!("Bearer {}", token)
}

pub fn at(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").unwrap()
}

pub async fn seed_user(db: &DatabaseConnection, id: &str, role: UserRole) -> user::Model {
    user::ActiveModel {
        id: Set(id.to_string()),
        name: Set(format!("{}-name", id)),
        role: Set(role),
        created_at: Set(now()),
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn seed_feedback(
    db: &DatabaseConnection,
    id: &str,
    author_id: &str,
    category: FeedbackCategory,
    status: FeedbackStatus,
    title: &str,
    created_at: &str,
) -> feedback::Model {
    feedback::ActiveModel {
        id: Set(id.to_string()),
        category: Set(category),
        status: Set(status),
        priority: Set(None),
        title: Set(title.to_string()),
        description: Set(format!("{} 본문", title)),
        vote_count: Set(0),
        comment_count: Set(0),
        author_id: Set(author_id.to_string()),
        merged_into_id: Set(None),
        created_at: Set(at(created_at)),
        updated_at: Set(at(created_at)),
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn seed_system(db: &DatabaseConnection, id: &str, name: &str) {
    game_system::ActiveModel {
        id: Set(id.to_string()),
        name: Set(name.to_string()),
    }
    .insert(db)
    .await
    .unwrap();
}

pub async fn seed_tag(db: &DatabaseConnection, id: &str) {
    tag::ActiveModel {
        id: Set(id.to_string()),
        name: Set(id.to_string()),
    }
    .insert(db)
    .await
    .unwrap();
}

/// 시나리오 + 태그 연결 직접 삽입
pub struct ScenarioSeed<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub system_id: &'a str,
    pub players: (Option<i32>, Option<i32>),
    pub playtime: (Option<i32>, Option<i32>),
    pub tags: &'a [&'a str],
    pub created_at: &'a str,
}

pub async fn seed_scenario(db: &DatabaseConnection, created_by: &str, seed: ScenarioSeed<'_>) {
    scenario::ActiveModel {
        id: Set(seed.id.to_string()),
        name: Set(seed.name.to_string()),
        system_id: Set(seed.system_id.to_string()),
        author: Set(None),
        description: Set(None),
        min_player: Set(seed.players.0),
        max_player: Set(seed.players.1),
        min_playtime: Set(seed.playtime.0),
        max_playtime: Set(seed.playtime.1),
        image_url: Set(None),
        distribute_url: Set(None),
        source_type: Set(ScenarioSource::Manual),
        external_id: Set(None),
        created_by: Set(created_by.to_string()),
        created_at: Set(at(seed.created_at)),
        updated_at: Set(at(seed.created_at)),
    }
    .insert(db)
    .await
    .unwrap();

    for tag_id in seed.tags {
        scenario_tag::ActiveModel {
            scenario_id: Set(seed.id.to_string()),
            tag_id: Set(tag_id.to_string()),
        }
        .insert(db)
        .await
        .unwrap();
    }
}
