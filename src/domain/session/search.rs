use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QuerySelect, QueryTrait, Select};

use super::dto::SessionSearchQuery;
use super::entity::game_session::{self, SessionPhase, SessionVisibility};
use super::entity::session_participant;
use crate::search::params::{non_empty, parse_enum_list};
use crate::search::pattern::text_match;
use crate::search::{Page, SortSpec};

/// 시나리오 조건
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioFilter {
    Is(String),
    Undecided,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionSort {
    #[default]
    Newest,
    /// 예정 시각 빠른 순, 미정은 뒤로
    Scheduled,
}

impl SessionSort {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("scheduled") => SessionSort::Scheduled,
            _ => SessionSort::Newest,
        }
    }

    pub fn spec(self) -> SortSpec<game_session::Column> {
        match self {
            SessionSort::Newest => SortSpec::desc(game_session::Column::CreatedAt),
            SessionSort::Scheduled => SortSpec::asc(game_session::Column::ScheduledAt).nulls_last(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSearchParams {
    pub phases: Vec<SessionPhase>,
    pub keyword: Option<String>,
    pub scenario: Option<ScenarioFilter>,
    pub sort: SessionSort,
    pub page: Page,
}

fn is_true(raw: Option<&str>) -> bool {
    matches!(
        non_empty(raw).map(|s| s.to_ascii_lowercase()).as_deref(),
        Some("true" | "1")
    )
}

impl SessionSearchQuery {
    pub fn to_search_params(&self) -> SessionSearchParams {
        let scenario = if is_true(self.scenario_undecided.as_deref()) {
            Some(ScenarioFilter::Undecided)
        } else {
            non_empty(self.scenario_id.as_deref()).map(ScenarioFilter::Is)
        };

        SessionSearchParams {
            phases: parse_enum_list(self.phases.as_deref()),
            keyword: non_empty(self.q.as_deref()),
            scenario,
            sort: SessionSort::parse(self.sort.as_deref()),
            page: Page::from_raw(self.limit.as_deref(), self.offset.as_deref()),
        }
    }
}

/// 공개 세션만 대상으로 단계 → 키워드 → 시나리오 순으로 필터를 붙입니다.
pub fn compose_query(params: &SessionSearchParams) -> Select<game_session::Entity> {
    let mut query = game_session::Entity::find()
        .filter(game_session::Column::Visibility.eq(SessionVisibility::Public));

    if !params.phases.is_empty() {
        query = query.filter(game_session::Column::Phase.is_in(params.phases.clone()));
    }

    if let Some(keyword) = &params.keyword {
        query = query.filter(text_match(
            &[game_session::Column::Name, game_session::Column::Description],
            keyword,
        ));
    }

    match &params.scenario {
        Some(ScenarioFilter::Is(scenario_id)) => {
            query = query.filter(game_session::Column::ScenarioId.eq(scenario_id.as_str()));
        }
        Some(ScenarioFilter::Undecided) => {
            query = query.filter(game_session::Column::ScenarioId.is_null());
        }
        None => {}
    }

    query
}

/// 사용자가 참가(대기 포함)한 세션 중 주어진 단계에 있는 것
pub fn participating_query(user_id: &str, phases: &[SessionPhase]) -> Select<game_session::Entity> {
    let session_ids = session_participant::Entity::find()
        .select_only()
        .column(session_participant::Column::SessionId)
        .filter(session_participant::Column::UserId.eq(user_id))
        .into_query();

    game_session::Entity::find()
        .filter(game_session::Column::Id.in_subquery(session_ids))
        .filter(game_session::Column::Phase.is_in(phases.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DbBackend;

    #[test]
    fn undecided_should_win_over_scenario_id() {
        let query = SessionSearchQuery {
            scenario_id: Some("01S".to_string()),
            scenario_undecided: Some("true".to_string()),
            ..Default::default()
        };

        assert_eq!(query.to_search_params().scenario, Some(ScenarioFilter::Undecided));
    }

    #[test]
    fn should_parse_phases_and_drop_unknown() {
        let query = SessionSearchQuery {
            phases: Some("recruiting,SLEEPING,IN_PROGRESS".to_string()),
            ..Default::default()
        };

        assert_eq!(
            query.to_search_params().phases,
            vec![SessionPhase::Recruiting, SessionPhase::InProgress]
        );
    }

    #[test]
    fn compose_should_always_limit_to_public() {
        let sql = compose_query(&SessionSearchParams::default())
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains("'PUBLIC'"));
    }

    #[test]
    fn compose_should_filter_undecided_scenario() {
        let params = SessionSearchParams {
            scenario: Some(ScenarioFilter::Undecided),
            ..Default::default()
        };

        let sql = compose_query(&params).build(DbBackend::Postgres).to_string();

        assert!(sql.contains(r#""scenario_id" IS NULL"#));
    }

    #[test]
    fn scheduled_sort_should_put_nulls_last() {
        let spec = SessionSort::parse(Some("scheduled")).spec();

        assert!(spec.nulls_last);
        assert_eq!(SessionSort::parse(Some("oldest")), SessionSort::Newest);
    }
}
