use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QuerySelect, Select,
};

use super::dto::ScenarioSearchQuery;
use super::entity::{scenario, scenario_tag};
use crate::search::params::{non_empty, parse_int, split_list};
use crate::search::pattern::text_match;
use crate::search::range::overlap_condition;
use crate::search::tags::intersect_by_count;
use crate::search::{IntRange, NullBounds, Page, SortSpec};

/// 인원 한쪽만 지정했을 때 채우는 기본 범위
pub const PLAYER_DEFAULT: IntRange = IntRange::new(1, 20);
/// 플레이 시간 한쪽만 지정했을 때 채우는 기본 범위 (분, 최대 1주)
pub const PLAYTIME_DEFAULT: IntRange = IntRange::new(0, 10080);

/// 최소/최대가 비어 있는 시나리오는 범위 필터에서 항상 일치
const RANGE_NULLS: NullBounds = NullBounds::Match;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScenarioSort {
    #[default]
    Newest,
    Name,
    PlaytimeAsc,
    PlaytimeDesc,
}

impl ScenarioSort {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("name") => ScenarioSort::Name,
            Some("playtime_asc") => ScenarioSort::PlaytimeAsc,
            Some("playtime_desc") => ScenarioSort::PlaytimeDesc,
            _ => ScenarioSort::Newest,
        }
    }

    pub fn spec(self) -> SortSpec<scenario::Column> {
        match self {
            ScenarioSort::Newest => SortSpec::desc(scenario::Column::CreatedAt),
            ScenarioSort::Name => SortSpec::asc(scenario::Column::Name),
            ScenarioSort::PlaytimeAsc => SortSpec::asc(scenario::Column::MinPlaytime).nulls_last(),
            ScenarioSort::PlaytimeDesc => {
                SortSpec::desc(scenario::Column::MaxPlaytime).nulls_last()
            }
        }
    }
}

/// 정규화된 시나리오 검색 조건
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioSearchParams {
    pub system_ids: Vec<String>,
    pub tag_ids: Vec<String>,
    pub keyword: Option<String>,
    pub player_count: Option<IntRange>,
    pub playtime: Option<IntRange>,
    pub sort: ScenarioSort,
    pub page: Page,
}

impl ScenarioSearchQuery {
    pub fn to_search_params(&self) -> ScenarioSearchParams {
        ScenarioSearchParams {
            system_ids: split_list(self.systems.as_deref()),
            tag_ids: split_list(self.tags.as_deref()),
            keyword: non_empty(self.q.as_deref()),
            player_count: IntRange::fill(
                parse_int(self.min_player.as_deref()),
                parse_int(self.max_player.as_deref()),
                PLAYER_DEFAULT,
            ),
            playtime: IntRange::fill(
                parse_int(self.min_playtime.as_deref()),
                parse_int(self.max_playtime.as_deref()),
                PLAYTIME_DEFAULT,
            ),
            sort: ScenarioSort::parse(self.sort.as_deref()),
            page: Page::from_raw(self.limit.as_deref(), self.offset.as_deref()),
        }
    }
}

/// 요청한 태그를 모두 가진 시나리오 ID
///
/// 태그 조건이 없으면 `None`, 있으면 교집합 결과(비어 있을 수 있음)를 돌려줍니다.
pub async fn resolve_tag_filter<C>(
    db: &C,
    tag_ids: &[String],
) -> Result<Option<Vec<String>>, DbErr>
where
    C: ConnectionTrait,
{
    if tag_ids.is_empty() {
        return Ok(None);
    }

    let rows: Vec<(String, String)> = scenario_tag::Entity::find()
        .select_only()
        .column(scenario_tag::Column::ScenarioId)
        .column(scenario_tag::Column::TagId)
        .filter(scenario_tag::Column::TagId.is_in(tag_ids.to_vec()))
        .into_tuple()
        .all(db)
        .await?;

    Ok(Some(intersect_by_count(rows, tag_ids)))
}

/// 태그 ID 제한 → 시스템 → 키워드 → 인원 → 플레이 시간 순으로 필터를 붙입니다.
pub fn compose_query(
    params: &ScenarioSearchParams,
    scenario_ids: Option<Vec<String>>,
) -> Select<scenario::Entity> {
    let mut query = scenario::Entity::find();

    if let Some(ids) = scenario_ids {
        query = query.filter(scenario::Column::Id.is_in(ids));
    }

    if !params.system_ids.is_empty() {
        query = query.filter(scenario::Column::SystemId.is_in(params.system_ids.clone()));
    }

    if let Some(keyword) = &params.keyword {
        query = query.filter(text_match(
            &[
                scenario::Column::Name,
                scenario::Column::Author,
                scenario::Column::Description,
            ],
            keyword,
        ));
    }

    if let Some(range) = params.player_count {
        query = query.filter(overlap_condition(
            scenario::Column::MinPlayer,
            scenario::Column::MaxPlayer,
            range,
            RANGE_NULLS,
        ));
    }

    if let Some(range) = params.playtime {
        query = query.filter(overlap_condition(
            scenario::Column::MinPlaytime,
            scenario::Column::MaxPlaytime,
            range,
            RANGE_NULLS,
        ));
    }

    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn should_fill_missing_player_max_with_default() {
        let query = ScenarioSearchQuery {
            min_player: Some("4".to_string()),
            ..Default::default()
        };

        let params = query.to_search_params();

        assert_eq!(params.player_count, Some(IntRange::new(4, 20)));
        assert_eq!(params.playtime, None);
    }

    #[test]
    fn should_fill_missing_playtime_min_with_default() {
        let query = ScenarioSearchQuery {
            max_playtime: Some("180".to_string()),
            ..Default::default()
        };

        let params = query.to_search_params();

        assert_eq!(params.playtime, Some(IntRange::new(0, 180)));
    }

    #[test]
    fn malformed_numbers_should_mean_no_filter() {
        let query = ScenarioSearchQuery {
            min_player: Some("many".to_string()),
            max_player: Some("".to_string()),
            ..Default::default()
        };

        assert_eq!(query.to_search_params().player_count, None);
    }

    #[test]
    fn should_split_system_and_tag_lists() {
        let query = ScenarioSearchQuery {
            systems: Some("coc7, sw25".to_string()),
            tags: Some("horror,horror,short".to_string()),
            ..Default::default()
        };

        let params = query.to_search_params();

        assert_eq!(params.system_ids, vec!["coc7", "sw25"]);
        assert_eq!(params.tag_ids, vec!["horror", "short"]);
    }

    #[test]
    fn sort_should_map_keys() {
        assert_eq!(ScenarioSort::parse(Some("name")), ScenarioSort::Name);
        assert_eq!(ScenarioSort::parse(Some("playtime_desc")), ScenarioSort::PlaytimeDesc);
        assert_eq!(ScenarioSort::parse(None), ScenarioSort::Newest);
        assert!(ScenarioSort::PlaytimeAsc.spec().nulls_last);
    }

    #[test]
    fn compose_should_render_overlap_with_null_match() {
        let params = ScenarioSearchParams {
            player_count: Some(IntRange::new(3, 5)),
            ..Default::default()
        };

        let sql = compose_query(&params, None)
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#""min_player" IS NULL"#));
        assert!(sql.contains(r#""min_player" <= 5"#));
        assert!(sql.contains(r#""max_player" >= 3"#));
    }

    #[test]
    fn compose_should_restrict_to_resolved_ids() {
        let sql = compose_query(
            &ScenarioSearchParams::default(),
            Some(vec!["01A".to_string(), "01B".to_string()]),
        )
        .build(DbBackend::Postgres)
        .to_string();

        assert!(sql.contains("IN ('01A', '01B')"));
    }
}
