use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Select};

use super::dto::FeedbackSearchQuery;
use super::entity::feedback::{self, FeedbackCategory, FeedbackStatus};
use crate::search::params::{non_empty, parse_enum, parse_enum_list};
use crate::search::pattern::text_match;
use crate::search::{Page, SortSpec};

/// 카테고리 필터
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    Is(FeedbackCategory),
    /// 존재하지 않는 카테고리 → 결과 없음
    Unknown(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FeedbackSort {
    Votes,
    #[default]
    Newest,
    Comments,
}

impl FeedbackSort {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("votes") => FeedbackSort::Votes,
            Some("comments") => FeedbackSort::Comments,
            _ => FeedbackSort::Newest,
        }
    }

    pub fn spec(self) -> SortSpec<feedback::Column> {
        match self {
            FeedbackSort::Votes => SortSpec::desc(feedback::Column::VoteCount),
            FeedbackSort::Newest => SortSpec::desc(feedback::Column::CreatedAt),
            FeedbackSort::Comments => SortSpec::desc(feedback::Column::CommentCount),
        }
    }
}

/// 정규화된 피드백 검색 조건 (None/빈 목록 = 필터 없음)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackSearchParams {
    pub category: Option<CategoryFilter>,
    pub statuses: Vec<FeedbackStatus>,
    pub keyword: Option<String>,
    pub sort: FeedbackSort,
    pub page: Page,
}

impl FeedbackSearchQuery {
    pub fn to_search_params(&self) -> FeedbackSearchParams {
        let category = non_empty(self.category.as_deref())
            .filter(|c| !c.eq_ignore_ascii_case("all"))
            .map(|c| match parse_enum::<FeedbackCategory>(&c) {
                Some(category) => CategoryFilter::Is(category),
                None => CategoryFilter::Unknown(c),
            });

        FeedbackSearchParams {
            category,
            statuses: parse_enum_list(self.statuses.as_deref()),
            keyword: non_empty(self.q.as_deref()),
            sort: FeedbackSort::parse(self.sort.as_deref()),
            page: Page::from_raw(self.limit.as_deref(), self.offset.as_deref()),
        }
    }
}

/// 카테고리 → 상태 → 키워드 순으로 필터를 붙입니다.
pub fn compose_query(params: &FeedbackSearchParams) -> Select<feedback::Entity> {
    let mut query = feedback::Entity::find();

    if let Some(CategoryFilter::Is(category)) = &params.category {
        query = query.filter(feedback::Column::Category.eq(*category));
    }

    if !params.statuses.is_empty() {
        query = query.filter(feedback::Column::Status.is_in(params.statuses.clone()));
    }

    if let Some(keyword) = &params.keyword {
        query = query.filter(text_match(
            &[feedback::Column::Title, feedback::Column::Description],
            keyword,
        ));
    }

    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    fn query(category: Option<&str>, statuses: Option<&str>, q: Option<&str>) -> FeedbackSearchQuery {
        FeedbackSearchQuery {
            category: category.map(str::to_string),
            statuses: statuses.map(str::to_string),
            q: q.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn should_omit_empty_and_all_values() {
        let params = query(Some("all"), Some(""), Some("  ")).to_search_params();

        assert_eq!(params.category, None);
        assert!(params.statuses.is_empty());
        assert_eq!(params.keyword, None);
        assert_eq!(params.sort, FeedbackSort::Newest);
    }

    #[test]
    fn should_keep_unknown_category_as_unknown() {
        let params = query(Some("NON_EXISTENT"), None, None).to_search_params();

        assert_eq!(
            params.category,
            Some(CategoryFilter::Unknown("NON_EXISTENT".to_string()))
        );
    }

    #[test]
    fn should_parse_known_category_and_statuses() {
        let params = query(Some("bug"), Some("NEW,TRIAGED"), Some("dice")).to_search_params();

        assert_eq!(params.category, Some(CategoryFilter::Is(FeedbackCategory::Bug)));
        assert_eq!(
            params.statuses,
            vec![FeedbackStatus::New, FeedbackStatus::Triaged]
        );
        assert_eq!(params.keyword.as_deref(), Some("dice"));
    }

    #[test]
    fn sort_should_fall_back_to_newest() {
        assert_eq!(FeedbackSort::parse(Some("votes")), FeedbackSort::Votes);
        assert_eq!(FeedbackSort::parse(Some("comments")), FeedbackSort::Comments);
        assert_eq!(FeedbackSort::parse(Some("random")), FeedbackSort::Newest);
    }

    #[test]
    fn compose_should_apply_only_active_filters() {
        let sql = compose_query(&FeedbackSearchParams::default())
            .build(DbBackend::Postgres)
            .to_string();

        assert!(!sql.contains("WHERE"));
    }

    #[test]
    fn compose_should_add_in_and_like_filters() {
        let params = query(Some("FEATURE"), Some("NEW,DONE"), Some("50%")).to_search_params();

        let sql = compose_query(&params).build(DbBackend::Postgres).to_string();

        assert!(sql.contains("'FEATURE'"));
        assert!(sql.contains("IN ('NEW', 'DONE')"));
        assert!(sql.contains("LIKE"));
        assert!(sql.contains("ESCAPE"));
    }
}
