use sea_orm::sea_query::NullOrdering;
use sea_orm::{EntityTrait, Order, QueryOrder, QuerySelect, Select};

use super::params::non_empty;

pub const DEFAULT_LIMIT: u64 = 20;
pub const MAX_LIMIT: u64 = 50;

/// OFFSET/LIMIT 페이지 ("더 보기"는 offset을 늘려 같은 쿼리를 다시 호출)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u64,
    pub offset: u64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl Page {
    /// limit은 1..=50으로 제한하고, 해석할 수 없는 값은 기본값을 씁니다.
    pub fn from_raw(limit: Option<&str>, offset: Option<&str>) -> Self {
        let limit = non_empty(limit)
            .and_then(|s| s.parse::<u64>().ok())
            .map(|l| l.clamp(1, MAX_LIMIT))
            .unwrap_or(DEFAULT_LIMIT);
        // DB 드라이버가 i64로 바인딩하므로 그 범위를 넘는 값은 기본값 처리
        let offset = non_empty(offset)
            .and_then(|s| s.parse::<i64>().ok())
            .and_then(|o| u64::try_from(o).ok())
            .unwrap_or(0);

        Self { limit, offset }
    }
}

/// 정렬 키가 가리키는 컬럼과 방향
#[derive(Debug, Clone)]
pub struct SortSpec<C> {
    pub column: C,
    pub order: Order,
    pub nulls_last: bool,
}

impl<C> SortSpec<C> {
    pub fn asc(column: C) -> Self {
        Self {
            column,
            order: Order::Asc,
            nulls_last: false,
        }
    }

    pub fn desc(column: C) -> Self {
        Self {
            column,
            order: Order::Desc,
            nulls_last: false,
        }
    }

    pub fn nulls_last(mut self) -> Self {
        self.nulls_last = true;
        self
    }
}

/// 주 정렬 → ID 내림차순 보조 정렬 → OFFSET/LIMIT
pub fn sort_and_paginate<E>(
    select: Select<E>,
    sort: SortSpec<E::Column>,
    id_column: E::Column,
    page: Page,
) -> Select<E>
where
    E: EntityTrait,
{
    let sorted = if sort.nulls_last {
        select.order_by_with_nulls(sort.column, sort.order, NullOrdering::Last)
    } else {
        select.order_by(sort.column, sort.order)
    };

    sorted
        .order_by(id_column, Order::Desc)
        .offset(page.offset)
        .limit(page.limit)
}
