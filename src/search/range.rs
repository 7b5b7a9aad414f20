use sea_orm::{ColumnTrait, Condition};

use super::params::IntRange;

/// 최소/최대 값이 NULL인 행을 범위 필터에서 어떻게 다룰지
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullBounds {
    /// NULL 경계는 해당 쪽으로 무한히 열린 것으로 보고 항상 일치
    Match,
    /// 표준 SQL 의미대로 NULL 경계를 가진 행은 제외
    Exclude,
}

/// `entity.min <= range.max AND entity.max >= range.min` (양 끝 포함)
pub fn overlap_condition<C>(min_col: C, max_col: C, range: IntRange, nulls: NullBounds) -> Condition
where
    C: ColumnTrait,
{
    let lower = min_col.lte(range.max);
    let upper = max_col.gte(range.min);

    match nulls {
        NullBounds::Match => Condition::all()
            .add(Condition::any().add(min_col.is_null()).add(lower))
            .add(Condition::any().add(max_col.is_null()).add(upper)),
        NullBounds::Exclude => Condition::all().add(lower).add(upper),
    }
}
