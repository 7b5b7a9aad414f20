use sea_orm::ActiveEnum;

/// 양 끝을 포함하는 정수 범위
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntRange {
    pub min: i32,
    pub max: i32,
}

impl IntRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// 사용자가 한쪽 이상을 지정했을 때만 범위를 만들고, 빠진 쪽은 기본값으로 채웁니다.
    ///
    /// 양쪽을 모두 지정했는데 뒤집혀 있으면 순서를 바로잡습니다.
    /// 기본값으로 채운 쪽과는 비교하지 않으므로 `{25, 20}` 같은 빈 범위가 될 수 있습니다.
    pub fn fill(min: Option<i32>, max: Option<i32>, defaults: IntRange) -> Option<Self> {
        match (min, max) {
            (None, None) => None,
            (Some(lo), Some(hi)) => Some(Self::new(lo.min(hi), lo.max(hi))),
            (lo, hi) => Some(Self::new(
                lo.unwrap_or(defaults.min),
                hi.unwrap_or(defaults.max),
            )),
        }
    }
}

/// 공백을 제거한 뒤 비어 있으면 None
pub fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// 쉼표 구분 목록을 중복 없이 분리합니다. 입력 순서는 유지됩니다.
pub fn split_list(raw: Option<&str>) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();

    for item in raw.unwrap_or_default().split(',').map(str::trim) {
        if !item.is_empty() && !items.iter().any(|existing| existing == item) {
            items.push(item.to_string());
        }
    }

    items
}

/// 정수로 해석할 수 없는 값은 필터 없음으로 취급합니다.
pub fn parse_int(raw: Option<&str>) -> Option<i32> {
    non_empty(raw).and_then(|s| s.parse().ok())
}

/// DB 문자열 값("IN_PROGRESS" 등)으로 열거형을 찾습니다.
pub fn parse_enum<E>(raw: &str) -> Option<E>
where
    E: ActiveEnum<Value = String>,
{
    E::try_from_value(&raw.trim().to_uppercase()).ok()
}

/// 목록 중 알 수 없는 값은 버리고 알려진 값만 남깁니다.
pub fn parse_enum_list<E>(raw: Option<&str>) -> Vec<E>
where
    E: ActiveEnum<Value = String> + PartialEq,
{
    let mut values: Vec<E> = Vec::new();
    for item in split_list(raw) {
        if let Some(value) = parse_enum::<E>(&item) {
            if !values.contains(&value) {
                values.push(value);
            }
        }
    }
    values
}
