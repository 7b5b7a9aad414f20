use std::collections::{BTreeMap, HashSet};

/// 요청한 태그를 모두 가진 엔티티 ID만 돌려줍니다.
///
/// `rows`는 `(entity_id, tag_id)` 연결 행입니다. 엔티티별로 서로 다른 요청 태그 수를 세어
/// 요청 태그 수와 같은 것만 남깁니다. 결과는 ID 순으로 정렬됩니다.
pub fn intersect_by_count<I>(rows: I, required_tags: &[String]) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let required: HashSet<&str> = required_tags.iter().map(String::as_str).collect();
    if required.is_empty() {
        return Vec::new();
    }

    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();

    for (entity_id, tag_id) in rows {
        if !required.contains(tag_id.as_str()) {
            continue;
        }
        if seen.insert((entity_id.clone(), tag_id)) {
            *counts.entry(entity_id).or_default() += 1;
        }
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count == required.len())
        .map(|(entity_id, _)| entity_id)
        .collect()
}
