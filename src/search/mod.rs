//! 피드백/시나리오/세션 검색에서 공통으로 쓰는 필터 조립 도구
//!
//! - [`params`]: URL 쿼리 문자열 → 타입이 있는 필터 값 (빈 값은 필터 없음)
//! - [`pattern`]: 대소문자 무시 부분 일치 (LIKE 이스케이프 포함)
//! - [`range`]: 인원/플레이 시간 범위 겹침 조건
//! - [`tags`]: 태그 AND 필터의 카운팅 교집합
//! - [`paging`]: 정렬 + ID 보조 정렬 + OFFSET/LIMIT

pub mod paging;
pub mod params;
pub mod pattern;
pub mod range;
pub mod tags;

pub use paging::{sort_and_paginate, Page, SortSpec};
pub use params::IntRange;
pub use range::NullBounds;
