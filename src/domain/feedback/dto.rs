use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::entity::feedback::{FeedbackCategory, FeedbackPriority, FeedbackStatus};

// ============== 피드백 검색 ==============

/// `/api/feedback/search` 쿼리 문자열 (가공 전)
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSearchQuery {
    /// BUG / FEATURE / UI_UX / OTHER (all 또는 빈 값이면 전체)
    pub category: Option<String>,
    /// 쉼표 구분 상태 목록 (예: NEW,TRIAGED)
    pub statuses: Option<String>,
    /// 제목/본문 검색어
    pub q: Option<String>,
    /// votes / newest / comments
    pub sort: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackListItem {
    pub feedback_id: String,
    pub category: FeedbackCategory,
    pub status: FeedbackStatus,
    pub priority: Option<FeedbackPriority>,
    pub title: String,
    pub description: String,
    pub vote_count: i32,
    pub comment_count: i32,
    pub author_id: String,
    pub author_name: String,
    /// 로그인하지 않았으면 항상 false
    pub has_voted: bool,
    pub merged_into_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSearchResponse {
    pub feedbacks: Vec<FeedbackListItem>,
    pub total_count: u64,
}

impl FeedbackSearchResponse {
    pub fn empty() -> Self {
        Self {
            feedbacks: Vec::new(),
            total_count: 0,
        }
    }
}

// ============== 피드백 상세 ==============

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentItem {
    pub comment_id: String,
    pub author_id: String,
    pub author_name: String,
    pub content: String,
    pub is_official: bool,
    pub created_at: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackDetailResponse {
    pub feedback: FeedbackListItem,
    pub comments: Vec<CommentItem>,
}

// ============== 피드백 작성/수정/삭제 ==============

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedbackRequest {
    pub category: FeedbackCategory,

    #[validate(length(min = 1, max = 100, message = "제목은 1~100자여야 합니다."))]
    pub title: String,

    #[validate(length(min = 1, max = 5000, message = "내용은 1~5000자여야 합니다."))]
    pub description: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFeedbackRequest {
    pub category: Option<FeedbackCategory>,

    #[validate(length(min = 1, max = 100, message = "제목은 1~100자여야 합니다."))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 5000, message = "내용은 1~5000자여야 합니다."))]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFeedbackResponse {
    pub feedback_id: String,
    pub deleted_at: String,
}

// ============== 투표 ==============

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoteToggleResponse {
    pub feedback_id: String,
    pub has_voted: bool,
    pub vote_count: i32,
}

// ============== 댓글 ==============

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 2000, message = "댓글은 1~2000자여야 합니다."))]
    pub content: String,
}

// ============== 상태 변경 (모더레이터) ==============

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: FeedbackStatus,
    /// null이면 우선순위 해제
    pub priority: Option<FeedbackPriority>,
    /// status가 DUPLICATE일 때 필수
    pub merged_into_id: Option<String>,
}
