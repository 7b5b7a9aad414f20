use std::collections::{HashMap, HashSet};

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;

use super::dto::{
    CommentItem, CreateCommentRequest, CreateFeedbackRequest, DeleteFeedbackResponse,
    FeedbackDetailResponse, FeedbackListItem, FeedbackSearchResponse, UpdateFeedbackRequest,
    UpdateStatusRequest, VoteToggleResponse,
};
use super::entity::feedback::{self, FeedbackStatus};
use super::entity::feedback_comment;
use super::entity::feedback_vote;
use super::search::{compose_query, CategoryFilter, FeedbackSearchParams};
use crate::domain::user::entity::user;
use crate::domain::user::service::UserService;
use crate::search::sort_and_paginate;
use crate::state::AppState;
use crate::utils::datetime::{format_iso, now};
use crate::utils::error::AppError;
use crate::utils::id::new_id;

/// 작성자만 수정/삭제할 수 있는 상태가 아닐 때의 에러 코드
const FEEDBACK_STATUS_CONFLICT: &str = "FEEDBACK4091";

pub struct FeedbackService;

impl FeedbackService {
    /// 피드백 검색
    pub async fn search(
        state: AppState,
        viewer_id: Option<&str>,
        params: FeedbackSearchParams,
    ) -> Result<FeedbackSearchResponse, AppError> {
        // 존재하지 않는 카테고리는 쿼리 없이 빈 결과
        if let Some(CategoryFilter::Unknown(category)) = &params.category {
            info!(category = %category, "알 수 없는 카테고리로 검색");
            return Ok(FeedbackSearchResponse::empty());
        }

        let query = compose_query(&params);
        let total_count = query.clone().count(&state.db).await?;

        let feedbacks = sort_and_paginate(
            query,
            params.sort.spec(),
            feedback::Column::Id,
            params.page,
        )
        .all(&state.db)
        .await?;

        let feedbacks = Self::to_list_items(&state.db, viewer_id, feedbacks).await?;

        info!(
            viewer_id = viewer_id.unwrap_or("-"),
            result_count = feedbacks.len(),
            total_count = total_count,
            "피드백 검색 완료"
        );

        Ok(FeedbackSearchResponse {
            feedbacks,
            total_count,
        })
    }

    /// 피드백 상세 (댓글 포함)
    pub async fn get_detail(
        state: AppState,
        viewer_id: Option<&str>,
        feedback_id: &str,
    ) -> Result<FeedbackDetailResponse, AppError> {
        let model = Self::find_feedback(&state.db, feedback_id).await?;

        let comments = feedback_comment::Entity::find()
            .filter(feedback_comment::Column::FeedbackId.eq(feedback_id))
            .order_by_asc(feedback_comment::Column::CreatedAt)
            .order_by_asc(feedback_comment::Column::Id)
            .all(&state.db)
            .await?;

        let author_ids: Vec<String> = comments.iter().map(|c| c.author_id.clone()).collect();
        let names = Self::load_user_names(&state.db, author_ids).await?;

        let comments = comments
            .into_iter()
            .map(|c| CommentItem {
                author_name: names.get(&c.author_id).cloned().unwrap_or_default(),
                comment_id: c.id,
                author_id: c.author_id,
                content: c.content,
                is_official: c.is_official,
                created_at: format_iso(&c.created_at),
            })
            .collect();

        let feedback = Self::to_list_items(&state.db, viewer_id, vec![model])
            .await?
            .pop()
            .ok_or_else(|| AppError::internal_error("feedback item conversion failed"))?;

        Ok(FeedbackDetailResponse { feedback, comments })
    }

    /// 피드백 작성
    pub async fn create(
        state: AppState,
        user_id: &str,
        req: CreateFeedbackRequest,
    ) -> Result<FeedbackListItem, AppError> {
        UserService::find_user(&state.db, user_id).await?;

        let timestamp = now();
        let model = feedback::ActiveModel {
            id: Set(new_id()),
            category: Set(req.category),
            status: Set(FeedbackStatus::New),
            priority: Set(None),
            title: Set(req.title.trim().to_string()),
            description: Set(req.description),
            vote_count: Set(0),
            comment_count: Set(0),
            author_id: Set(user_id.to_string()),
            merged_into_id: Set(None),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        }
        .insert(&state.db)
        .await?;

        info!(user_id = user_id, feedback_id = %model.id, "피드백 작성 완료");

        Self::to_list_items(&state.db, Some(user_id), vec![model])
            .await?
            .pop()
            .ok_or_else(|| AppError::internal_error("feedback item conversion failed"))
    }

    /// 피드백 수정 (작성자, NEW/TRIAGED 상태에서만)
    ///
    /// TRIAGED 상태에서 수정하면 다시 NEW로 돌아갑니다.
    pub async fn update(
        state: AppState,
        user_id: &str,
        feedback_id: &str,
        req: UpdateFeedbackRequest,
    ) -> Result<FeedbackListItem, AppError> {
        let model = Self::find_feedback(&state.db, feedback_id).await?;

        if model.author_id != user_id {
            return Err(AppError::forbidden("작성자만 피드백을 수정할 수 있습니다."));
        }
        if !model.status.is_editable() {
            return Err(AppError::invalid_state(
                FEEDBACK_STATUS_CONFLICT,
                "검토가 진행된 피드백은 수정할 수 없습니다.",
            ));
        }

        let reset_to_new = model.status == FeedbackStatus::Triaged;
        let mut active = model.into_active_model();
        if let Some(category) = req.category {
            active.category = Set(category);
        }
        if let Some(title) = req.title {
            active.title = Set(title.trim().to_string());
        }
        if let Some(description) = req.description {
            active.description = Set(description);
        }
        if reset_to_new {
            active.status = Set(FeedbackStatus::New);
        }
        active.updated_at = Set(now());

        let updated = active.update(&state.db).await?;

        info!(
            user_id = user_id,
            feedback_id = feedback_id,
            reset_to_new = reset_to_new,
            "피드백 수정 완료"
        );

        Self::to_list_items(&state.db, Some(user_id), vec![updated])
            .await?
            .pop()
            .ok_or_else(|| AppError::internal_error("feedback item conversion failed"))
    }

    /// 피드백 삭제 (작성자, NEW 상태에서만)
    pub async fn delete(
        state: AppState,
        user_id: &str,
        feedback_id: &str,
    ) -> Result<DeleteFeedbackResponse, AppError> {
        let model = Self::find_feedback(&state.db, feedback_id).await?;

        if model.author_id != user_id {
            return Err(AppError::forbidden("작성자만 피드백을 삭제할 수 있습니다."));
        }
        if !model.status.is_deletable() {
            return Err(AppError::invalid_state(
                FEEDBACK_STATUS_CONFLICT,
                "NEW 상태의 피드백만 삭제할 수 있습니다.",
            ));
        }

        // 투표/댓글은 FK CASCADE로 함께 삭제
        model.delete(&state.db).await?;

        info!(user_id = user_id, feedback_id = feedback_id, "피드백 삭제 완료");

        Ok(DeleteFeedbackResponse {
            feedback_id: feedback_id.to_string(),
            deleted_at: format_iso(&now()),
        })
    }

    /// 투표 토글 (있으면 삭제, 없으면 추가)
    pub async fn toggle_vote(
        state: AppState,
        user_id: &str,
        feedback_id: &str,
    ) -> Result<VoteToggleResponse, AppError> {
        UserService::find_user(&state.db, user_id).await?;

        let txn = state.db.begin().await?;

        let model = Self::find_feedback(&txn, feedback_id).await?;

        let existing = feedback_vote::Entity::find_by_id((feedback_id.to_string(), user_id.to_string()))
            .one(&txn)
            .await?;

        let has_voted = match existing {
            Some(vote) => {
                vote.delete(&txn).await?;
                false
            }
            None => {
                feedback_vote::ActiveModel {
                    feedback_id: Set(feedback_id.to_string()),
                    user_id: Set(user_id.to_string()),
                    created_at: Set(now()),
                }
                .insert(&txn)
                .await?;
                true
            }
        };

        // 카운터는 실제 행 수로 다시 계산
        let vote_count = feedback_vote::Entity::find()
            .filter(feedback_vote::Column::FeedbackId.eq(feedback_id))
            .count(&txn)
            .await? as i32;

        let mut active = model.into_active_model();
        active.vote_count = Set(vote_count);
        active.update(&txn).await?;

        txn.commit().await?;

        info!(
            user_id = user_id,
            feedback_id = feedback_id,
            has_voted = has_voted,
            vote_count = vote_count,
            "투표 토글 완료"
        );

        Ok(VoteToggleResponse {
            feedback_id: feedback_id.to_string(),
            has_voted,
            vote_count,
        })
    }

    /// 댓글 작성
    ///
    /// 작성 시점에 모더레이터면 공식 답변으로 표시됩니다.
    pub async fn create_comment(
        state: AppState,
        user_id: &str,
        feedback_id: &str,
        req: CreateCommentRequest,
    ) -> Result<CommentItem, AppError> {
        let author = UserService::find_user(&state.db, user_id).await?;

        let txn = state.db.begin().await?;

        let model = Self::find_feedback(&txn, feedback_id).await?;

        let timestamp = now();
        let comment = feedback_comment::ActiveModel {
            id: Set(new_id()),
            feedback_id: Set(feedback_id.to_string()),
            author_id: Set(user_id.to_string()),
            content: Set(req.content.trim().to_string()),
            is_official: Set(author.is_moderator()),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        }
        .insert(&txn)
        .await?;

        let comment_count = feedback_comment::Entity::find()
            .filter(feedback_comment::Column::FeedbackId.eq(feedback_id))
            .count(&txn)
            .await? as i32;

        let mut active = model.into_active_model();
        active.comment_count = Set(comment_count);
        active.update(&txn).await?;

        txn.commit().await?;

        info!(
            user_id = user_id,
            feedback_id = feedback_id,
            is_official = comment.is_official,
            "댓글 작성 완료"
        );

        Ok(CommentItem {
            comment_id: comment.id,
            author_id: comment.author_id,
            author_name: author.name,
            content: comment.content,
            is_official: comment.is_official,
            created_at: format_iso(&comment.created_at),
        })
    }

    /// 상태/우선순위 변경 (모더레이터 전용)
    pub async fn update_status(
        state: AppState,
        user_id: &str,
        feedback_id: &str,
        req: UpdateStatusRequest,
    ) -> Result<FeedbackListItem, AppError> {
        UserService::require_moderator(&state.db, user_id).await?;

        let model = Self::find_feedback(&state.db, feedback_id).await?;

        let merged_into_id = if req.status == FeedbackStatus::Duplicate {
            let target_id = req
                .merged_into_id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .ok_or_else(|| {
                    AppError::bad_request("DUPLICATE 상태에는 병합 대상 피드백이 필요합니다.")
                })?;

            if target_id == feedback_id {
                return Err(AppError::bad_request(
                    "자기 자신에게 병합할 수 없습니다.",
                ));
            }
            Self::find_feedback(&state.db, target_id).await?;
            Some(target_id.to_string())
        } else {
            None
        };

        let previous = model.status;
        let mut active = model.into_active_model();
        active.status = Set(req.status);
        active.priority = Set(req.priority);
        active.merged_into_id = Set(merged_into_id);
        active.updated_at = Set(now());

        let updated = active.update(&state.db).await?;

        info!(
            moderator_id = user_id,
            feedback_id = feedback_id,
            from = ?previous,
            to = ?updated.status,
            "피드백 상태 변경 완료"
        );

        Self::to_list_items(&state.db, Some(user_id), vec![updated])
            .await?
            .pop()
            .ok_or_else(|| AppError::internal_error("feedback item conversion failed"))
    }

    async fn find_feedback<C>(db: &C, feedback_id: &str) -> Result<feedback::Model, AppError>
    where
        C: ConnectionTrait,
    {
        feedback::Entity::find_by_id(feedback_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("존재하지 않는 피드백입니다."))
    }

    async fn load_user_names<C>(
        db: &C,
        user_ids: Vec<String>,
    ) -> Result<HashMap<String, String>, AppError>
    where
        C: ConnectionTrait,
    {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let users = user::Entity::find()
            .filter(user::Column::Id.is_in(user_ids))
            .all(db)
            .await?;

        Ok(users.into_iter().map(|u| (u.id, u.name)).collect())
    }

    /// 작성자 이름과 viewer의 투표 여부를 붙여 응답 항목으로 변환
    async fn to_list_items<C>(
        db: &C,
        viewer_id: Option<&str>,
        models: Vec<feedback::Model>,
    ) -> Result<Vec<FeedbackListItem>, AppError>
    where
        C: ConnectionTrait,
    {
        let author_ids: Vec<String> = models.iter().map(|m| m.author_id.clone()).collect();
        let names = Self::load_user_names(db, author_ids).await?;

        let voted: HashSet<String> = match viewer_id {
            Some(viewer_id) if !models.is_empty() => {
                let ids: Vec<String> = models.iter().map(|m| m.id.clone()).collect();
                feedback_vote::Entity::find()
                    .select_only()
                    .column(feedback_vote::Column::FeedbackId)
                    .filter(feedback_vote::Column::UserId.eq(viewer_id))
                    .filter(feedback_vote::Column::FeedbackId.is_in(ids))
                    .into_tuple::<String>()
                    .all(db)
                    .await?
                    .into_iter()
                    .collect()
            }
            _ => HashSet::new(),
        };

        Ok(models
            .into_iter()
            .map(|m| FeedbackListItem {
                author_name: names.get(&m.author_id).cloned().unwrap_or_default(),
                has_voted: voted.contains(&m.id),
                feedback_id: m.id,
                category: m.category,
                status: m.status,
                priority: m.priority,
                title: m.title,
                description: m.description,
                vote_count: m.vote_count,
                comment_count: m.comment_count,
                author_id: m.author_id,
                merged_into_id: m.merged_into_id,
                created_at: format_iso(&m.created_at),
                updated_at: format_iso(&m.updated_at),
            })
            .collect())
    }
}
