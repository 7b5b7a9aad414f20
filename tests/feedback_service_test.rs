mod common;

use common::{seed_feedback, seed_user, test_state};
use trpg_server::domain::feedback::dto::{
    CreateCommentRequest, CreateFeedbackRequest, FeedbackSearchQuery, UpdateFeedbackRequest,
    UpdateStatusRequest,
};
use trpg_server::domain::feedback::entity::feedback::{
    FeedbackCategory, FeedbackPriority, FeedbackStatus,
};
use trpg_server::domain::feedback::service::FeedbackService;
use trpg_server::domain::user::entity::user::UserRole;
use trpg_server::utils::error::AppError;

fn search_query(
    category: Option<&str>,
    statuses: Option<&str>,
    q: Option<&str>,
    sort: Option<&str>,
) -> FeedbackSearchQuery {
    FeedbackSearchQuery {
        category: category.map(str::to_string),
        statuses: statuses.map(str::to_string),
        q: q.map(str::to_string),
        sort: sort.map(str::to_string),
        ..Default::default()
    }
}

mod search {
    use super::*;

    #[tokio::test]
    async fn unknown_category_should_return_empty_result() {
        // Arrange
        let state = test_state().await;
        seed_user(&state.db, "u1", UserRole::User).await;
        seed_feedback(
            &state.db,
            "f1",
            "u1",
            FeedbackCategory::Bug,
            FeedbackStatus::New,
            "버그",
            "2026-01-01 00:00:00",
        )
        .await;

        // Act
        let params = search_query(Some("NON_EXISTENT"), None, None, None).to_search_params();
        let result = FeedbackService::search(state, None, params).await.unwrap();

        // Assert
        assert!(result.feedbacks.is_empty());
        assert_eq!(result.total_count, 0);
    }

    #[tokio::test]
    async fn should_filter_by_category_status_and_keyword() {
        // Arrange
        let state = test_state().await;
        seed_user(&state.db, "u1", UserRole::User).await;
        seed_feedback(&state.db, "f1", "u1", FeedbackCategory::Bug, FeedbackStatus::New, "주사위 굴림 오류", "2026-01-01 00:00:00").await;
        seed_feedback(&state.db, "f2", "u1", FeedbackCategory::Bug, FeedbackStatus::Done, "주사위 색상", "2026-01-02 00:00:00").await;
        seed_feedback(&state.db, "f3", "u1", FeedbackCategory::Feature, FeedbackStatus::New, "주사위 기능", "2026-01-03 00:00:00").await;
        seed_feedback(&state.db, "f4", "u1", FeedbackCategory::Bug, FeedbackStatus::New, "로그인 오류", "2026-01-04 00:00:00").await;

        // Act
        let params =
            search_query(Some("BUG"), Some("NEW,TRIAGED"), Some("주사위"), None).to_search_params();
        let result = FeedbackService::search(state, None, params).await.unwrap();

        // Assert
        assert_eq!(result.total_count, 1);
        assert_eq!(result.feedbacks[0].feedback_id, "f1");
        assert_eq!(result.feedbacks[0].author_name, "u1-name");
    }

    #[tokio::test]
    async fn keyword_should_treat_wildcards_literally() {
        // Arrange
        let state = test_state().await;
        seed_user(&state.db, "u1", UserRole::User).await;
        seed_feedback(&state.db, "f1", "u1", FeedbackCategory::Other, FeedbackStatus::New, "100% 재현", "2026-01-01 00:00:00").await;
        seed_feedback(&state.db, "f2", "u1", FeedbackCategory::Other, FeedbackStatus::New, "1000 재현", "2026-01-02 00:00:00").await;

        // Act
        let params = search_query(None, None, Some("0%"), None).to_search_params();
        let result = FeedbackService::search(state, None, params).await.unwrap();

        // Assert
        assert_eq!(result.total_count, 1);
        assert_eq!(result.feedbacks[0].feedback_id, "f1");
    }

    #[tokio::test]
    async fn newest_sort_should_order_by_created_at_desc_and_paginate() {
        // Arrange
        let state = test_state().await;
        seed_user(&state.db, "u1", UserRole::User).await;
        seed_feedback(&state.db, "f1", "u1", FeedbackCategory::Bug, FeedbackStatus::New, "a", "2026-01-01 00:00:00").await;
        seed_feedback(&state.db, "f2", "u1", FeedbackCategory::Bug, FeedbackStatus::New, "b", "2026-01-03 00:00:00").await;
        seed_feedback(&state.db, "f3", "u1", FeedbackCategory::Bug, FeedbackStatus::New, "c", "2026-01-02 00:00:00").await;

        // Act
        let mut query = search_query(None, None, None, None);
        query.limit = Some("2".to_string());
        query.offset = Some("1".to_string());
        let result = FeedbackService::search(state, None, query.to_search_params())
            .await
            .unwrap();

        // Assert
        let ids: Vec<&str> = result.feedbacks.iter().map(|f| f.feedback_id.as_str()).collect();
        assert_eq!(ids, vec!["f3", "f1"]);
        assert_eq!(result.total_count, 3);
    }

    #[tokio::test]
    async fn ties_should_break_by_id_desc() {
        // Arrange
        let state = test_state().await;
        seed_user(&state.db, "u1", UserRole::User).await;
        seed_feedback(&state.db, "fa", "u1", FeedbackCategory::Bug, FeedbackStatus::New, "a", "2026-01-01 00:00:00").await;
        seed_feedback(&state.db, "fb", "u1", FeedbackCategory::Bug, FeedbackStatus::New, "b", "2026-01-01 00:00:00").await;

        // Act
        let params = search_query(None, None, None, Some("votes")).to_search_params();
        let result = FeedbackService::search(state, None, params).await.unwrap();

        // Assert
        let ids: Vec<&str> = result.feedbacks.iter().map(|f| f.feedback_id.as_str()).collect();
        assert_eq!(ids, vec!["fb", "fa"]);
    }
}

mod vote {
    use super::*;

    #[tokio::test]
    async fn toggling_twice_should_restore_original_state() {
        // Arrange
        let state = test_state().await;
        seed_user(&state.db, "u1", UserRole::User).await;
        seed_user(&state.db, "u2", UserRole::User).await;
        seed_feedback(&state.db, "f1", "u1", FeedbackCategory::Feature, FeedbackStatus::New, "기능", "2026-01-01 00:00:00").await;

        // Act
        let first = FeedbackService::toggle_vote(state.clone(), "u2", "f1").await.unwrap();
        let second = FeedbackService::toggle_vote(state.clone(), "u2", "f1").await.unwrap();

        // Assert
        assert!(first.has_voted);
        assert_eq!(first.vote_count, 1);
        assert!(!second.has_voted);
        assert_eq!(second.vote_count, 0);
    }

    #[tokio::test]
    async fn search_should_mark_viewer_votes() {
        // Arrange
        let state = test_state().await;
        seed_user(&state.db, "u1", UserRole::User).await;
        seed_user(&state.db, "u2", UserRole::User).await;
        seed_feedback(&state.db, "f1", "u1", FeedbackCategory::Feature, FeedbackStatus::New, "a", "2026-01-01 00:00:00").await;
        seed_feedback(&state.db, "f2", "u1", FeedbackCategory::Feature, FeedbackStatus::New, "b", "2026-01-02 00:00:00").await;
        FeedbackService::toggle_vote(state.clone(), "u2", "f1").await.unwrap();
        FeedbackService::toggle_vote(state.clone(), "u1", "f1").await.unwrap();

        // Act
        let params = search_query(None, None, None, Some("votes")).to_search_params();
        let result = FeedbackService::search(state, Some("u2"), params).await.unwrap();

        // Assert
        assert_eq!(result.feedbacks[0].feedback_id, "f1");
        assert_eq!(result.feedbacks[0].vote_count, 2);
        assert!(result.feedbacks[0].has_voted);
        assert!(!result.feedbacks[1].has_voted);
    }

    #[tokio::test]
    async fn voting_on_missing_feedback_should_be_not_found() {
        let state = test_state().await;
        seed_user(&state.db, "u1", UserRole::User).await;

        let result = FeedbackService::toggle_vote(state, "u1", "missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}

mod ownership {
    use super::*;

    #[tokio::test]
    async fn author_should_create_and_delete_new_feedback() {
        // Arrange
        let state = test_state().await;
        seed_user(&state.db, "u1", UserRole::User).await;
        let created = FeedbackService::create(
            state.clone(),
            "u1",
            CreateFeedbackRequest {
                category: FeedbackCategory::UiUx,
                title: " 버튼이 작아요 ".to_string(),
                description: "모바일에서 누르기 어렵습니다.".to_string(),
            },
        )
        .await
        .unwrap();

        // Act
        let deleted = FeedbackService::delete(state.clone(), "u1", &created.feedback_id)
            .await
            .unwrap();

        // Assert
        assert_eq!(created.title, "버튼이 작아요");
        assert_eq!(created.status, FeedbackStatus::New);
        assert_eq!(deleted.feedback_id, created.feedback_id);
        let lookup = FeedbackService::get_detail(state, None, &created.feedback_id).await;
        assert!(matches!(lookup, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_should_check_existence_then_owner_then_status() {
        // Arrange
        let state = test_state().await;
        seed_user(&state.db, "u1", UserRole::User).await;
        seed_user(&state.db, "u2", UserRole::User).await;
        seed_feedback(&state.db, "f1", "u1", FeedbackCategory::Bug, FeedbackStatus::Triaged, "a", "2026-01-01 00:00:00").await;

        // Act
        let missing = FeedbackService::delete(state.clone(), "u1", "missing").await;
        let stranger = FeedbackService::delete(state.clone(), "u2", "f1").await;
        let triaged = FeedbackService::delete(state.clone(), "u1", "f1").await;

        // Assert
        assert!(matches!(missing, Err(AppError::NotFound(_))));
        assert!(matches!(stranger, Err(AppError::Forbidden(_))));
        let err = triaged.unwrap_err();
        assert_eq!(err.error_code(), "FEEDBACK4091");
    }

    #[tokio::test]
    async fn editing_triaged_feedback_should_reset_to_new() {
        // Arrange
        let state = test_state().await;
        seed_user(&state.db, "u1", UserRole::User).await;
        seed_feedback(&state.db, "f1", "u1", FeedbackCategory::Bug, FeedbackStatus::Triaged, "a", "2026-01-01 00:00:00").await;

        // Act
        let updated = FeedbackService::update(
            state,
            "u1",
            "f1",
            UpdateFeedbackRequest {
                category: None,
                title: Some("수정된 제목".to_string()),
                description: None,
            },
        )
        .await
        .unwrap();

        // Assert
        assert_eq!(updated.title, "수정된 제목");
        assert_eq!(updated.status, FeedbackStatus::New);
    }

    #[tokio::test]
    async fn editing_planned_feedback_should_be_status_error() {
        let state = test_state().await;
        seed_user(&state.db, "u1", UserRole::User).await;
        seed_feedback(&state.db, "f1", "u1", FeedbackCategory::Bug, FeedbackStatus::Planned, "a", "2026-01-01 00:00:00").await;

        let result = FeedbackService::update(
            state,
            "u1",
            "f1",
            UpdateFeedbackRequest {
                category: Some(FeedbackCategory::Other),
                title: None,
                description: None,
            },
        )
        .await;

        assert!(matches!(
            result,
            Err(AppError::InvalidState { code: "FEEDBACK4091", .. })
        ));
    }
}

mod comments_and_status {
    use super::*;

    #[tokio::test]
    async fn moderator_comment_should_be_official() {
        // Arrange
        let state = test_state().await;
        seed_user(&state.db, "u1", UserRole::User).await;
        seed_user(&state.db, "mod", UserRole::Moderator).await;
        seed_feedback(&state.db, "f1", "u1", FeedbackCategory::Bug, FeedbackStatus::New, "a", "2026-01-01 00:00:00").await;

        // Act
        let user_comment = FeedbackService::create_comment(
            state.clone(),
            "u1",
            "f1",
            CreateCommentRequest { content: "저도 그래요".to_string() },
        )
        .await
        .unwrap();
        let mod_comment = FeedbackService::create_comment(
            state.clone(),
            "mod",
            "f1",
            CreateCommentRequest { content: "확인했습니다".to_string() },
        )
        .await
        .unwrap();
        let detail = FeedbackService::get_detail(state, None, "f1").await.unwrap();

        // Assert
        assert!(!user_comment.is_official);
        assert!(mod_comment.is_official);
        assert_eq!(detail.feedback.comment_count, 2);
        assert_eq!(detail.comments.len(), 2);
    }

    #[tokio::test]
    async fn only_moderator_should_change_status() {
        let state = test_state().await;
        seed_user(&state.db, "u1", UserRole::User).await;
        seed_feedback(&state.db, "f1", "u1", FeedbackCategory::Bug, FeedbackStatus::New, "a", "2026-01-01 00:00:00").await;

        let result = FeedbackService::update_status(
            state,
            "u1",
            "f1",
            UpdateStatusRequest {
                status: FeedbackStatus::Triaged,
                priority: None,
                merged_into_id: None,
            },
        )
        .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn duplicate_should_require_existing_merge_target() {
        // Arrange
        let state = test_state().await;
        seed_user(&state.db, "u1", UserRole::User).await;
        seed_user(&state.db, "mod", UserRole::Moderator).await;
        seed_feedback(&state.db, "f1", "u1", FeedbackCategory::Bug, FeedbackStatus::New, "a", "2026-01-01 00:00:00").await;
        seed_feedback(&state.db, "f2", "u1", FeedbackCategory::Bug, FeedbackStatus::New, "b", "2026-01-02 00:00:00").await;
        let duplicate = |target: Option<&str>| UpdateStatusRequest {
            status: FeedbackStatus::Duplicate,
            priority: Some(FeedbackPriority::Low),
            merged_into_id: target.map(str::to_string),
        };

        // Act
        let missing = FeedbackService::update_status(state.clone(), "mod", "f2", duplicate(None)).await;
        let itself = FeedbackService::update_status(state.clone(), "mod", "f2", duplicate(Some("f2"))).await;
        let merged = FeedbackService::update_status(state.clone(), "mod", "f2", duplicate(Some("f1")))
            .await
            .unwrap();

        // Assert
        assert!(matches!(missing, Err(AppError::BadRequest(_))));
        assert!(matches!(itself, Err(AppError::BadRequest(_))));
        assert_eq!(merged.status, FeedbackStatus::Duplicate);
        assert_eq!(merged.merged_into_id.as_deref(), Some("f1"));
        assert_eq!(merged.priority, Some(FeedbackPriority::Low));
    }
}
