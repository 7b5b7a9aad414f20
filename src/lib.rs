pub mod config;
pub mod domain;
pub mod global;
pub mod search;
pub mod shutdown;
pub mod state;
pub mod utils;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use domain::{feedback, health, scenario, session};
pub use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::handler::health_check,
        feedback::handler::search_feedback,
        feedback::handler::create_feedback,
        feedback::handler::get_feedback,
        feedback::handler::update_feedback,
        feedback::handler::delete_feedback,
        feedback::handler::toggle_vote,
        feedback::handler::create_comment,
        feedback::handler::update_status,
        scenario::handler::search_scenarios,
        scenario::handler::create_scenario,
        scenario::handler::get_scenario,
        scenario::handler::import_scenario,
        scenario::handler::list_tags,
        scenario::handler::list_systems,
        session::handler::search_sessions,
        session::handler::upcoming_sessions,
        session::handler::session_history,
        session::handler::create_session,
        session::handler::get_session,
        session::handler::join_session,
        session::handler::confirm_participant,
        session::handler::update_phase,
    ),
    components(
        schemas(
            health::dto::HealthStatus,
            health::dto::HealthState,
            health::dto::DatabaseCheck,
            feedback::entity::feedback::FeedbackCategory,
            feedback::entity::feedback::FeedbackStatus,
            feedback::entity::feedback::FeedbackPriority,
            feedback::dto::FeedbackListItem,
            feedback::dto::FeedbackSearchResponse,
            feedback::dto::CommentItem,
            feedback::dto::FeedbackDetailResponse,
            feedback::dto::CreateFeedbackRequest,
            feedback::dto::UpdateFeedbackRequest,
            feedback::dto::DeleteFeedbackResponse,
            feedback::dto::VoteToggleResponse,
            feedback::dto::CreateCommentRequest,
            feedback::dto::UpdateStatusRequest,
            scenario::entity::scenario::ScenarioSource,
            scenario::dto::TagItem,
            scenario::dto::SystemItem,
            scenario::dto::ScenarioItem,
            scenario::dto::ScenarioSearchResponse,
            scenario::dto::CreateScenarioRequest,
            scenario::dto::ImportScenarioRequest,
            scenario::dto::ImportScenarioResponse,
            scenario::scraper::ParsedScenario,
            session::entity::game_session::SessionPhase,
            session::entity::game_session::SessionVisibility,
            session::entity::session_participant::ParticipantType,
            session::entity::session_participant::ParticipantStatus,
            session::dto::SessionScenarioItem,
            session::dto::SessionItem,
            session::dto::SessionSearchResponse,
            session::dto::ParticipantItem,
            session::dto::SessionDetailResponse,
            session::dto::CreateSessionRequest,
            session::dto::JoinSessionRequest,
            session::dto::UpdatePhaseRequest,
            utils::response::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "헬스체크 API"),
        (name = "Feedback", description = "피드백/투표/댓글 API"),
        (name = "Scenario", description = "시나리오/태그/게임 시스템 API"),
        (name = "Session", description = "세션/참가자 API")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

pub fn app(state: AppState) -> Router {
    let feedback_routes = Router::new()
        .route("/search", get(feedback::handler::search_feedback))
        .route("/", post(feedback::handler::create_feedback))
        .route(
            "/:feedback_id",
            get(feedback::handler::get_feedback)
                .patch(feedback::handler::update_feedback)
                .delete(feedback::handler::delete_feedback),
        )
        .route("/:feedback_id/vote", post(feedback::handler::toggle_vote))
        .route(
            "/:feedback_id/comments",
            post(feedback::handler::create_comment),
        )
        .route(
            "/:feedback_id/status",
            patch(feedback::handler::update_status),
        );

    let scenario_routes = Router::new()
        .route("/search", get(scenario::handler::search_scenarios))
        .route("/", post(scenario::handler::create_scenario))
        .route("/import", post(scenario::handler::import_scenario))
        .route("/:scenario_id", get(scenario::handler::get_scenario));

    let session_routes = Router::new()
        .route("/search", get(session::handler::search_sessions))
        .route("/upcoming", get(session::handler::upcoming_sessions))
        .route("/history", get(session::handler::session_history))
        .route("/", post(session::handler::create_session))
        .route("/:session_id", get(session::handler::get_session))
        .route("/:session_id/join", post(session::handler::join_session))
        .route(
            "/:session_id/participants/:user_id/confirm",
            post(session::handler::confirm_participant),
        )
        .route("/:session_id/phase", patch(session::handler::update_phase));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health::health_check))
        .nest("/api/feedback", feedback_routes)
        .nest("/api/scenarios", scenario_routes)
        .nest("/api/sessions", session_routes)
        .route("/api/tags", get(scenario::handler::list_tags))
        .route("/api/systems", get(scenario::handler::list_systems))
        .layer(middleware::from_fn(global::middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
