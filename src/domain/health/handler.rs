use axum::{extract::State, Json};

use super::dto::{HealthState, HealthStatus};
use super::service::check_health;
use crate::state::AppState;

/// 헬스체크
///
/// DB가 느리거나 닿지 않아도 200으로 응답하고, 상태는 `status` 필드로 구분합니다.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "healthy / degraded / unhealthy", body = HealthStatus)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthStatus> {
    let health = check_health(&state.db).await;

    if health.status != HealthState::Healthy {
        tracing::warn!(
            status = ?health.status,
            latency_ms = health.database.latency_ms,
            error = health.database.error.as_deref().unwrap_or_default(),
            "DB 헬스체크 이상"
        );
    }

    Json(health)
}
