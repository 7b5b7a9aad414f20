use serde::Serialize;
use utoipa::ToSchema;

/// `/health` 응답
#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: HealthState,
    #[schema(example = "0.1.0")]
    pub version: &'static str,
    /// 프로세스 기동 후 경과 시간 (초)
    #[schema(example = 3600)]
    pub uptime_secs: u64,
    pub database: DatabaseCheck,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    /// DB는 응답하지만 느림
    Degraded,
    /// DB에 닿지 못함
    Unhealthy,
}

/// DB ping 결과
///
/// 타임아웃도 `reachable = false`로 기록되며, 이때 `latencyMs`는 타임아웃 한도입니다.
#[derive(Serialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseCheck {
    #[schema(example = true)]
    pub reachable: bool,
    #[schema(example = 12)]
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DatabaseCheck {
    pub fn reachable(latency_ms: u64) -> Self {
        Self {
            reachable: true,
            latency_ms,
            error: None,
        }
    }

    pub fn unreachable(latency_ms: u64, error: impl Into<String>) -> Self {
        Self {
            reachable: false,
            latency_ms,
            error: Some(error.into()),
        }
    }

    /// 응답 시간이 `degraded_after_ms` 이상이면 Degraded
    pub fn state(&self, degraded_after_ms: u64) -> HealthState {
        match (self.reachable, self.latency_ms) {
            (false, _) => HealthState::Unhealthy,
            (true, ms) if ms >= degraded_after_ms => HealthState::Degraded,
            (true, _) => HealthState::Healthy,
        }
    }
}
