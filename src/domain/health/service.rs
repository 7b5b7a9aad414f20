use std::sync::OnceLock;
use std::time::{Duration, Instant};

use sea_orm::DatabaseConnection;
use tokio::time::timeout;

use super::dto::{DatabaseCheck, HealthStatus};

static STARTED_AT: OnceLock<Instant> = OnceLock::new();

const PING_TIMEOUT: Duration = Duration::from_secs(3);

const DEGRADED_AFTER_MS: u64 = 500;

/// 서버 기동 시점을 기록합니다. 두 번째 호출부터는 무시됩니다.
pub fn init_start_time() {
    STARTED_AT.get_or_init(Instant::now);
}

fn uptime_secs() -> u64 {
    STARTED_AT
        .get()
        .map_or(0, |started| started.elapsed().as_secs())
}

pub async fn check_health(db: &DatabaseConnection) -> HealthStatus {
    let database = ping_database(db, PING_TIMEOUT).await;

    HealthStatus {
        status: database.state(DEGRADED_AFTER_MS),
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: uptime_secs(),
        database,
    }
}

async fn ping_database(db: &DatabaseConnection, limit: Duration) -> DatabaseCheck {
    let started = Instant::now();

    match timeout(limit, db.ping()).await {
        Ok(Ok(())) => DatabaseCheck::reachable(elapsed_ms(started)),
        Ok(Err(err)) => DatabaseCheck::unreachable(elapsed_ms(started), err.to_string()),
        Err(_) => DatabaseCheck::unreachable(
            u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
            format!("{}ms 안에 응답이 없습니다.", limit.as_millis()),
        ),
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
