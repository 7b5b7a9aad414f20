use std::net::SocketAddr;
use std::sync::Arc;

use trpg_server::config::{establish_connection, AppConfig};
use trpg_server::domain::health::init_start_time;
use trpg_server::domain::scenario::scraper::HttpScenarioScraper;
use trpg_server::shutdown::shutdown_signal;
use trpg_server::utils::logging::init_logging;
use trpg_server::{app, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 환경변수 로드
    dotenvy::dotenv().ok();

    // 2. 로깅 초기화 (guard는 종료 시까지 유지)
    let _log_guard = init_logging();
    init_start_time();

    // 3. 설정 및 DB 연결
    let config = AppConfig::from_env()?;
    let db = establish_connection(&config.database_url, config.db_schema_update).await?;
    let scraper = Arc::new(HttpScenarioScraper::new(&config)?);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let state = AppState {
        db,
        config,
        scraper,
    };

    // 4. 서버 실행
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
