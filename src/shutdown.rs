use tokio::signal;
use tracing::{error, info};

/// SIGTERM 또는 SIGINT(Ctrl+C)를 받으면 반환합니다.
///
/// axum이 진행 중인 요청을 마친 뒤 종료하도록 `with_graceful_shutdown`에 넘깁니다.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Ctrl+C 핸들러 등록 실패");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "SIGTERM 핸들러 등록 실패");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C signal"),
        _ = terminate => info!("Received SIGTERM signal"),
    }

    info!("Initiating graceful shutdown...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn shutdown_signal_should_wait_for_signal() {
        let result = timeout(Duration::from_millis(10), shutdown_signal()).await;

        assert!(result.is_err(), "shutdown_signal should wait for signal");
    }
}
