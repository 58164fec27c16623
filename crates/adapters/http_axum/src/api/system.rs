//! `/system/restart`

use axum::extract::State;
use axum::http::StatusCode;

use silvanus_app::ports::SettingsRepository;

use crate::state::AppState;

/// `POST /system/restart`
///
/// Asks the daemon to exit gracefully; a supervisor is expected to start it
/// again. The response is sent before the server drains.
pub async fn restart<R>(State(state): State<AppState<R>>) -> StatusCode
where
    R: SettingsRepository + Send + Sync + 'static,
{
    tracing::warn!("restart requested over HTTP");
    state.restart.notify_one();
    StatusCode::ACCEPTED
}

#[cfg(test)]
mod tests {
    use crate::test_support::TestApp;
    use axum::http::StatusCode;
    use std::time::Duration;

    #[tokio::test]
    async fn should_accept_restart_and_signal_daemon() {
        let app = TestApp::start().await;
        let restart = app.state.restart.clone();

        let (status, _) = app.request("POST", "/system/restart", None).await;

        assert_eq!(status, StatusCode::ACCEPTED);
        tokio::time::timeout(Duration::from_secs(1), restart.notified())
            .await
            .unwrap();
        app.stop().await;
    }
}
