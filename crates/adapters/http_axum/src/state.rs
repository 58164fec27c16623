//! Shared application state for axum handlers.

use std::sync::Arc;

use tokio::sync::Notify;

use silvanus_app::controller::ControllerHandle;
use silvanus_app::ports::SettingsRepository;
use silvanus_app::services::settings_service::SettingsService;
use silvanus_app::status_store::StatusReader;

/// Application state shared across all axum handlers.
///
/// Generic over the settings repository to avoid dynamic dispatch.
/// `Clone` is implemented manually so `R` itself does not need to be `Clone`.
pub struct AppState<R> {
    /// Settings read/patch service.
    pub settings_service: Arc<SettingsService<R>>,
    /// Latest status published by the controller.
    pub status: StatusReader,
    /// Command channel into the controller task.
    pub controller: ControllerHandle,
    /// Signalled by `POST /system/restart`; the daemon exits gracefully.
    pub restart: Arc<Notify>,
}

impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            settings_service: Arc::clone(&self.settings_service),
            status: self.status.clone(),
            controller: self.controller.clone(),
            restart: Arc::clone(&self.restart),
        }
    }
}

impl<R> AppState<R>
where
    R: SettingsRepository + Send + Sync + 'static,
{
    /// Create a new application state.
    pub fn new(
        settings_service: Arc<SettingsService<R>>,
        status: StatusReader,
        controller: ControllerHandle,
        restart: Arc<Notify>,
    ) -> Self {
        Self {
            settings_service,
            status,
            controller,
            restart,
        }
    }
}
