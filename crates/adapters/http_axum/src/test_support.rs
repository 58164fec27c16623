//! In-memory ports and a running controller for handler tests.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tower::ServiceExt;

use silvanus_app::controller::{Controller, ControllerConfig};
use silvanus_app::ports::{Actuators, Sensors, SettingsRepository};
use silvanus_app::services::settings_service::SettingsService;
use silvanus_app::status_store;
use silvanus_domain::error::{HardwareError, SensorError, SilvanusError};
use silvanus_domain::output::Output;
use silvanus_domain::settings::Settings;
use silvanus_domain::time::Timestamp;

use crate::state::AppState;

#[derive(Default)]
pub struct StubSettingsRepo {
    pub stored: Mutex<Option<Settings>>,
    pub failing: AtomicBool,
}

impl SettingsRepository for StubSettingsRepo {
    fn load(&self) -> impl Future<Output = Result<Option<Settings>, SilvanusError>> + Send {
        let stored = self.stored.lock().unwrap().clone();
        async { Ok(stored) }
    }

    fn save(&self, settings: &Settings) -> impl Future<Output = Result<(), SilvanusError>> + Send {
        let result = if self.failing.load(Ordering::SeqCst) {
            Err(SilvanusError::Storage("database is locked".into()))
        } else {
            *self.stored.lock().unwrap() = Some(settings.clone());
            Ok(())
        };
        async { result }
    }
}

#[derive(Default)]
pub struct StubBoard {
    pub light: AtomicBool,
    pub pump: AtomicBool,
}

impl Actuators for StubBoard {
    fn switch(
        &self,
        output: Output,
        on: bool,
    ) -> impl Future<Output = Result<(), HardwareError>> + Send {
        match output {
            Output::Light => self.light.store(on, Ordering::SeqCst),
            Output::Pump => self.pump.store(on, Ordering::SeqCst),
        }
        async { Ok(()) }
    }
}

impl Sensors for StubBoard {
    fn read_temperature(&self) -> impl Future<Output = Result<f64, SensorError>> + Send {
        async { Ok(22.5) }
    }

    fn read_moisture(&self) -> impl Future<Output = Result<f64, SensorError>> + Send {
        async { Ok(612.0) }
    }
}

/// 18:00 UTC: outside the default light window and every default watering
/// event.
fn evening() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 6, 21, 18, 0, 0).unwrap()
}

pub struct TestApp {
    pub state: AppState<Arc<StubSettingsRepo>>,
    pub repo: Arc<StubSettingsRepo>,
    pub board: Arc<StubBoard>,
    task: JoinHandle<()>,
}

impl TestApp {
    pub async fn start() -> Self {
        let repo = Arc::new(StubSettingsRepo::default());
        let settings_service = Arc::new(SettingsService::load(repo.clone()).await.unwrap());
        let board = Arc::new(StubBoard::default());
        let (writer, reader) = status_store::channel();
        let (controller, handle) = Controller::new(
            board.clone(),
            board.clone(),
            settings_service.subscribe(),
            writer,
            ControllerConfig::default(),
        );
        let task = tokio::spawn(controller.with_clock(evening).run());
        handle.retick().await.unwrap();

        Self {
            state: AppState::new(settings_service, reader, handle, Arc::new(Notify::new())),
            repo,
            board,
            task,
        }
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<&str>,
    ) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.map_or_else(Body::empty, |b| Body::from(b.to_owned())))
            .unwrap();
        let response = crate::router::build(self.state.clone())
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn stop(self) {
        self.state.controller.shutdown().await.unwrap();
        self.task.await.unwrap();
    }
}
