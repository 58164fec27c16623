//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod light;
#[allow(clippy::missing_errors_doc)]
pub mod settings;
#[allow(clippy::missing_errors_doc)]
pub mod status;
pub mod system;

use axum::Router;
use axum::routing::{get, post, put};

use silvanus_app::ports::SettingsRepository;

use crate::state::AppState;

/// Build the API routes. Paths are served from the root, as the web client
/// expects.
pub fn routes<R>() -> Router<AppState<R>>
where
    R: SettingsRepository + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/system/settings",
            get(settings::get::<R>).patch(settings::patch::<R>),
        )
        .route("/system/restart", post(system::restart::<R>))
        .route("/status", get(status::get::<R>))
        .route("/light", put(light::force::<R>))
        .route("/auto-light", post(light::auto::<R>))
}
