//! Settings repository port: persistence for [`Settings`].

use std::future::Future;

use silvanus_domain::error::SilvanusError;
use silvanus_domain::settings::Settings;

/// Repository for persisting the single [`Settings`] record.
pub trait SettingsRepository {
    /// Load the stored settings, `None` on first boot.
    fn load(&self) -> impl Future<Output = Result<Option<Settings>, SilvanusError>> + Send;

    /// Store `settings`, replacing any previous record.
    fn save(&self, settings: &Settings) -> impl Future<Output = Result<(), SilvanusError>> + Send;
}

impl<T: SettingsRepository + Send + Sync> SettingsRepository for std::sync::Arc<T> {
    fn load(&self) -> impl Future<Output = Result<Option<Settings>, SilvanusError>> + Send {
        (**self).load()
    }

    fn save(&self, settings: &Settings) -> impl Future<Output = Result<(), SilvanusError>> + Send {
        (**self).save(settings)
    }
}
