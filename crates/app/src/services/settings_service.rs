//! Settings service: use-cases for reading and patching [`Settings`].
//!
//! The current settings are published on a [`watch`] channel so the
//! controller always schedules against the latest accepted values. Patches
//! are serialised: merge, validate, persist and publish happen under one lock,
//! so a patch is either fully applied or fully rejected.

use tokio::sync::{Mutex, watch};

use silvanus_domain::error::SilvanusError;
use silvanus_domain::schedule::WateringPlan;
use silvanus_domain::settings::{Settings, SettingsPatch};

use crate::ports::SettingsRepository;

/// Application service for settings.
pub struct SettingsService<R> {
    repo: R,
    current: watch::Sender<Settings>,
    patch_lock: Mutex<()>,
}

impl<R: SettingsRepository> SettingsService<R> {
    /// Load settings from `repo`, creating and persisting defaults on first
    /// boot.
    ///
    /// Stored settings that no longer validate are replaced with defaults.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn load(repo: R) -> Result<Self, SilvanusError> {
        let settings = match repo.load().await? {
            Some(stored) => match stored.validate() {
                Ok(()) => {
                    tracing::info!(?stored, "settings loaded");
                    stored
                }
                Err(err) => {
                    tracing::warn!(error = %err, ?stored, "stored settings invalid, using defaults");
                    let defaults = Settings::default();
                    repo.save(&defaults).await?;
                    defaults
                }
            },
            None => {
                tracing::info!("no stored settings, using defaults");
                let defaults = Settings::default();
                repo.save(&defaults).await?;
                defaults
            }
        };
        log_plan(&settings);

        let (current, _) = watch::channel(settings);
        Ok(Self {
            repo,
            current,
            patch_lock: Mutex::new(()),
        })
    }

    /// The settings currently in force.
    #[must_use]
    pub fn get(&self) -> Settings {
        self.current.borrow().clone()
    }

    /// Subscribe to settings changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Settings> {
        self.current.subscribe()
    }

    /// Merge `patch` into the current settings, validate, persist and
    /// publish the result.
    ///
    /// # Errors
    ///
    /// Returns [`SilvanusError::Config`] if the merged settings are invalid,
    /// or a storage error from the repository. In both cases the current
    /// settings are unchanged.
    pub async fn patch(&self, patch: &SettingsPatch) -> Result<Settings, SilvanusError> {
        if patch.is_empty() {
            return Ok(self.get());
        }
        let _guard = self.patch_lock.lock().await;

        let merged = self.get().merged(patch);
        if let Err(err) = merged.validate() {
            tracing::warn!(error = %err, ?patch, "settings patch rejected");
            return Err(err.into());
        }

        self.repo.save(&merged).await?;
        self.current.send_replace(merged.clone());
        tracing::info!(settings = ?merged, "settings updated");
        log_plan(&merged);
        Ok(merged)
    }
}

fn log_plan(settings: &Settings) {
    if let Ok(plan) = WateringPlan::derive(settings) {
        tracing::info!(
            events_per_day = plan.events_per_day,
            spacing_secs = plan.spacing.as_secs(),
            duration_secs = plan.duration.as_secs(),
            daily_runtime_secs = plan.daily_runtime().as_secs(),
            "watering plan"
        );
    }
}
