//! `SQLite` implementation of [`SettingsRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use silvanus_app::ports::SettingsRepository;
use silvanus_domain::error::SilvanusError;
use silvanus_domain::settings::Settings;
use silvanus_domain::time::now;

use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`Settings`].
struct Wrapper(Settings);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Settings> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(Settings {
            light_interval: row.try_get("light_interval")?,
            light_time: row.try_get("light_time")?,
            water_amount_per_day: row.try_get("water_amount_per_day")?,
            water_flow_rate: row.try_get("water_flow_rate")?,
            water_time: row.try_get("water_time")?,
        }))
    }
}

const SELECT: &str = "SELECT * FROM settings WHERE id = 1";
const UPSERT: &str = "INSERT INTO settings \
    (id, light_interval, light_time, water_amount_per_day, water_flow_rate, water_time, updated_at) \
    VALUES (1, ?, ?, ?, ?, ?, ?) \
    ON CONFLICT (id) DO UPDATE SET \
    light_interval = excluded.light_interval, \
    light_time = excluded.light_time, \
    water_amount_per_day = excluded.water_amount_per_day, \
    water_flow_rate = excluded.water_flow_rate, \
    water_time = excluded.water_time, \
    updated_at = excluded.updated_at";

/// `SQLite`-backed settings repository. Settings live in a single row.
pub struct SqliteSettingsRepository {
    pool: SqlitePool,
}

impl SqliteSettingsRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl SettingsRepository for SqliteSettingsRepository {
    fn load(&self) -> impl Future<Output = Result<Option<Settings>, SilvanusError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn save(&self, settings: &Settings) -> impl Future<Output = Result<(), SilvanusError>> + Send {
        let pool = self.pool.clone();
        let settings = settings.clone();
        async move {
            sqlx::query(UPSERT)
                .bind(settings.light_interval)
                .bind(settings.light_time)
                .bind(settings.water_amount_per_day)
                .bind(settings.water_flow_rate)
                .bind(settings.water_time)
                .bind(now())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }
}
