use chrono::Utc;
use sqlx::{FromRow, SqlitePool};
use sqlx::types::Json as SqlxJson;
use tracing::{error, info};

use crate::dto::draft_dto::DraftState;
use crate::dto::settings_dto::DraftSettings;
use crate::error::ApiError;
use crate::services::draft_engine::{DraftAction, DraftError};
use crate::services::session_registry::{SessionRecord, SessionRegistry, SharedRegistry, TickReport};
use crate::services::turn_timer::TurnTimerState;

#[derive(Debug, FromRow)]
struct DraftSessionRow {
    state: SqlxJson<DraftState>,
    settings: SqlxJson<DraftSettings>,
    timer: SqlxJson<TurnTimerState>,
}

/// Saves draft sessions as JSON rows so they survive a restart.
#[derive(Clone)]
pub struct DraftStore {
    pool: SqlitePool,
}

impl DraftStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn save(&self, record: &SessionRecord) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO draft_sessions (id, state, settings, timer, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                state = excluded.state,
                settings = excluded.settings,
                timer = excluded.timer,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&record.state.id)
        .bind(SqlxJson(&record.state))
        .bind(SqlxJson(&record.settings))
        .bind(SqlxJson(&record.timer))
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM draft_sessions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn load_all(&self) -> Result<Vec<SessionRecord>, sqlx::Error> {
        let rows = sqlx::query_as::<_, DraftSessionRow>(
            "SELECT state, settings, timer FROM draft_sessions ORDER BY updated_at",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| SessionRecord {
                state: row.state.0,
                settings: row.settings.0,
                timer: row.timer.0,
            })
            .collect())
    }

    async fn save_logged(&self, record: &SessionRecord) {
        if let Err(e) = self.save(record).await {
            error!("Failed to save draft {}: {:?}", record.state.id, e);
        }
    }

    // The methods below hold the registry write lock until the row is written,
    // so rows land in the same order as the changes they record.

    /// Runs an action and saves the new record.
    pub async fn apply(
        &self,
        registry: &SharedRegistry,
        id: &str,
        action: &DraftAction,
    ) -> Result<SessionRecord, DraftError> {
        let mut guard = registry.write().await;
        let record = guard.apply(id, action)?;
        self.save_logged(&record).await;
        Ok(record)
    }

    /// One timer second. Forced turns and spent overtime are saved.
    pub async fn tick(&self, registry: &SharedRegistry, id: &str) -> Result<TickReport, DraftError> {
        let mut guard = registry.write().await;
        let report = guard.tick(id)?;
        if let Some(record) = report.to_save() {
            self.save_logged(record).await;
        }
        Ok(report)
    }

    /// Drops a live session and its row.
    pub async fn remove(&self, registry: &SharedRegistry, id: &str) -> Result<(), ApiError> {
        let mut guard = registry.write().await;
        guard.remove(id)?;
        self.delete(id).await?;
        Ok(())
    }

    /// Fills the registry with every saved session. Returns how many were restored.
    pub async fn restore_into(&self, registry: &mut SessionRegistry) -> usize {
        match self.load_all().await {
            Ok(records) => {
                let count = records.len();
                for record in records {
                    registry.restore(record);
                }
                info!("Restored {} draft sessions from DB.", count);
                count
            }
            Err(e) => {
                error!("Failed to load draft sessions from DB: {:?}", e);
                0
            }
        }
    }
}
