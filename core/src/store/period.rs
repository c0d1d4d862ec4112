//! Saved period snapshots.

use super::PayoutStore;
use crate::{
    error::{EngineError, EngineResult},
    snapshot::{PeriodMeta, PeriodSnapshot},
};
use rusqlite::{params, OptionalExtension};

impl PayoutStore {
    /// Save a period snapshot, replacing any earlier save for the same
    /// year and month.
    pub fn save_period_snapshot(
        &self,
        year: i32,
        month: u32,
        created_at: &str,
        snapshot: &PeriodSnapshot,
    ) -> EngineResult<()> {
        let state_json = serde_json::to_string(snapshot)?;
        self.conn.execute(
            "INSERT INTO period_snapshots (year, month, created_at, state)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(year, month) DO UPDATE SET
                 created_at = excluded.created_at,
                 state = excluded.state",
            params![year, month, created_at, state_json],
        )?;
        Ok(())
    }

    pub fn load_period_snapshot(&self, year: i32, month: u32) -> EngineResult<PeriodSnapshot> {
        let state_json: Option<String> = self
            .conn
            .query_row(
                "SELECT state FROM period_snapshots WHERE year = ?1 AND month = ?2",
                params![year, month],
                |row| row.get(0),
            )
            .optional()?;
        match state_json {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Err(EngineError::SnapshotNotFound { year, month }),
        }
    }

    /// List saved periods, newest first.
    pub fn list_periods(&self) -> EngineResult<Vec<PeriodMeta>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, year, month, created_at FROM period_snapshots
             ORDER BY year DESC, month DESC",
        )?;
        let periods = stmt
            .query_map([], |row| {
                Ok(PeriodMeta {
                    id: row.get(0)?,
                    year: row.get(1)?,
                    month: row.get(2)?,
                    created_at: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(periods)
    }
}
