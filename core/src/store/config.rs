//! Commission configuration persistence.

use super::PayoutStore;
use crate::{
    config::{CommissionProfile, EngineConfig, Manager, ProxyMapping, RepBinding},
    error::EngineResult,
};
use rusqlite::params;
use std::collections::HashMap;

impl PayoutStore {
    /// Replace the stored configuration with `config`, atomically.
    /// All four sections are cleared and rewritten in one transaction.
    pub fn save_config(&mut self, config: &EngineConfig) -> EngineResult<()> {
        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM commission_profiles", [])?;
        for profile in &config.profiles {
            let rules_json = serde_json::to_string(&profile.rules)?;
            tx.execute(
                "INSERT INTO commission_profiles (id, name, rules) VALUES (?1, ?2, ?3)",
                params![profile.id, profile.name, rules_json],
            )?;
        }

        tx.execute("DELETE FROM managers", [])?;
        tx.execute("DELETE FROM manager_subordinates", [])?;
        for manager in &config.managers {
            tx.execute(
                "INSERT INTO managers (id, name, profile_id) VALUES (?1, ?2, ?3)",
                params![manager.id, manager.name, manager.profile_id],
            )?;
            for rep_name in &manager.subordinates {
                tx.execute(
                    "INSERT OR IGNORE INTO manager_subordinates (manager_id, rep_name)
                     VALUES (?1, ?2)",
                    params![manager.id, rep_name],
                )?;
            }
        }

        tx.execute("DELETE FROM rep_bindings", [])?;
        for binding in &config.rep_bindings {
            tx.execute(
                "INSERT OR REPLACE INTO rep_bindings (rep_name, profile_id) VALUES (?1, ?2)",
                params![binding.rep_name, binding.profile_id],
            )?;
        }

        tx.execute("DELETE FROM proxy_mappings", [])?;
        for mapping in &config.proxy_mappings {
            tx.execute(
                "INSERT OR IGNORE INTO proxy_mappings (proxy_group_key, assigned_rep_name)
                 VALUES (?1, ?2)",
                params![mapping.proxy_group_key, mapping.assigned_rep_name],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    /// Reconstruct the configuration from the four config tables.
    /// Row order follows insertion order, so a load round-trips the
    /// manager and profile ordering of the last save.
    pub fn load_config(&self) -> EngineResult<EngineConfig> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, rules FROM commission_profiles ORDER BY rowid ASC")?;
        let raw_profiles = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        let mut profiles = Vec::with_capacity(raw_profiles.len());
        for (id, name, rules_json) in raw_profiles {
            profiles.push(CommissionProfile {
                id,
                name,
                rules: serde_json::from_str(&rules_json)?,
            });
        }

        let mut stmt = self
            .conn
            .prepare("SELECT manager_id, rep_name FROM manager_subordinates ORDER BY rowid ASC")?;
        let sub_rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        let mut subs_by_manager: HashMap<String, Vec<String>> = HashMap::new();
        for (manager_id, rep_name) in sub_rows {
            subs_by_manager.entry(manager_id).or_default().push(rep_name);
        }

        let mut stmt = self
            .conn
            .prepare("SELECT id, name, profile_id FROM managers ORDER BY rowid ASC")?;
        let mut managers = stmt
            .query_map([], |row| {
                Ok(Manager {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    profile_id: row.get(2)?,
                    subordinates: Vec::new(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        for manager in &mut managers {
            manager.subordinates = subs_by_manager.remove(&manager.id).unwrap_or_default();
        }

        let mut stmt = self
            .conn
            .prepare("SELECT rep_name, profile_id FROM rep_bindings ORDER BY rowid ASC")?;
        let rep_bindings = stmt
            .query_map([], |row| {
                Ok(RepBinding {
                    rep_name: row.get(0)?,
                    profile_id: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = self.conn.prepare(
            "SELECT proxy_group_key, assigned_rep_name FROM proxy_mappings ORDER BY rowid ASC",
        )?;
        let proxy_mappings = stmt
            .query_map([], |row| {
                Ok(ProxyMapping {
                    proxy_group_key: row.get(0)?,
                    assigned_rep_name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(EngineConfig {
            profiles,
            managers,
            rep_bindings,
            proxy_mappings,
        })
    }

    /// True when at least one profile has been saved. Used to decide
    /// between the stored config and a fallback source.
    pub fn has_config(&self) -> EngineResult<bool> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM commission_profiles", [], |row| {
                row.get(0)
            })?;
        Ok(count > 0)
    }
}
