//! Persisted panel settings: one JSON blob under a fixed key in a local
//! SQLite file, fully rewritten on every tracked change.

use std::collections::HashMap;

use anyhow::Result;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

pub const SETTINGS_KEY: &str = "cost-panel";

pub const DEFAULT_SOFT_COST_PERCENT: f64 = 20.0;
pub const DEFAULT_CONTINGENCY_PERCENT: f64 = 10.0;

/// The full settings aggregate. Rates are canonical currency/m²; percentages
/// are plain numbers (20 means 20%). Serialized field names match the stored
/// blob, so blobs written by earlier versions load as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub cost_per_sqm_per_function: HashMap<String, f64>,
    pub revenue_per_sqm_per_function: HashMap<String, f64>,
    pub soft_cost_percent: f64,
    pub contingency_percent: f64,
    pub currency_symbol: String,
    pub land_cost: f64,
    pub earthwork_cost: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cost_per_sqm_per_function: HashMap::new(),
            revenue_per_sqm_per_function: HashMap::new(),
            soft_cost_percent: DEFAULT_SOFT_COST_PERCENT,
            contingency_percent: DEFAULT_CONTINGENCY_PERCENT,
            currency_symbol: String::new(),
            land_cost: 0.0,
            earthwork_cost: 0.0,
        }
    }
}

impl Settings {
    /// Merge a previously persisted subset over the defaults, field by field.
    pub fn apply(&mut self, stored: StoredSettings) {
        if let Some(v) = stored.cost_per_sqm_per_function {
            self.cost_per_sqm_per_function = v;
        }
        if let Some(v) = stored.revenue_per_sqm_per_function {
            self.revenue_per_sqm_per_function = v;
        }
        if let Some(v) = stored.soft_cost_percent {
            self.soft_cost_percent = v;
        }
        if let Some(v) = stored.contingency_percent {
            self.contingency_percent = v;
        }
        if let Some(v) = stored.currency_symbol {
            self.currency_symbol = v;
        }
        if let Some(v) = stored.land_cost {
            self.land_cost = v;
        }
        if let Some(v) = stored.earthwork_cost {
            self.earthwork_cost = v;
        }
    }
}

/// Whatever subset of fields a previous run persisted. Every field is
/// independently optional; unknown fields in the blob are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSettings {
    pub cost_per_sqm_per_function: Option<HashMap<String, f64>>,
    pub revenue_per_sqm_per_function: Option<HashMap<String, f64>>,
    pub soft_cost_percent: Option<f64>,
    pub contingency_percent: Option<f64>,
    pub currency_symbol: Option<String>,
    pub land_cost: Option<f64>,
    pub earthwork_cost: Option<f64>,
}

pub struct SettingsStore {
    conn: Connection,
}

impl SettingsStore {
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(Self { conn })
    }

    /// Missing row or unparseable blob both read as "nothing stored".
    pub fn load(&self) -> StoredSettings {
        let blob: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![SETTINGS_KEY],
                |row| row.get(0),
            )
            .ok();
        blob.and_then(|v| serde_json::from_str(&v).ok()).unwrap_or_default()
    }

    /// Overwrites the whole aggregate every time.
    pub fn save(&self, settings: &Settings) -> Result<()> {
        let blob = serde_json::to_string(settings)?;
        self.conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![SETTINGS_KEY, blob],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, SettingsStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("panel.sqlite");
        let store = SettingsStore::open(path.to_str().unwrap()).unwrap();
        (dir, store)
    }

    #[test]
    fn save_then_load_round_trips() {
        let (_dir, store) = temp_store();
        let mut settings = Settings::default();
        settings.cost_per_sqm_per_function.insert("res".to_string(), 500.0);
        settings.soft_cost_percent = 25.0;
        settings.currency_symbol = "$".to_string();
        settings.land_cost = 50_000.0;
        store.save(&settings).unwrap();

        let mut loaded = Settings::default();
        loaded.apply(store.load());
        assert_eq!(loaded, settings);
    }

    #[test]
    fn empty_store_yields_defaults() {
        let (_dir, store) = temp_store();
        let mut settings = Settings::default();
        settings.apply(store.load());
        assert_eq!(settings.soft_cost_percent, DEFAULT_SOFT_COST_PERCENT);
        assert_eq!(settings.contingency_percent, DEFAULT_CONTINGENCY_PERCENT);
        assert_eq!(settings.currency_symbol, "");
        assert_eq!(settings.land_cost, 0.0);
        assert!(settings.cost_per_sqm_per_function.is_empty());
    }

    #[test]
    fn partial_blob_keeps_defaults_for_absent_fields() {
        let (_dir, store) = temp_store();
        store
            .conn
            .execute(
                "INSERT INTO settings (key, value) VALUES (?1, ?2)",
                params![SETTINGS_KEY, r#"{"softCostPercent": 35}"#],
            )
            .unwrap();

        let mut settings = Settings::default();
        settings.apply(store.load());
        assert_eq!(settings.soft_cost_percent, 35.0);
        assert_eq!(settings.contingency_percent, DEFAULT_CONTINGENCY_PERCENT);
    }

    #[test]
    fn corrupt_blob_reads_as_nothing_stored() {
        let (_dir, store) = temp_store();
        store
            .conn
            .execute(
                "INSERT INTO settings (key, value) VALUES (?1, ?2)",
                params![SETTINGS_KEY, "{not json"],
            )
            .unwrap();

        let mut settings = Settings::default();
        settings.apply(store.load());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let (_dir, store) = temp_store();
        store
            .conn
            .execute(
                "INSERT INTO settings (key, value) VALUES (?1, ?2)",
                params![
                    SETTINGS_KEY,
                    r#"{"contingencyPercent": 12, "someFutureField": {"a": 1}}"#
                ],
            )
            .unwrap();

        let mut settings = Settings::default();
        settings.apply(store.load());
        assert_eq!(settings.contingency_percent, 12.0);
    }

    #[test]
    fn save_overwrites_prior_blob() {
        let (_dir, store) = temp_store();
        let mut first = Settings::default();
        first.land_cost = 1.0;
        store.save(&first).unwrap();

        let second = Settings::default();
        store.save(&second).unwrap();

        let mut loaded = Settings::default();
        loaded.apply(store.load());
        assert_eq!(loaded.land_cost, 0.0);
    }
}
