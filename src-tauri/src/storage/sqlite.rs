use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use serde_json::Value;
use tracing::{debug, warn};

use super::{stage, Listener, Listeners, PreferenceStore, SubscriptionId};
use crate::events::PreferencesChangedEvent;
use crate::settings::{apply_setting_value, PreferenceKey, Settings};

/// Preferences persisted one row per key in a `settings(key, value_json)` table.
pub struct SqliteStore {
    conn: Connection,
    settings: Settings,
    listeners: Listeners,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("failed to create db parent directory")?;
        }

        let conn = Connection::open(path).context("failed to open sqlite db")?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory db")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let mut store = Self {
            conn,
            settings: Settings::default(),
            listeners: Listeners::default(),
        };
        store.run_migrations()?;
        store.settings = store.load_settings()?;
        Ok(store)
    }

    pub fn run_migrations(&mut self) -> Result<()> {
        self.conn
            .execute_batch(include_str!("migrations/001_init.sql"))
            .context("failed to run migrations")?;
        Ok(())
    }

    /// Reads every stored row over the defaults. Rows with unknown keys or
    /// malformed values are skipped.
    pub fn load_settings(&self) -> Result<Settings> {
        let mut settings = Settings::default();
        let mut stmt = self
            .conn
            .prepare("SELECT key, value_json FROM settings")
            .context("failed to prepare settings query")?;

        let rows = stmt.query_map([], |row| {
            let key: String = row.get(0)?;
            let value: String = row.get(1)?;
            Ok((key, value))
        })?;

        for row in rows {
            let (name, value_json) = row?;
            let Some(key) = PreferenceKey::parse(&name) else {
                debug!(key = %name, "ignoring unknown preference row");
                continue;
            };
            let value: Value = serde_json::from_str(&value_json).unwrap_or(Value::Null);
            if !apply_setting_value(&mut settings, key, value) {
                warn!(%key, value = %value_json, "ignoring malformed preference row");
            }
        }

        Ok(settings)
    }

    fn upsert_setting(conn: &Connection, key: PreferenceKey, value: &Value) -> Result<()> {
        conn.execute(
            "INSERT INTO settings(key, value_json) VALUES(?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value_json = excluded.value_json",
            params![key.as_str(), value.to_string()],
        )?;
        Ok(())
    }
}

impl PreferenceStore for SqliteStore {
    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn set_many(&mut self, entries: Vec<(PreferenceKey, Value)>) -> Result<()> {
        let (next, changed) = stage(&self.settings, entries)?;
        if changed.is_empty() {
            return Ok(());
        }

        let tx = self
            .conn
            .transaction()
            .context("failed to start settings transaction")?;
        for key in &changed {
            Self::upsert_setting(&tx, *key, &next.value(*key))
                .with_context(|| format!("failed to write {key}"))?;
        }
        tx.commit().context("failed to commit settings")?;

        self.settings = next;
        self.listeners.notify(&PreferencesChangedEvent {
            keys: changed,
            settings: self.settings.clone(),
        });
        Ok(())
    }

    fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        self.listeners.add(listener)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.remove(id)
    }
}
