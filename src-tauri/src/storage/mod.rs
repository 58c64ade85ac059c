mod sqlite;

use anyhow::{bail, Result};
use serde_json::Value;

use crate::events::PreferencesChangedEvent;
use crate::settings::{apply_setting_value, PreferenceKey, Settings};

pub use sqlite::SqliteStore;

pub type SubscriptionId = u64;

pub type Listener = Box<dyn FnMut(&PreferencesChangedEvent) + Send>;

/// Process-wide key/value layer behind every preference.
///
/// Writes are visible to the next read. `set_many` applies all of its entries
/// before any listener runs, so listeners never observe half of an update.
pub trait PreferenceStore {
    fn settings(&self) -> &Settings;

    fn set_many(&mut self, entries: Vec<(PreferenceKey, Value)>) -> Result<()>;

    fn subscribe(&mut self, listener: Listener) -> SubscriptionId;

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;

    fn get(&self, key: PreferenceKey) -> Value {
        self.settings().value(key)
    }

    fn default_value(&self, key: PreferenceKey) -> Value {
        Settings::default().value(key)
    }

    fn set(&mut self, key: PreferenceKey, value: Value) -> Result<()> {
        self.set_many(vec![(key, value)])
    }
}

#[derive(Default)]
pub struct Listeners {
    next_id: SubscriptionId,
    entries: Vec<(SubscriptionId, Listener)>,
}

impl Listeners {
    pub fn add(&mut self, listener: Listener) -> SubscriptionId {
        self.next_id += 1;
        self.entries.push((self.next_id, listener));
        self.next_id
    }

    pub fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn notify(&mut self, event: &PreferencesChangedEvent) {
        for (_, listener) in &mut self.entries {
            listener(event);
        }
    }
}

/// Applies `entries` to a copy of `current`.
///
/// Fails without side effects if any entry has the wrong shape. Returns the new
/// settings and the keys whose value actually changed.
pub fn stage(
    current: &Settings,
    entries: Vec<(PreferenceKey, Value)>,
) -> Result<(Settings, Vec<PreferenceKey>)> {
    let mut next = current.clone();
    let mut written = Vec::with_capacity(entries.len());

    for (key, value) in entries {
        if !apply_setting_value(&mut next, key, value.clone()) {
            bail!("invalid value for {key}: {value}");
        }
        if !written.contains(&key) {
            written.push(key);
        }
    }

    let changed = written
        .into_iter()
        .filter(|key| next.value(*key) != current.value(*key))
        .collect();
    Ok((next, changed))
}

/// In-process store; used when no database is available and by tests.
#[derive(Default)]
pub struct MemoryStore {
    settings: Settings,
    listeners: Listeners,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            listeners: Listeners::default(),
        }
    }
}

impl PreferenceStore for MemoryStore {
    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn set_many(&mut self, entries: Vec<(PreferenceKey, Value)>) -> Result<()> {
        let (next, changed) = stage(&self.settings, entries)?;
        if changed.is_empty() {
            return Ok(());
        }

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

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use super::*;
    use crate::settings::PopupPosition;

    type Seen = Arc<Mutex<Vec<PreferencesChangedEvent>>>;

    fn recording(store: &mut impl PreferenceStore) -> (SubscriptionId, Seen) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let id = store.subscribe(Box::new(move |event| {
            sink.lock().expect("listener sink").push(event.clone());
        }));
        (id, seen)
    }

    #[test]
    fn multi_key_write_notifies_once_with_both_keys() {
        let mut store = MemoryStore::new();
        let (_, seen) = recording(&mut store);

        store
            .set_many(vec![
                (PreferenceKey::PopupScreen, json!(2)),
                (PreferenceKey::PopupPosition, json!("center")),
            ])
            .expect("write");

        let seen = seen.lock().expect("seen");
        assert_eq!(seen.len(), 1);
        assert_eq!(
            seen[0].keys,
            vec![PreferenceKey::PopupScreen, PreferenceKey::PopupPosition]
        );
        assert_eq!(seen[0].settings.popup_position, PopupPosition::Center);
        assert_eq!(seen[0].settings.popup_screen, 2);
    }

    #[test]
    fn rejected_batch_changes_nothing() {
        let mut store = MemoryStore::new();
        let (_, seen) = recording(&mut store);

        let result = store.set_many(vec![
            (PreferenceKey::PopupScreen, json!(1)),
            (PreferenceKey::PopupPosition, json!("nowhere")),
        ]);

        assert!(result.is_err());
        assert_eq!(store.settings(), &Settings::default());
        assert!(seen.lock().expect("seen").is_empty());
    }

    #[test]
    fn unchanged_write_is_silent() {
        let mut store = MemoryStore::new();
        let (_, seen) = recording(&mut store);

        store
            .set(PreferenceKey::ShowFooter, json!(true))
            .expect("write");
        assert!(seen.lock().expect("seen").is_empty());
    }

    #[test]
    fn unsubscribed_listener_is_not_called() {
        let mut store = MemoryStore::new();
        let (id, seen) = recording(&mut store);

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store
            .set(PreferenceKey::ShowTitle, json!(false))
            .expect("write");
        assert!(seen.lock().expect("seen").is_empty());
    }

    #[test]
    fn seeded_store_reports_seeded_values() {
        let seeded = Settings {
            popup_position: PopupPosition::LastPosition,
            popup_screen: 1,
            ..Settings::default()
        };
        let store = MemoryStore::with_settings(seeded);
        assert_eq!(store.get(PreferenceKey::PopupPosition), json!("lastPosition"));
        assert_eq!(store.get(PreferenceKey::PopupScreen), json!(1));
        assert_eq!(store.default_value(PreferenceKey::PopupScreen), json!(0));
    }

    #[test]
    fn out_of_range_write_is_clamped() {
        let mut store = MemoryStore::new();
        store
            .set(PreferenceKey::PreviewDelay, json!(5))
            .expect("write");
        assert_eq!(store.get(PreferenceKey::PreviewDelay), json!(200));
        assert_eq!(store.default_value(PreferenceKey::PreviewDelay), json!(1500));
    }
}
