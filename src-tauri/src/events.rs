use serde::Serialize;

use crate::display::Display;
use crate::settings::{PreferenceKey, Settings};

pub const PREFERENCES_CHANGED: &str = "preferences:changed";
pub const DISPLAYS_CHANGED: &str = "displays:changed";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesChangedEvent {
    pub keys: Vec<PreferenceKey>,
    pub settings: Settings,
}

#[derive(Debug, Clone, Serialize)]
pub struct DisplaysChangedEvent {
    pub displays: Vec<Display>,
}
