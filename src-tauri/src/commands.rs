use std::sync::Arc;

use serde_json::Value;
use tauri::{AppHandle, Emitter, Manager, State};
use tracing::warn;

use crate::app::{DesktopPane, SharedState};
use crate::bounds::{NumericField, StepDirection};
use crate::error::PaneError;
use crate::events::DISPLAYS_CHANGED;
use crate::settings::PopupPosition;
use crate::view::PaneView;

#[tauri::command]
pub fn get_preference_pane(state: State<'_, Arc<SharedState>>) -> Result<PaneView, String> {
    Ok(state.pane.lock().map_err(err_to_string)?.view())
}

#[tauri::command]
pub fn set_preference(
    state: State<'_, Arc<SharedState>>,
    key: String,
    value: Value,
) -> Result<PaneView, String> {
    with_pane(&state, |pane| pane.set_preference(&key, value))
}

#[tauri::command]
pub fn set_numeric_text(
    state: State<'_, Arc<SharedState>>,
    field: NumericField,
    text: String,
) -> Result<PaneView, String> {
    with_pane(&state, |pane| pane.set_numeric_text(field, &text).map(drop))
}

#[tauri::command]
pub fn step_numeric(
    state: State<'_, Arc<SharedState>>,
    field: NumericField,
    direction: StepDirection,
) -> Result<PaneView, String> {
    with_pane(&state, |pane| pane.step_numeric(field, direction).map(drop))
}

#[tauri::command]
pub fn select_popup_position(
    state: State<'_, Arc<SharedState>>,
    position: PopupPosition,
    screen_index: usize,
) -> Result<PaneView, String> {
    with_pane(&state, |pane| pane.select_position(position, screen_index))
}

#[tauri::command]
pub fn reset_window_position(state: State<'_, Arc<SharedState>>) -> Result<PaneView, String> {
    with_pane(&state, |pane| pane.reset_window_position().map(drop))
}

#[tauri::command]
pub fn reset_all_preferences(state: State<'_, Arc<SharedState>>) -> Result<PaneView, String> {
    with_pane(&state, |pane| pane.reset_all())
}

#[tauri::command]
pub fn refresh_displays(app: AppHandle) -> Result<PaneView, String> {
    refresh_and_emit(&app)
}

#[tauri::command]
pub fn open_settings_window(app: AppHandle) -> Result<(), String> {
    if let Some(window) = app.get_webview_window("settings") {
        window.show().map_err(err_to_string)?;
        window.set_focus().map_err(err_to_string)?;
    }
    Ok(())
}

/// Re-reads the monitor list and tells every window when it changed.
pub fn refresh_and_emit(app: &AppHandle) -> Result<PaneView, String> {
    let state = app.state::<Arc<SharedState>>();
    let mut pane = state.pane.lock().map_err(err_to_string)?;
    if let Some(event) = pane.refresh_displays() {
        if let Err(err) = app.emit(DISPLAYS_CHANGED, event) {
            warn!(%err, "failed to emit display change");
        }
    }
    Ok(pane.view())
}

fn with_pane(
    state: &State<'_, Arc<SharedState>>,
    update: impl FnOnce(&mut DesktopPane) -> Result<(), PaneError>,
) -> Result<PaneView, String> {
    let mut pane = state.pane.lock().map_err(err_to_string)?;
    update(&mut *pane).map_err(err_to_string)?;
    Ok(pane.view())
}

fn err_to_string<E: std::fmt::Display>(e: E) -> String {
    e.to_string()
}
