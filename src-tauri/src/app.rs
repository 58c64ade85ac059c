use std::sync::{Arc, Mutex};

use anyhow::Context;
use tauri::image::Image;
use tauri::menu::{Menu, MenuEvent, MenuItem};
use tauri::tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent};
use tauri::{AppHandle, Emitter, Manager, WindowEvent};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::commands;
use crate::display::{Display, DisplayTopologyProvider};
use crate::events::PREFERENCES_CHANGED;
use crate::pane::PreferencePane;
use crate::storage::{PreferenceStore, SqliteStore};

pub type DesktopPane = PreferencePane<SqliteStore, MonitorDisplays>;

pub struct SharedState {
    pub pane: Mutex<DesktopPane>,
}

/// Display enumeration backed by the windowing runtime's monitor list.
pub struct MonitorDisplays {
    app: AppHandle,
}

impl DisplayTopologyProvider for MonitorDisplays {
    fn current_displays(&self) -> Vec<Display> {
        match self.app.available_monitors() {
            Ok(monitors) => monitors
                .iter()
                .enumerate()
                .map(|(index, monitor)| {
                    let name = monitor
                        .name()
                        .cloned()
                        .unwrap_or_else(|| format!("Display {}", index + 1));
                    Display::new(index, name)
                })
                .collect(),
            Err(err) => {
                warn!(%err, "failed to enumerate monitors");
                Vec::new()
            }
        }
    }
}

pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tauri::Builder::default()
        .setup(|app| {
            let app_dir = app
                .path()
                .app_data_dir()
                .context("failed to resolve app data dir")?;
            let db_path = app_dir.join("preferences.db");
            let mut store = SqliteStore::open(&db_path)?;
            info!(path = %db_path.display(), "preferences loaded");

            let handle = app.handle().clone();
            store.subscribe(Box::new(move |event| {
                if let Err(err) = handle.emit(PREFERENCES_CHANGED, event.clone()) {
                    warn!(%err, "failed to emit preference change");
                }
            }));

            let displays = MonitorDisplays {
                app: app.handle().clone(),
            };
            let state = Arc::new(SharedState {
                pane: Mutex::new(PreferencePane::new(store, displays)),
            });

            app.manage(state);
            setup_tray(app.handle())?;

            Ok(())
        })
        .on_window_event(|window, event| {
            if let WindowEvent::ScaleFactorChanged { .. } = event {
                if let Err(err) = commands::refresh_and_emit(window.app_handle()) {
                    warn!(%err, "failed to refresh displays");
                }
            }
        })
        .invoke_handler(tauri::generate_handler![
            commands::get_preference_pane,
            commands::set_preference,
            commands::set_numeric_text,
            commands::step_numeric,
            commands::select_popup_position,
            commands::reset_window_position,
            commands::reset_all_preferences,
            commands::refresh_displays,
            commands::open_settings_window,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

fn setup_tray(app: &AppHandle) -> anyhow::Result<()> {
    let settings_item =
        MenuItem::with_id(app, "open_settings", "Appearance…", true, None::<&str>)?;
    let quit_item = MenuItem::with_id(app, "quit", "Quit", true, None::<&str>)?;
    let menu = Menu::with_items(app, &[&settings_item, &quit_item])?;

    let mut tray_builder = TrayIconBuilder::new()
        .icon(tray_icon_image())
        .menu(&menu)
        .on_menu_event(|app, event: MenuEvent| match event.id().as_ref() {
            "open_settings" => {
                let _ = commands::open_settings_window(app.clone());
            }
            "quit" => {
                app.exit(0);
            }
            _ => {}
        })
        .on_tray_icon_event(|tray: &tauri::tray::TrayIcon, event: TrayIconEvent| {
            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } = event
            {
                let _ = commands::open_settings_window(tray.app_handle().clone());
            }
        });

    #[cfg(target_os = "macos")]
    {
        tray_builder = tray_builder.icon_as_template(true);
    }

    let tray = tray_builder.build(app)?;

    // Keep tray alive for whole process lifetime.
    Box::leak(Box::new(tray));

    Ok(())
}

/// Three horizontal slider tracks with knobs at different offsets.
fn tray_icon_image() -> Image<'static> {
    const W: usize = 18;
    const H: usize = 18;
    const TRACKS: [(usize, usize); 3] = [(4, 5), (9, 11), (14, 7)];
    let mut rgba = vec![0u8; W * H * 4];

    for y in 0..H {
        for x in 0..W {
            let on = TRACKS.iter().any(|&(row, knob)| {
                let track = y == row && (2..16).contains(&x);
                let handle = y.abs_diff(row) <= 1 && x.abs_diff(knob) <= 1;
                track || handle
            });
            if on {
                let i = (y * W + x) * 4;
                rgba[i + 3] = 255;
            }
        }
    }

    Image::new_owned(rgba, W as u32, H as u32)
}
