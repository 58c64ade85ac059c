use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::bounds::{NumericField, StepDirection};
use crate::display::{Display, DisplayTopologyProvider};
use crate::error::{FieldError, PaneError};
use crate::events::DisplaysChangedEvent;
use crate::position::{render_position_options, PositionOption, ResetAffordance};
use crate::settings::{
    HighlightMatch, MenuIcon, PinsPosition, PopupPosition, PreferenceKey, SearchVisibility,
    Settings, WindowPosition,
};
use crate::storage::PreferenceStore;
use crate::view::{
    GatedPickerView, NumericFieldView, PaneView, PickerView, PopupPositionView, FOOTER_WARNING,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    ShowSpecialSymbols,
    ShowInStatusBar,
    ShowRecentCopyInMenuBar,
    ShowSearch,
    ShowTitle,
    ShowApplicationIcons,
    ShowFooter,
}

impl Toggle {
    pub fn key(self) -> PreferenceKey {
        match self {
            Toggle::ShowSpecialSymbols => PreferenceKey::ShowSpecialSymbols,
            Toggle::ShowInStatusBar => PreferenceKey::ShowInStatusBar,
            Toggle::ShowRecentCopyInMenuBar => PreferenceKey::ShowRecentCopyInMenuBar,
            Toggle::ShowSearch => PreferenceKey::ShowSearch,
            Toggle::ShowTitle => PreferenceKey::ShowTitle,
            Toggle::ShowApplicationIcons => PreferenceKey::ShowApplicationIcons,
            Toggle::ShowFooter => PreferenceKey::ShowFooter,
        }
    }

    fn read(self, settings: &Settings) -> bool {
        match self {
            Toggle::ShowSpecialSymbols => settings.show_special_symbols,
            Toggle::ShowInStatusBar => settings.show_in_status_bar,
            Toggle::ShowRecentCopyInMenuBar => settings.show_recent_copy_in_menu_bar,
            Toggle::ShowSearch => settings.show_search,
            Toggle::ShowTitle => settings.show_title,
            Toggle::ShowApplicationIcons => settings.show_application_icons,
            Toggle::ShowFooter => settings.show_footer,
        }
    }
}

/// The appearance pane: reads preferences from `S`, the display list from `D`,
/// and turns user input into validated store writes.
pub struct PreferencePane<S, D> {
    store: S,
    provider: D,
    displays: Vec<Display>,
}

impl<S, D> PreferencePane<S, D>
where
    S: PreferenceStore,
    D: DisplayTopologyProvider,
{
    pub fn new(store: S, provider: D) -> Self {
        let displays = provider.current_displays();
        debug!(displays = displays.len(), "preference pane created");
        Self {
            store,
            provider,
            displays,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn settings(&self) -> &Settings {
        self.store.settings()
    }

    pub fn list_displays(&self) -> &[Display] {
        &self.displays
    }

    /// Re-queries the display list after a topology change.
    ///
    /// Never touches a preference. Returns `None` when the list is unchanged.
    pub fn refresh_displays(&mut self) -> Option<DisplaysChangedEvent> {
        let displays = self.provider.current_displays();
        if displays == self.displays {
            debug!(displays = displays.len(), "display topology unchanged");
            return None;
        }

        info!(
            before = self.displays.len(),
            after = displays.len(),
            "display topology changed"
        );
        self.displays = displays;
        Some(DisplaysChangedEvent {
            displays: self.displays.clone(),
        })
    }

    pub fn position_options(&self) -> Vec<PositionOption> {
        let settings = self.settings();
        render_position_options(
            settings.popup_position,
            settings.popup_screen,
            &self.displays,
        )
    }

    /// Stores the position and its target screen as one update.
    pub fn select_position(
        &mut self,
        position: PopupPosition,
        screen_index: usize,
    ) -> Result<(), PaneError> {
        self.store.set_many(vec![
            (PreferenceKey::PopupScreen, json!(screen_index)),
            (PreferenceKey::PopupPosition, json!(position)),
        ])?;
        info!(?position, screen_index, "popup position selected");
        Ok(())
    }

    pub fn window_position_reset(&self) -> ResetAffordance {
        let settings = self.settings();
        ResetAffordance {
            visible: settings.popup_position == PopupPosition::LastPosition,
            enabled: settings.window_position != WindowPosition::default(),
        }
    }

    /// Returns `false` without writing when the position is already the default.
    pub fn reset_window_position(&mut self) -> Result<bool, PaneError> {
        if !self.window_position_reset().enabled {
            return Ok(false);
        }

        let default = self.store.default_value(PreferenceKey::WindowPosition);
        self.store.set(PreferenceKey::WindowPosition, default)?;
        info!("window position reset");
        Ok(true)
    }

    pub fn numeric_field(&self, field: NumericField) -> NumericFieldView {
        NumericFieldView::new(field, self.settings().numeric(field))
    }

    /// Validates typed text and stores it. Rejected input leaves the store as is.
    pub fn set_numeric_text(
        &mut self,
        field: NumericField,
        raw: &str,
    ) -> Result<f64, PaneError> {
        let value = field.domain().validate(raw).map_err(|source| {
            warn!(%field, input = raw, %source, "rejected numeric input");
            PaneError::field(field, source)
        })?;
        self.write_numeric(field, value)
    }

    pub fn set_numeric_value(
        &mut self,
        field: NumericField,
        value: f64,
    ) -> Result<f64, PaneError> {
        let domain = field.domain();
        if !value.is_finite() {
            return Err(PaneError::field(
                field,
                FieldError::NotANumber {
                    input: value.to_string(),
                },
            ));
        }
        if !domain.contains(value) {
            warn!(%field, value, "rejected out-of-range value");
            return Err(PaneError::field(
                field,
                FieldError::OutOfRange {
                    value,
                    min: domain.min,
                    max: domain.max,
                },
            ));
        }
        self.write_numeric(field, domain.normalize(value))
    }

    pub fn step_numeric(
        &mut self,
        field: NumericField,
        direction: StepDirection,
    ) -> Result<f64, PaneError> {
        let current = self.settings().numeric(field);
        let next = field.domain().step(current, direction);
        if next == current {
            return Ok(current);
        }
        self.write_numeric(field, next)
    }

    fn write_numeric(&mut self, field: NumericField, value: f64) -> Result<f64, PaneError> {
        self.store.set(field.key(), field.domain().to_json(value))?;
        debug!(%field, value, "numeric preference stored");
        Ok(value)
    }

    pub fn toggle(&self, toggle: Toggle) -> bool {
        toggle.read(self.settings())
    }

    pub fn set_toggle(&mut self, toggle: Toggle, on: bool) -> Result<(), PaneError> {
        self.store.set(toggle.key(), json!(on))?;
        debug!(key = %toggle.key(), on, "toggle stored");
        Ok(())
    }

    pub fn select_pin_to(&mut self, pin_to: PinsPosition) -> Result<(), PaneError> {
        self.store.set(PreferenceKey::PinTo, json!(pin_to))?;
        Ok(())
    }

    pub fn select_highlight_match(&mut self, style: HighlightMatch) -> Result<(), PaneError> {
        self.store.set(PreferenceKey::HighlightMatch, json!(style))?;
        Ok(())
    }

    pub fn menu_icon_enabled(&self) -> bool {
        self.settings().show_in_status_bar
    }

    pub fn select_menu_icon(&mut self, icon: MenuIcon) -> Result<(), PaneError> {
        if !self.menu_icon_enabled() {
            return Err(PaneError::Disabled {
                key: PreferenceKey::MenuIcon,
                gate: PreferenceKey::ShowInStatusBar,
            });
        }
        self.store.set(PreferenceKey::MenuIcon, json!(icon))?;
        Ok(())
    }

    pub fn search_visibility_enabled(&self) -> bool {
        self.settings().show_search
    }

    pub fn select_search_visibility(
        &mut self,
        visibility: SearchVisibility,
    ) -> Result<(), PaneError> {
        if !self.search_visibility_enabled() {
            return Err(PaneError::Disabled {
                key: PreferenceKey::SearchVisibility,
                gate: PreferenceKey::ShowSearch,
            });
        }
        self.store
            .set(PreferenceKey::SearchVisibility, json!(visibility))?;
        Ok(())
    }

    pub fn footer_warning(&self) -> Option<&'static str> {
        (!self.settings().show_footer).then_some(FOOTER_WARNING)
    }

    /// Restores every preference to its default as one update.
    pub fn reset_all(&mut self) -> Result<(), PaneError> {
        let entries = PreferenceKey::ALL
            .into_iter()
            .map(|key| (key, self.store.default_value(key)))
            .collect();
        self.store.set_many(entries)?;
        info!("all appearance preferences reset");
        Ok(())
    }

    /// Single write entry point for the webview, routed through the same checks
    /// as the typed operations.
    pub fn set_preference(&mut self, name: &str, value: Value) -> Result<(), PaneError> {
        let key = PreferenceKey::parse(name)
            .ok_or_else(|| PaneError::UnknownKey(name.to_string()))?;
        let invalid = || PaneError::InvalidValue {
            key,
            value: value.clone(),
        };

        match key {
            PreferenceKey::PopupPosition => {
                let position: PopupPosition = decode(&value).ok_or_else(invalid)?;
                let screen_index = self.settings().popup_screen;
                self.select_position(position, screen_index)
            }
            PreferenceKey::PopupScreen => {
                let screen_index = value
                    .as_u64()
                    .and_then(|v| usize::try_from(v).ok())
                    .ok_or_else(invalid)?;
                let position = self.settings().popup_position;
                self.select_position(position, screen_index)
            }
            PreferenceKey::PinTo => self.select_pin_to(decode(&value).ok_or_else(invalid)?),
            PreferenceKey::ImageMaxHeight => {
                self.set_numeric_json(NumericField::ImageMaxHeight, &value)
            }
            PreferenceKey::PreviewImageScale => {
                self.set_numeric_json(NumericField::PreviewImageScale, &value)
            }
            PreferenceKey::PreviewDelay => {
                self.set_numeric_json(NumericField::PreviewDelay, &value)
            }
            PreferenceKey::HighlightMatch => {
                self.select_highlight_match(decode(&value).ok_or_else(invalid)?)
            }
            PreferenceKey::MenuIcon => self.select_menu_icon(decode(&value).ok_or_else(invalid)?),
            PreferenceKey::SearchVisibility => {
                self.select_search_visibility(decode(&value).ok_or_else(invalid)?)
            }
            PreferenceKey::ShowInStatusBar => self.set_toggle_json(Toggle::ShowInStatusBar, &value),
            PreferenceKey::ShowRecentCopyInMenuBar => {
                self.set_toggle_json(Toggle::ShowRecentCopyInMenuBar, &value)
            }
            PreferenceKey::ShowSearch => self.set_toggle_json(Toggle::ShowSearch, &value),
            PreferenceKey::ShowTitle => self.set_toggle_json(Toggle::ShowTitle, &value),
            PreferenceKey::ShowApplicationIcons => {
                self.set_toggle_json(Toggle::ShowApplicationIcons, &value)
            }
            PreferenceKey::ShowFooter => self.set_toggle_json(Toggle::ShowFooter, &value),
            PreferenceKey::ShowSpecialSymbols => {
                self.set_toggle_json(Toggle::ShowSpecialSymbols, &value)
            }
            PreferenceKey::WindowPosition => {
                let position: WindowPosition = decode(&value).ok_or_else(invalid)?;
                if !(position.x.is_finite() && position.y.is_finite()) {
                    return Err(invalid());
                }
                self.store.set(key, json!(position))?;
                Ok(())
            }
        }
    }

    fn set_numeric_json(&mut self, field: NumericField, value: &Value) -> Result<(), PaneError> {
        match value {
            Value::String(raw) => self.set_numeric_text(field, raw).map(drop),
            Value::Number(number) => match number.as_f64() {
                Some(v) => self.set_numeric_value(field, v).map(drop),
                None => Err(PaneError::InvalidValue {
                    key: field.key(),
                    value: value.clone(),
                }),
            },
            _ => Err(PaneError::InvalidValue {
                key: field.key(),
                value: value.clone(),
            }),
        }
    }

    fn set_toggle_json(&mut self, toggle: Toggle, value: &Value) -> Result<(), PaneError> {
        let on = value.as_bool().ok_or_else(|| PaneError::InvalidValue {
            key: toggle.key(),
            value: value.clone(),
        })?;
        self.set_toggle(toggle, on)
    }

    pub fn view(&self) -> PaneView {
        let settings = self.settings();
        PaneView {
            popup_position: PopupPositionView {
                options: self.position_options(),
                reset: self.window_position_reset(),
            },
            pin_to: PickerView::new(settings.pin_to, true),
            image_max_height: self.numeric_field(NumericField::ImageMaxHeight),
            preview_image_scale: self.numeric_field(NumericField::PreviewImageScale),
            preview_delay: self.numeric_field(NumericField::PreviewDelay),
            highlight_match: PickerView::new(settings.highlight_match, true),
            show_special_symbols: settings.show_special_symbols,
            status_bar: GatedPickerView::new(settings.show_in_status_bar, settings.menu_icon),
            show_recent_copy_in_menu_bar: settings.show_recent_copy_in_menu_bar,
            search: GatedPickerView::new(settings.show_search, settings.search_visibility),
            show_title: settings.show_title,
            show_application_icons: settings.show_application_icons,
            show_footer: settings.show_footer,
            footer_warning: self.footer_warning(),
            displays: self.displays.clone(),
        }
    }
}

fn decode<T: DeserializeOwned>(value: &Value) -> Option<T> {
    serde_json::from_value(value.clone()).ok()
}
