use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::bounds::NumericField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PreferenceKey {
    PopupPosition,
    PopupScreen,
    PinTo,
    ImageMaxHeight,
    PreviewImageScale,
    PreviewDelay,
    HighlightMatch,
    MenuIcon,
    ShowInStatusBar,
    ShowRecentCopyInMenuBar,
    ShowSearch,
    SearchVisibility,
    ShowTitle,
    ShowApplicationIcons,
    ShowFooter,
    ShowSpecialSymbols,
    WindowPosition,
}

impl PreferenceKey {
    pub const ALL: [PreferenceKey; 17] = [
        PreferenceKey::PopupPosition,
        PreferenceKey::PopupScreen,
        PreferenceKey::PinTo,
        PreferenceKey::ImageMaxHeight,
        PreferenceKey::PreviewImageScale,
        PreferenceKey::PreviewDelay,
        PreferenceKey::HighlightMatch,
        PreferenceKey::MenuIcon,
        PreferenceKey::ShowInStatusBar,
        PreferenceKey::ShowRecentCopyInMenuBar,
        PreferenceKey::ShowSearch,
        PreferenceKey::SearchVisibility,
        PreferenceKey::ShowTitle,
        PreferenceKey::ShowApplicationIcons,
        PreferenceKey::ShowFooter,
        PreferenceKey::ShowSpecialSymbols,
        PreferenceKey::WindowPosition,
    ];

    /// Name used as the row key in the settings table and on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            PreferenceKey::PopupPosition => "popupPosition",
            PreferenceKey::PopupScreen => "popupScreen",
            PreferenceKey::PinTo => "pinTo",
            PreferenceKey::ImageMaxHeight => "imageMaxHeight",
            PreferenceKey::PreviewImageScale => "previewImageScale",
            PreferenceKey::PreviewDelay => "previewDelay",
            PreferenceKey::HighlightMatch => "highlightMatch",
            PreferenceKey::MenuIcon => "menuIcon",
            PreferenceKey::ShowInStatusBar => "showInStatusBar",
            PreferenceKey::ShowRecentCopyInMenuBar => "showRecentCopyInMenuBar",
            PreferenceKey::ShowSearch => "showSearch",
            PreferenceKey::SearchVisibility => "searchVisibility",
            PreferenceKey::ShowTitle => "showTitle",
            PreferenceKey::ShowApplicationIcons => "showApplicationIcons",
            PreferenceKey::ShowFooter => "showFooter",
            PreferenceKey::ShowSpecialSymbols => "showSpecialSymbols",
            PreferenceKey::WindowPosition => "windowPosition",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }
}

impl fmt::Display for PreferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finite set of values rendered as a picker.
pub trait Choice: Copy + PartialEq + Serialize + 'static {
    const ALL: &'static [Self];

    fn label(self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PopupPosition {
    Mouse,
    StatusItem,
    ActiveScreen,
    Center,
    LastPosition,
}

impl PopupPosition {
    /// Positions that can target a specific display when several are attached.
    pub fn targets_screen(self) -> bool {
        matches!(self, PopupPosition::Center | PopupPosition::LastPosition)
    }
}

impl Choice for PopupPosition {
    const ALL: &'static [Self] = &[
        PopupPosition::Mouse,
        PopupPosition::StatusItem,
        PopupPosition::ActiveScreen,
        PopupPosition::Center,
        PopupPosition::LastPosition,
    ];

    fn label(self) -> &'static str {
        match self {
            PopupPosition::Mouse => "Cursor",
            PopupPosition::StatusItem => "Menu Icon",
            PopupPosition::ActiveScreen => "Active Screen",
            PopupPosition::Center => "Center",
            PopupPosition::LastPosition => "Last Position",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PinsPosition {
    Top,
    Bottom,
}

impl Choice for PinsPosition {
    const ALL: &'static [Self] = &[PinsPosition::Top, PinsPosition::Bottom];

    fn label(self) -> &'static str {
        match self {
            PinsPosition::Top => "Top",
            PinsPosition::Bottom => "Bottom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HighlightMatch {
    Bold,
    Italic,
    Underline,
    Color,
}

impl Choice for HighlightMatch {
    const ALL: &'static [Self] = &[
        HighlightMatch::Bold,
        HighlightMatch::Italic,
        HighlightMatch::Underline,
        HighlightMatch::Color,
    ];

    fn label(self) -> &'static str {
        match self {
            HighlightMatch::Bold => "Bold",
            HighlightMatch::Italic => "Italic",
            HighlightMatch::Underline => "Underline",
            HighlightMatch::Color => "Color",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MenuIcon {
    Maccy,
    Clipboard,
    Scissors,
    Paperclip,
}

impl Choice for MenuIcon {
    const ALL: &'static [Self] = &[
        MenuIcon::Maccy,
        MenuIcon::Clipboard,
        MenuIcon::Scissors,
        MenuIcon::Paperclip,
    ];

    fn label(self) -> &'static str {
        match self {
            MenuIcon::Maccy => "Maccy",
            MenuIcon::Clipboard => "Clipboard",
            MenuIcon::Scissors => "Scissors",
            MenuIcon::Paperclip => "Paperclip",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchVisibility {
    Always,
    DuringSearch,
}

impl Choice for SearchVisibility {
    const ALL: &'static [Self] = &[SearchVisibility::Always, SearchVisibility::DuringSearch];

    fn label(self) -> &'static str {
        match self {
            SearchVisibility::Always => "Always",
            SearchVisibility::DuringSearch => "During Search",
        }
    }
}

/// Popup origin in fractional screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowPosition {
    pub x: f64,
    pub y: f64,
}

impl Default for WindowPosition {
    fn default() -> Self {
        Self { x: 0.5, y: 0.8 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub popup_position: PopupPosition,
    pub popup_screen: usize,
    pub pin_to: PinsPosition,
    pub image_max_height: u32,
    pub preview_image_scale: f64,
    pub preview_delay: u32,
    pub highlight_match: HighlightMatch,
    pub menu_icon: MenuIcon,
    pub show_in_status_bar: bool,
    pub show_recent_copy_in_menu_bar: bool,
    pub show_search: bool,
    pub search_visibility: SearchVisibility,
    pub show_title: bool,
    pub show_application_icons: bool,
    pub show_footer: bool,
    pub show_special_symbols: bool,
    pub window_position: WindowPosition,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            popup_position: PopupPosition::Mouse,
            popup_screen: 0,
            pin_to: PinsPosition::Top,
            image_max_height: 40,
            preview_image_scale: 0.4,
            preview_delay: 1500,
            highlight_match: HighlightMatch::Bold,
            menu_icon: MenuIcon::Maccy,
            show_in_status_bar: true,
            show_recent_copy_in_menu_bar: false,
            show_search: true,
            search_visibility: SearchVisibility::Always,
            show_title: true,
            show_application_icons: false,
            show_footer: true,
            show_special_symbols: true,
            window_position: WindowPosition::default(),
        }
    }
}

impl Settings {
    pub fn value(&self, key: PreferenceKey) -> Value {
        match key {
            PreferenceKey::PopupPosition => json!(self.popup_position),
            PreferenceKey::PopupScreen => json!(self.popup_screen),
            PreferenceKey::PinTo => json!(self.pin_to),
            PreferenceKey::ImageMaxHeight => json!(self.image_max_height),
            PreferenceKey::PreviewImageScale => json!(self.preview_image_scale),
            PreferenceKey::PreviewDelay => json!(self.preview_delay),
            PreferenceKey::HighlightMatch => json!(self.highlight_match),
            PreferenceKey::MenuIcon => json!(self.menu_icon),
            PreferenceKey::ShowInStatusBar => json!(self.show_in_status_bar),
            PreferenceKey::ShowRecentCopyInMenuBar => json!(self.show_recent_copy_in_menu_bar),
            PreferenceKey::ShowSearch => json!(self.show_search),
            PreferenceKey::SearchVisibility => json!(self.search_visibility),
            PreferenceKey::ShowTitle => json!(self.show_title),
            PreferenceKey::ShowApplicationIcons => json!(self.show_application_icons),
            PreferenceKey::ShowFooter => json!(self.show_footer),
            PreferenceKey::ShowSpecialSymbols => json!(self.show_special_symbols),
            PreferenceKey::WindowPosition => json!(self.window_position),
        }
    }

    pub fn numeric(&self, field: NumericField) -> f64 {
        match field {
            NumericField::ImageMaxHeight => f64::from(self.image_max_height),
            NumericField::PreviewImageScale => self.preview_image_scale,
            NumericField::PreviewDelay => f64::from(self.preview_delay),
        }
    }
}

/// Writes `value` into `settings`, clamping numerics into their domain.
///
/// Returns `false` when the value has the wrong shape for `key`; `settings` is
/// left untouched in that case.
pub fn apply_setting_value(settings: &mut Settings, key: PreferenceKey, value: Value) -> bool {
    match key {
        PreferenceKey::PopupPosition => assign(&mut settings.popup_position, value),
        PreferenceKey::PopupScreen => match value.as_u64() {
            Some(v) => {
                settings.popup_screen = usize::try_from(v).unwrap_or(usize::MAX);
                true
            }
            None => false,
        },
        PreferenceKey::PinTo => assign(&mut settings.pin_to, value),
        PreferenceKey::ImageMaxHeight => match value.as_f64() {
            Some(v) => {
                settings.image_max_height =
                    NumericField::ImageMaxHeight.domain().normalize(v) as u32;
                true
            }
            None => false,
        },
        PreferenceKey::PreviewImageScale => match value.as_f64() {
            Some(v) => {
                settings.preview_image_scale =
                    NumericField::PreviewImageScale.domain().normalize(v);
                true
            }
            None => false,
        },
        PreferenceKey::PreviewDelay => match value.as_f64() {
            Some(v) => {
                settings.preview_delay = NumericField::PreviewDelay.domain().normalize(v) as u32;
                true
            }
            None => false,
        },
        PreferenceKey::HighlightMatch => assign(&mut settings.highlight_match, value),
        PreferenceKey::MenuIcon => assign(&mut settings.menu_icon, value),
        PreferenceKey::ShowInStatusBar => assign_bool(&mut settings.show_in_status_bar, &value),
        PreferenceKey::ShowRecentCopyInMenuBar => {
            assign_bool(&mut settings.show_recent_copy_in_menu_bar, &value)
        }
        PreferenceKey::ShowSearch => assign_bool(&mut settings.show_search, &value),
        PreferenceKey::SearchVisibility => assign(&mut settings.search_visibility, value),
        PreferenceKey::ShowTitle => assign_bool(&mut settings.show_title, &value),
        PreferenceKey::ShowApplicationIcons => {
            assign_bool(&mut settings.show_application_icons, &value)
        }
        PreferenceKey::ShowFooter => assign_bool(&mut settings.show_footer, &value),
        PreferenceKey::ShowSpecialSymbols => {
            assign_bool(&mut settings.show_special_symbols, &value)
        }
        PreferenceKey::WindowPosition => match serde_json::from_value::<WindowPosition>(value) {
            Ok(v) if v.x.is_finite() && v.y.is_finite() => {
                settings.window_position = v;
                true
            }
            _ => false,
        },
    }
}

fn assign<T: serde::de::DeserializeOwned>(slot: &mut T, value: Value) -> bool {
    match serde_json::from_value(value) {
        Ok(v) => {
            *slot = v;
            true
        }
        Err(_) => false,
    }
}

fn assign_bool(slot: &mut bool, value: &Value) -> bool {
    match value.as_bool() {
        Some(v) => {
            *slot = v;
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip_through_their_names() {
        for key in PreferenceKey::ALL {
            assert_eq!(PreferenceKey::parse(key.as_str()), Some(key));
        }
        assert_eq!(PreferenceKey::parse("max_items"), None);
    }

    #[test]
    fn key_names_match_serde_names() {
        for key in PreferenceKey::ALL {
            assert_eq!(json!(key), Value::String(key.as_str().to_string()));
        }
    }

    #[test]
    fn apply_clamps_numeric_values() {
        let mut settings = Settings::default();
        assert!(apply_setting_value(&mut settings, PreferenceKey::ImageMaxHeight, json!(900)));
        assert_eq!(settings.image_max_height, 200);
        assert!(apply_setting_value(&mut settings, PreferenceKey::PreviewDelay, json!(3)));
        assert_eq!(settings.preview_delay, 200);
        assert!(apply_setting_value(&mut settings, PreferenceKey::PreviewImageScale, json!(1.5)));
        assert_eq!(settings.preview_image_scale, 1.0);
    }

    #[test]
    fn apply_rejects_wrong_shapes() {
        let mut settings = Settings::default();
        assert!(!apply_setting_value(&mut settings, PreferenceKey::ShowFooter, json!("no")));
        assert!(!apply_setting_value(&mut settings, PreferenceKey::MenuIcon, json!("rocket")));
        assert!(!apply_setting_value(&mut settings, PreferenceKey::PopupScreen, json!(-1)));
        assert!(!apply_setting_value(
            &mut settings,
            PreferenceKey::WindowPosition,
            json!({ "x": 0.1 })
        ));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn value_reads_back_what_apply_wrote() {
        let mut settings = Settings::default();
        assert!(apply_setting_value(
            &mut settings,
            PreferenceKey::PopupPosition,
            json!("lastPosition")
        ));
        assert_eq!(settings.popup_position, PopupPosition::LastPosition);
        assert_eq!(settings.value(PreferenceKey::PopupPosition), json!("lastPosition"));
        assert_eq!(
            settings.value(PreferenceKey::WindowPosition),
            json!({ "x": 0.5, "y": 0.8 })
        );
    }
}
