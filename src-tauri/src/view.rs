use serde::Serialize;

use crate::bounds::{NumberFormat, NumericField, StepDirection};
use crate::display::Display;
use crate::position::{PositionOption, ResetAffordance};
use crate::settings::{Choice, HighlightMatch, MenuIcon, PinsPosition, SearchVisibility};

pub const FOOTER_WARNING: &str =
    "With the footer hidden, open preferences from the menu bar icon or with \u{2318},";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoiceView<T> {
    pub value: T,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickerView<T> {
    pub selected: T,
    pub enabled: bool,
    pub choices: Vec<ChoiceView<T>>,
}

impl<T: Choice> PickerView<T> {
    pub fn new(selected: T, enabled: bool) -> Self {
        Self {
            selected,
            enabled,
            choices: T::ALL
                .iter()
                .map(|&value| ChoiceView {
                    value,
                    label: value.label(),
                })
                .collect(),
        }
    }
}

/// A toggle together with the picker it enables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GatedPickerView<T> {
    pub on: bool,
    pub picker: PickerView<T>,
}

impl<T: Choice> GatedPickerView<T> {
    pub fn new(on: bool, selected: T) -> Self {
        Self {
            on,
            picker: PickerView::new(selected, on),
        }
    }
}

/// Text entry and stepper rendered from the same value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericFieldView {
    pub field: NumericField,
    pub value: f64,
    pub text: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub format: NumberFormat,
    pub can_increment: bool,
    pub can_decrement: bool,
}

impl NumericFieldView {
    pub fn new(field: NumericField, value: f64) -> Self {
        let domain = field.domain();
        Self {
            field,
            value,
            text: domain.format(value),
            min: domain.min,
            max: domain.max,
            step: domain.step,
            format: domain.format,
            can_increment: domain.can_step(value, StepDirection::Up),
            can_decrement: domain.can_step(value, StepDirection::Down),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupPositionView {
    pub options: Vec<PositionOption>,
    pub reset: ResetAffordance,
}

/// Everything the settings window draws, in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaneView {
    pub popup_position: PopupPositionView,
    pub pin_to: PickerView<PinsPosition>,
    pub image_max_height: NumericFieldView,
    pub preview_image_scale: NumericFieldView,
    pub preview_delay: NumericFieldView,
    pub highlight_match: PickerView<HighlightMatch>,
    pub show_special_symbols: bool,
    pub status_bar: GatedPickerView<MenuIcon>,
    pub show_recent_copy_in_menu_bar: bool,
    pub search: GatedPickerView<SearchVisibility>,
    pub show_title: bool,
    pub show_application_icons: bool,
    pub show_footer: bool,
    pub footer_warning: Option<&'static str>,
    pub displays: Vec<Display>,
}
