use serde::Serialize;

use crate::display::{resolve_screen, screen_label, Display, ACTIVE_SCREEN, ACTIVE_SCREEN_LABEL};
use crate::settings::{Choice, PopupPosition};

/// One entry of the popup-position picker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PositionOption {
    Flat {
        position: PopupPosition,
        label: String,
        selected: bool,
    },
    /// A position expanded into one choice per screen.
    Screens {
        position: PopupPosition,
        label: String,
        selected: bool,
        choices: Vec<ScreenChoice>,
    },
}

impl PositionOption {
    pub fn position(&self) -> PopupPosition {
        match self {
            PositionOption::Flat { position, .. } | PositionOption::Screens { position, .. } => {
                *position
            }
        }
    }

    pub fn label(&self) -> &str {
        match self {
            PositionOption::Flat { label, .. } | PositionOption::Screens { label, .. } => label,
        }
    }

    pub fn is_selected(&self) -> bool {
        match self {
            PositionOption::Flat { selected, .. } | PositionOption::Screens { selected, .. } => {
                *selected
            }
        }
    }

    pub fn choices(&self) -> &[ScreenChoice] {
        match self {
            PositionOption::Flat { .. } => &[],
            PositionOption::Screens { choices, .. } => choices,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenChoice {
    pub screen_index: usize,
    pub label: String,
    /// Drawn with the "active screen" icon instead of a display name.
    pub active_screen: bool,
    pub selected: bool,
}

/// The "move back to default" button shown next to the position picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetAffordance {
    pub visible: bool,
    pub enabled: bool,
}

/// Renders the picker for `current`/`current_screen` against `displays`.
///
/// Screen-targeting positions expand into `displays.len() + 1` choices when more
/// than one display is attached; everything else is a single flat entry.
pub fn render_position_options(
    current: PopupPosition,
    current_screen: usize,
    displays: &[Display],
) -> Vec<PositionOption> {
    let expand = displays.len() > 1;

    PopupPosition::ALL
        .iter()
        .map(|&position| {
            let selected = position == current;
            if expand && position.targets_screen() {
                let label = if selected {
                    format!(
                        "{} ({})",
                        position.label(),
                        screen_label(current_screen, displays)
                    )
                } else {
                    position.label().to_string()
                };
                let effective_screen = effective_screen(current_screen, displays);
                PositionOption::Screens {
                    position,
                    label,
                    selected,
                    choices: screen_choices(displays, selected.then_some(effective_screen)),
                }
            } else {
                PositionOption::Flat {
                    position,
                    label: position.label().to_string(),
                    selected,
                }
            }
        })
        .collect()
}

fn screen_choices(displays: &[Display], selected: Option<usize>) -> Vec<ScreenChoice> {
    std::iter::once(ScreenChoice {
        screen_index: ACTIVE_SCREEN,
        label: ACTIVE_SCREEN_LABEL.to_string(),
        active_screen: true,
        selected: selected == Some(ACTIVE_SCREEN),
    })
    .chain(displays.iter().enumerate().map(|(offset, display)| {
        let screen_index = offset + 1;
        ScreenChoice {
            screen_index,
            label: display.name.clone(),
            active_screen: false,
            selected: selected == Some(screen_index),
        }
    }))
    .collect()
}

/// Stored index as it should be drawn: unknown screens read as the active one.
fn effective_screen(screen_index: usize, displays: &[Display]) -> usize {
    match resolve_screen(screen_index, displays) {
        Some(_) => screen_index,
        None => ACTIVE_SCREEN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn displays(count: usize) -> Vec<Display> {
        (0..count)
            .map(|index| Display::new(index, format!("Display {}", index + 1)))
            .collect()
    }

    fn option(options: &[PositionOption], position: PopupPosition) -> &PositionOption {
        options
            .iter()
            .find(|option| option.position() == position)
            .expect("every position is rendered")
    }

    fn selected_count(options: &[PositionOption]) -> usize {
        options
            .iter()
            .map(|option| match option {
                PositionOption::Flat { selected, .. } => usize::from(*selected),
                PositionOption::Screens { choices, .. } => {
                    choices.iter().filter(|choice| choice.selected).count()
                }
            })
            .sum()
    }

    #[test]
    fn zero_or_one_display_renders_flat() {
        for count in [0, 1] {
            let options = render_position_options(PopupPosition::Center, 2, &displays(count));
            assert_eq!(options.len(), PopupPosition::ALL.len());
            assert!(options
                .iter()
                .all(|option| matches!(option, PositionOption::Flat { .. })));
            assert_eq!(option(&options, PopupPosition::Center).label(), "Center");
            assert!(option(&options, PopupPosition::Center).is_selected());
        }
    }

    #[test]
    fn several_displays_expand_screen_targeting_positions() {
        for count in 2..6 {
            let options = render_position_options(PopupPosition::Mouse, 0, &displays(count));
            assert_eq!(options.len(), PopupPosition::ALL.len());
            for option in &options {
                let expected = if option.position().targets_screen() {
                    count + 1
                } else {
                    0
                };
                assert_eq!(option.choices().len(), expected);
            }
        }
    }

    #[test]
    fn expanded_choices_start_with_active_screen() {
        let options = render_position_options(PopupPosition::LastPosition, 0, &displays(2));
        let labels: Vec<_> = option(&options, PopupPosition::LastPosition)
            .choices()
            .iter()
            .map(|choice| choice.label.as_str())
            .collect();
        assert_eq!(labels, ["Active Screen", "Display 1", "Display 2"]);
    }

    #[test]
    fn selected_submenu_label_names_the_screen() {
        let options = render_position_options(PopupPosition::Center, 2, &displays(3));
        let center = option(&options, PopupPosition::Center);
        assert_eq!(center.label(), "Center (Display 2)");
        assert!(center.choices()[2].selected);
        assert_eq!(
            option(&options, PopupPosition::LastPosition).label(),
            "Last Position"
        );
        assert_eq!(selected_count(&options), 1);
    }

    #[test]
    fn unknown_screen_reads_as_active_screen() {
        let options = render_position_options(PopupPosition::Center, 7, &displays(2));
        let center = option(&options, PopupPosition::Center);
        assert_eq!(center.label(), "Center (Active Screen)");
        assert!(center.choices()[0].selected);
        assert!(center.choices()[0].active_screen);
        assert_eq!(selected_count(&options), 1);
    }

    #[test]
    fn flat_selection_is_unique() {
        let options = render_position_options(PopupPosition::StatusItem, 0, &displays(2));
        assert!(option(&options, PopupPosition::StatusItem).is_selected());
        assert_eq!(selected_count(&options), 1);
    }
}
