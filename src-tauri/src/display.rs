use serde::Serialize;

/// Screen index meaning "whichever display currently holds focus".
pub const ACTIVE_SCREEN: usize = 0;

pub const ACTIVE_SCREEN_LABEL: &str = "Active Screen";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Display {
    /// 0-based enumeration order reported by the platform.
    pub index: usize,
    pub name: String,
}

impl Display {
    pub fn new(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
        }
    }
}

/// Source of the current display enumeration.
///
/// Topology changes carry no payload: whoever receives one calls
/// `current_displays` again.
pub trait DisplayTopologyProvider {
    fn current_displays(&self) -> Vec<Display>;
}

impl<F> DisplayTopologyProvider for F
where
    F: Fn() -> Vec<Display>,
{
    fn current_displays(&self) -> Vec<Display> {
        self()
    }
}

/// Resolves a stored screen index against the current enumeration.
///
/// Index 0 and any index past the end both resolve to `None`, the active screen.
pub fn resolve_screen(screen_index: usize, displays: &[Display]) -> Option<&Display> {
    screen_index
        .checked_sub(1)
        .and_then(|position| displays.get(position))
}

pub fn screen_label(screen_index: usize, displays: &[Display]) -> String {
    resolve_screen(screen_index, displays)
        .map(|display| display.name.clone())
        .unwrap_or_else(|| ACTIVE_SCREEN_LABEL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_displays() -> Vec<Display> {
        vec![Display::new(0, "Built-in Retina"), Display::new(1, "LG UltraFine")]
    }

    #[test]
    fn index_zero_is_the_active_screen() {
        assert_eq!(resolve_screen(ACTIVE_SCREEN, &two_displays()), None);
        assert_eq!(screen_label(ACTIVE_SCREEN, &two_displays()), "Active Screen");
    }

    #[test]
    fn positive_index_is_one_based_into_the_list() {
        let displays = two_displays();
        assert_eq!(resolve_screen(2, &displays), Some(&displays[1]));
        assert_eq!(screen_label(1, &displays), "Built-in Retina");
    }

    #[test]
    fn index_past_the_end_falls_back_to_active_screen() {
        assert_eq!(screen_label(3, &two_displays()), "Active Screen");
        assert_eq!(screen_label(1, &[]), "Active Screen");
    }

    #[test]
    fn closures_act_as_providers() {
        let provider = || two_displays();
        assert_eq!(provider.current_displays().len(), 2);
    }
}
