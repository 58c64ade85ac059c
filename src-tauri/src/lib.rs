pub mod bounds;
pub mod display;
pub mod error;
pub mod events;
pub mod pane;
pub mod position;
pub mod settings;
pub mod storage;
pub mod view;

#[cfg(feature = "desktop")]
mod app;
#[cfg(feature = "desktop")]
mod commands;

#[cfg(feature = "desktop")]
pub use app::run;

pub use bounds::{NumericDomain, NumericField, StepDirection};
pub use display::{Display, DisplayTopologyProvider};
pub use error::{FieldError, PaneError};
pub use pane::{PreferencePane, Toggle};
pub use position::{render_position_options, PositionOption, ResetAffordance, ScreenChoice};
pub use settings::{PopupPosition, PreferenceKey, Settings};
pub use storage::{MemoryStore, PreferenceStore, SqliteStore};
pub use view::PaneView;
