//! Geonote Application
//!
//! The native application shell: windowing, input routing, the frame
//! loop and keyboard shortcuts.

mod app;
mod shortcuts;

pub use app::{
    App, AppConfig, AppError, AppResult, CONFIG_ENV, default_config_path, load_notebook_config,
};
pub use shortcuts::{Shortcut, ShortcutAction, ShortcutRegistry};
