//! Geonote Core Library
//!
//! Platform-agnostic data structures and logic for the Geonote geometry
//! notebook: the item store, hit-testing, drawing tools, camera and
//! configuration.

pub mod camera;
pub mod config;
pub mod coord;
pub mod geometry;
pub mod input;
pub mod inspect;
pub mod items;
pub mod notebook;
pub mod properties;
pub mod scene;
pub mod selection;
pub mod tools;

pub use camera::Camera;
pub use config::{ConfigError, ConfigResult, NotebookConfig, SerializableColor};
pub use input::{InputState, KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use inspect::{GeometryApi, InspectError, InspectResult};
pub use items::{CurveItem, Item, ItemId, ItemKind, LabelItem, LineItem, PointItem, StrokeItem};
pub use notebook::Notebook;
pub use properties::{MeasurementUnit, SelectionReport};
pub use scene::Scene;
pub use selection::SelectedItem;
pub use tools::{PreviewShape, Tool, ToolKind, ToolManager, ToolResponse};
