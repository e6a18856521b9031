pub mod core;
pub mod ui;
pub mod view;
pub mod viewer;

pub use crate::core::path::{NodePath, PathSegment};
pub use crate::core::value::{JsonValue, ParseError, ValueKind};
pub use crate::view::edit::{EditError, EditSession};
pub use crate::view::node::{DisplayMode, RenderNode};
pub use crate::viewer::JsonViewer;
