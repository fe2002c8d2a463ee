//! Scene interaction engine for a 2-D design canvas.
//!
//! The crate owns everything between raw pointer and keyboard events and a
//! committed document change: hit-testing, drag / resize / rotate gestures,
//! snapping, marquee selection, paint order, and undo/redo. Rendering,
//! persistence, and networking stay with the host, which feeds events into an
//! [`engine::Editor`] and processes the [`engine::Action`]s it returns.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Editor session: event entry points, commands, render state |
//! | [`doc`] | Element, geometry, and the in-memory element store |
//! | [`geometry`] | Points, bounds, rotation, and angle helpers |
//! | [`viewport`] | Pan/zoom and screen/canvas conversion |
//! | [`input`] | Pointer and keyboard types and the gesture state machine |
//! | [`hit`] | Hit-testing against elements and selection handles |
//! | [`gesture`] | Working-copy math for drag, resize, and rotate |
//! | [`resize`] | Eight-handle resize for single and multi selections |
//! | [`snap`] | Alignment, grid, and rotation snapping |
//! | [`marquee`] | Rubber-band selection |
//! | [`selection`] | Committed selection and group expansion |
//! | [`zorder`] | Fractional z-index reordering and normalization |
//! | [`history`] | Commands, merging, and the bounded undo/redo stacks |
//! | [`config`] | Engine tunables from JSON or the environment |
//! | [`error`] | Engine error type |
//! | [`consts`] | Shared numeric defaults |

pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod hit;
pub mod history;
pub mod input;
pub mod marquee;
pub mod resize;
pub mod selection;
pub mod snap;
pub mod viewport;
pub mod zorder;

pub use config::EngineConfig;
pub use doc::{Element, ElementId, ElementKind, ElementStore, Geometry};
pub use engine::{Action, Editor};
pub use error::EngineError;
pub use history::{Command, CommandHistory, CommandKind, ElementChange};
