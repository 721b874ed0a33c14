//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the current media, the
//! pending resolution and the window flags.

mod model;

pub use model::*;
