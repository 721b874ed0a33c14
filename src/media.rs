//! Media references: classifying raw user input and naming what gets played.
//!
//! A raw input is whatever the user hands us (startup argument, clipboard
//! text, dialog selection, MPRIS `OpenUri`). `classify` decides whether it is a
//! streaming page that needs the external resolver, a direct web video, or a
//! local file. `title` derives the window title for local files.

mod input;
mod reference;
mod title;

pub use input::{InputKind, classify, local_path};
pub use reference::{MediaReference, Resolution};
pub use title::{display_title, title_or_raw};
