//! Driving-side adapters for the rendered page and the user.
//!
//! [`HeadlessView`] models a page as plain data so actions can run without a
//! browser. [`TerminalDialogs`] renders notices and prompts on a text stream.

mod headless;
mod terminal;
mod upload;

pub use headless::{HeadlessView, HeadlessViewBuilder, Navigation};
pub use terminal::{FeedbackStyle, TerminalDialogs, parse_answer};
pub use upload::{UploadError, load_upload};
