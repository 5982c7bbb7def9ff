//! Driven port over the rendered page.
//!
//! The domain reads field values by element identifier and asks for the
//! smallest change that reflects an operation: remove a row, reload, or
//! navigate. It never owns the layout.

use crate::domain::FileUpload;

/// Port over the document the actions operate on.
#[cfg_attr(test, mockall::automock)]
pub trait ViewSurface: Send + Sync {
    /// Whether an element with `id` exists.
    fn has_element(&self, id: &str) -> bool;

    /// Current value of a text input, select or checkbox.
    fn field_value(&self, id: &str) -> Option<String>;

    /// File selected in a file input.
    fn file_value(&self, id: &str) -> Option<FileUpload>;

    /// Remove a rendered row, returning whether it was present.
    fn remove_row(&self, id: &str) -> bool;

    /// Reload the whole view.
    fn reload(&self);

    /// Navigate to `route`.
    fn redirect(&self, route: &str);

    /// Enable or disable a control, returning whether it was enabled before.
    fn set_control_enabled(&self, id: &str, enabled: bool) -> bool;

    /// Hand the form over to the browser's own submission.
    fn submit_native(&self, form_id: &str);

    /// Show an inline error next to a field.
    fn mark_field_error(&self, id: &str, message: &str);

    /// Remove the inline error of a field.
    fn clear_field_error(&self, id: &str);
}
