//! In-memory page model.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::domain::FileUpload;
use crate::domain::binding::FormKind;
use crate::domain::ports::ViewSurface;

/// Page-level navigation requested by an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Reload the current view.
    Reload,
    /// Navigate to a route.
    Redirect(String),
    /// Let the page submit the identified form itself.
    NativeSubmit(String),
}

#[derive(Debug, Default)]
struct PageState {
    elements: BTreeSet<String>,
    fields: BTreeMap<String, String>,
    files: BTreeMap<String, FileUpload>,
    rows: BTreeSet<String>,
    disabled: BTreeSet<String>,
    field_errors: BTreeMap<String, String>,
    navigation: Vec<Navigation>,
}

/// Page held entirely in memory.
///
/// Controls start enabled. Rows count as elements until they are removed.
///
/// # Examples
/// ```
/// use frontend::domain::ports::ViewSurface;
/// use frontend::ui::{HeadlessView, Navigation};
///
/// let view = HeadlessView::builder().row("event-7").build();
/// assert!(view.remove_row("event-7"));
/// assert!(!view.has_row("event-7"));
/// view.reload();
/// assert_eq!(view.navigation(), vec![Navigation::Reload]);
/// ```
#[derive(Debug, Default)]
pub struct HeadlessView {
    state: Mutex<PageState>,
}

/// Builder for [`HeadlessView`].
#[derive(Debug, Default)]
pub struct HeadlessViewBuilder {
    state: PageState,
}

impl HeadlessViewBuilder {
    /// Register every element of form `K` with empty values.
    #[must_use]
    pub fn form<K: FormKind>(mut self) -> Self {
        self.state.elements.insert(K::FORM_ID.to_owned());
        self.state.elements.insert(K::SUBMIT_CONTROL.to_owned());
        for field in K::FIELDS {
            self.state.elements.insert((*field).to_owned());
            self.state.fields.entry((*field).to_owned()).or_default();
        }
        for file in K::FILES {
            self.state.elements.insert((*file).to_owned());
        }
        self
    }

    /// Register an element without a value.
    #[must_use]
    pub fn element(mut self, id: impl Into<String>) -> Self {
        self.state.elements.insert(id.into());
        self
    }

    /// Register an input holding `value`.
    #[must_use]
    pub fn field(mut self, id: impl Into<String>, value: impl Into<String>) -> Self {
        let id = id.into();
        self.state.elements.insert(id.clone());
        self.state.fields.insert(id, value.into());
        self
    }

    /// Register a file input with a selected file.
    #[must_use]
    pub fn file(mut self, id: impl Into<String>, upload: FileUpload) -> Self {
        let id = id.into();
        self.state.elements.insert(id.clone());
        self.state.files.insert(id, upload);
        self
    }

    /// Register a rendered row.
    #[must_use]
    pub fn row(mut self, id: impl Into<String>) -> Self {
        self.state.rows.insert(id.into());
        self
    }

    /// Finish the page.
    pub fn build(self) -> HeadlessView {
        HeadlessView {
            state: Mutex::new(self.state),
        }
    }
}

impl HeadlessView {
    /// Start describing a page.
    pub fn builder() -> HeadlessViewBuilder {
        HeadlessViewBuilder::default()
    }

    fn state(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Type into an input, registering it if needed.
    pub fn set_field(&self, id: &str, value: &str) {
        let mut state = self.state();
        state.elements.insert(id.to_owned());
        state.fields.insert(id.to_owned(), value.to_owned());
    }

    /// Whether a row is still rendered.
    pub fn has_row(&self, id: &str) -> bool {
        self.state().rows.contains(id)
    }

    /// Navigation requested so far, oldest first.
    pub fn navigation(&self) -> Vec<Navigation> {
        self.state().navigation.clone()
    }

    /// Inline error currently shown next to `id`.
    pub fn field_error(&self, id: &str) -> Option<String> {
        self.state().field_errors.get(id).cloned()
    }

    /// Whether the control accepts triggers.
    pub fn is_control_enabled(&self, id: &str) -> bool {
        !self.state().disabled.contains(id)
    }
}

impl ViewSurface for HeadlessView {
    fn has_element(&self, id: &str) -> bool {
        let state = self.state();
        state.elements.contains(id) || state.rows.contains(id)
    }

    fn field_value(&self, id: &str) -> Option<String> {
        self.state().fields.get(id).cloned()
    }

    fn file_value(&self, id: &str) -> Option<FileUpload> {
        self.state().files.get(id).cloned()
    }

    fn remove_row(&self, id: &str) -> bool {
        let removed = self.state().rows.remove(id);
        debug!(row = id, removed, "row removal");
        removed
    }

    fn reload(&self) {
        self.state().navigation.push(Navigation::Reload);
    }

    fn redirect(&self, route: &str) {
        self.state()
            .navigation
            .push(Navigation::Redirect(route.to_owned()));
    }

    fn set_control_enabled(&self, id: &str, enabled: bool) -> bool {
        let mut state = self.state();
        let was_enabled = !state.disabled.contains(id);
        if enabled {
            state.disabled.remove(id);
        } else {
            state.disabled.insert(id.to_owned());
        }
        was_enabled
    }

    fn submit_native(&self, form_id: &str) {
        self.state()
            .navigation
            .push(Navigation::NativeSubmit(form_id.to_owned()));
    }

    fn mark_field_error(&self, id: &str, message: &str) {
        self.state()
            .field_errors
            .insert(id.to_owned(), message.to_owned());
    }

    fn clear_field_error(&self, id: &str) {
        self.state().field_errors.remove(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::binding::CompanionForm;
    use rstest::rstest;

    #[rstest]
    #[case("companion-form")]
    #[case("companion-submit")]
    #[case("companion_id_number")]
    fn form_registration_adds_every_element(#[case] id: &str) {
        let view = HeadlessView::builder().form::<CompanionForm>().build();
        assert!(view.has_element(id));
    }

    #[test]
    fn registered_fields_start_empty() {
        let view = HeadlessView::builder().form::<CompanionForm>().build();
        assert_eq!(
            view.field_value("companion_id_number").as_deref(),
            Some("")
        );
    }

    #[test]
    fn control_toggle_reports_previous_state() {
        let view = HeadlessView::default();
        assert!(view.set_control_enabled("save", false));
        assert!(!view.set_control_enabled("save", false));
        assert!(!view.is_control_enabled("save"));
        assert!(!view.set_control_enabled("save", true));
        assert!(view.is_control_enabled("save"));
    }

    #[test]
    fn removing_an_absent_row_reports_false() {
        let view = HeadlessView::default();
        assert!(!view.remove_row("event-1"));
    }

    #[test]
    fn field_errors_can_be_cleared() {
        let view = HeadlessView::default();
        view.mark_field_error("phone", "Número inválido");
        assert_eq!(view.field_error("phone").as_deref(), Some("Número inválido"));
        view.clear_field_error("phone");
        assert!(view.field_error("phone").is_none());
    }

    #[test]
    fn navigation_is_recorded_in_order() {
        let view = HeadlessView::default();
        view.submit_native("create-staff-form");
        view.redirect("/login");
        assert_eq!(
            view.navigation(),
            vec![
                Navigation::NativeSubmit("create-staff-form".to_owned()),
                Navigation::Redirect("/login".to_owned()),
            ]
        );
    }
}
