//! Confirmation prompts guarding destructive actions.

/// Yes/no question shown before a destructive call.
///
/// The native-dialog style only renders [`ConfirmPrompt::message`]; the
/// styled-modal style renders every field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    /// Modal heading.
    pub title: String,
    /// Question put to the user.
    pub message: String,
    /// Label of the affirmative button.
    pub confirm_label: String,
    /// Label of the negative button.
    pub cancel_label: String,
}

impl ConfirmPrompt {
    /// Prompt with the default delete/cancel labels.
    ///
    /// # Examples
    /// ```
    /// use frontend::domain::ConfirmPrompt;
    ///
    /// let prompt = ConfirmPrompt::destructive("¿Estás seguro?", "Se eliminará el evento.");
    /// assert_eq!(prompt.confirm_label, "Sí, eliminar");
    /// ```
    pub fn destructive(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            confirm_label: "Sí, eliminar".to_owned(),
            cancel_label: "Cancelar".to_owned(),
        }
    }

    /// Replace the affirmative label.
    #[must_use]
    pub fn with_confirm_label(mut self, label: impl Into<String>) -> Self {
        self.confirm_label = label.into();
        self
    }
}

/// How the user closed a confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAnswer {
    /// Pressed the affirmative button.
    Affirmed,
    /// Pressed the cancel button.
    Cancelled,
    /// Closed the dialog (escape key, close icon, end of input).
    Dismissed,
    /// Clicked the backdrop outside the dialog.
    ClickedOutside,
}

impl DialogAnswer {
    /// Only an explicit affirmative answer lets the action proceed.
    pub fn is_affirmative(self) -> bool {
        matches!(self, Self::Affirmed)
    }
}
