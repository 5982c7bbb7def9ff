//! Driven port asking the user to confirm a destructive action.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::domain::{ConfirmPrompt, DialogAnswer};

/// Port presenting a yes/no prompt.
///
/// Implementations resolve `true` only when the user explicitly affirms;
/// cancel, dismiss and clicks outside the dialog all resolve `false`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfirmationGateway: Send + Sync {
    /// Suspend until the user answers `prompt`.
    async fn confirm(&self, prompt: &ConfirmPrompt) -> bool;
}

/// Gateway replaying scripted answers.
///
/// An exhausted script answers [`DialogAnswer::Dismissed`].
#[derive(Debug, Default)]
pub struct FixtureConfirmationGateway {
    answers: Mutex<VecDeque<DialogAnswer>>,
    asked: Mutex<Vec<ConfirmPrompt>>,
}

impl FixtureConfirmationGateway {
    /// Gateway answering with `answers` in order.
    pub fn answering(answers: impl IntoIterator<Item = DialogAnswer>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Prompts presented so far.
    pub fn asked(&self) -> Vec<ConfirmPrompt> {
        self.asked
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ConfirmationGateway for FixtureConfirmationGateway {
    async fn confirm(&self, prompt: &ConfirmPrompt) -> bool {
        self.asked
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.clone());
        self.answers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(DialogAnswer::Dismissed)
            .is_affirmative()
    }
}
