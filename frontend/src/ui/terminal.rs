//! Notices and confirmation prompts on a text stream.

use std::io::{self, BufRead, Write};
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tracing::warn;

use crate::domain::ports::{ConfirmationGateway, Notifier};
use crate::domain::{ConfirmPrompt, DialogAnswer, Notice, NoticeKind};

/// How notices and prompts are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedbackStyle {
    /// Message only, like a blocking browser alert.
    NativeDialog,
    /// Title, message and button labels.
    #[default]
    StyledModal,
}

impl FromStr for FeedbackStyle {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "native" => Ok(Self::NativeDialog),
            "modal" => Ok(Self::StyledModal),
            other => Err(other.to_owned()),
        }
    }
}

/// Interpret one line typed in answer to a prompt.
///
/// `None` means the stream ended.
///
/// # Examples
/// ```
/// use frontend::domain::DialogAnswer;
/// use frontend::ui::parse_answer;
///
/// assert_eq!(parse_answer(Some("Sí")), DialogAnswer::Affirmed);
/// assert_eq!(parse_answer(Some("")), DialogAnswer::Dismissed);
/// ```
pub fn parse_answer(line: Option<&str>) -> DialogAnswer {
    let Some(line) = line else {
        return DialogAnswer::Dismissed;
    };
    match line.trim().to_lowercase().as_str() {
        "s" | "si" | "sí" | "y" | "yes" => DialogAnswer::Affirmed,
        "n" | "no" => DialogAnswer::Cancelled,
        "" => DialogAnswer::Dismissed,
        _ => DialogAnswer::ClickedOutside,
    }
}

fn kind_label(kind: NoticeKind) -> &'static str {
    match kind {
        NoticeKind::Success => "ÉXITO",
        NoticeKind::Info => "INFO",
        NoticeKind::Warning => "AVISO",
        NoticeKind::Error => "ERROR",
    }
}

/// Notifier and confirmation gateway over a reader/writer pair.
pub struct TerminalDialogs<R, W> {
    style: FeedbackStyle,
    io: Mutex<(R, W)>,
}

impl<R: BufRead + Send, W: Write + Send> TerminalDialogs<R, W> {
    /// Render with `style`, reading answers from `input`.
    pub fn new(style: FeedbackStyle, input: R, output: W) -> Self {
        Self {
            style,
            io: Mutex::new((input, output)),
        }
    }

    /// Take back the underlying streams.
    pub fn into_inner(self) -> (R, W) {
        self.io.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_notice(&self, output: &mut W, notice: &Notice) -> io::Result<()> {
        match self.style {
            FeedbackStyle::NativeDialog => writeln!(output, "{}", notice.message)?,
            FeedbackStyle::StyledModal => {
                writeln!(output, "[{}] {}", kind_label(notice.kind), notice.title)?;
                writeln!(output, "{}", notice.message)?;
            }
        }
        output.flush()
    }

    fn ask(&self, prompt: &ConfirmPrompt) -> io::Result<DialogAnswer> {
        let mut guard = self.io.lock().unwrap_or_else(PoisonError::into_inner);
        let (input, output) = &mut *guard;
        match self.style {
            FeedbackStyle::NativeDialog => write!(output, "{} [s/N] ", prompt.message)?,
            FeedbackStyle::StyledModal => {
                writeln!(output, "{}", prompt.title)?;
                writeln!(output, "{}", prompt.message)?;
                write!(
                    output,
                    "[s] {} / [n] {}: ",
                    prompt.confirm_label, prompt.cancel_label
                )?;
            }
        }
        output.flush()?;
        let mut line = String::new();
        let read = input.read_line(&mut line)?;
        Ok(parse_answer((read > 0).then_some(line.as_str())))
    }
}

impl<R: BufRead + Send, W: Write + Send> Notifier for TerminalDialogs<R, W> {
    fn show(&self, notice: &Notice) {
        let mut guard = self.io.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(error) = self.write_notice(&mut guard.1, notice) {
            warn!(%error, "failed to render notice");
        }
    }
}

#[async_trait]
impl<R: BufRead + Send, W: Write + Send> ConfirmationGateway for TerminalDialogs<R, W> {
    async fn confirm(&self, prompt: &ConfirmPrompt) -> bool {
        match self.ask(prompt) {
            Ok(answer) => answer.is_affirmative(),
            Err(error) => {
                warn!(%error, "failed to read confirmation; treating as dismissed");
                false
            }
        }
    }
}
