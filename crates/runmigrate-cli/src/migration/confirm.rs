//! Confirmation Controller
//!
//! Gates every write behind an operator answer of `yes`, `no` or `all`.
//! `all` switches the controller to [`ConfirmationState::ApproveAll`] for the
//! rest of the run; there is no way back to per-item prompting.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout,
};
use tracing::{debug, info};

#[cfg(test)]
use mockall::automock;

use super::render::render_change;
use super::Change;
use crate::Result;

const PROMPT: &str = "Are you sure you want to continue? (yes, no, all) [all]: ";

/// Operator answer to a confirmation prompt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    All,
}

impl FromStr for Answer {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" => Ok(Answer::Yes),
            "no" | "n" => Ok(Answer::No),
            "all" | "a" => Ok(Answer::All),
            other => Err(format!("'{}' is not one of 'yes', 'no', 'all'.", other)),
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Yes => f.write_str("yes"),
            Answer::No => f.write_str("no"),
            Answer::All => f.write_str("all"),
        }
    }
}

/// Source of operator answers
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Prompter: Send {
    /// Show `rendered` and block until the operator answers
    async fn ask(&mut self, rendered: &str) -> Result<Answer>;
}

/// Line-based prompter reading answers from `R` and writing to `W`.
///
/// Empty input picks the default (`all`). Unrecognized input re-prompts.
/// End of input counts as `no`.
pub struct LinePrompter<R, W> {
    reader: R,
    writer: W,
}

/// Prompter attached to the process terminal
pub type StdinPrompter = LinePrompter<BufReader<Stdin>, Stdout>;

impl StdinPrompter {
    pub fn stdin() -> Self {
        LinePrompter::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> LinePrompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

#[async_trait]
impl<R, W> Prompter for LinePrompter<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn ask(&mut self, rendered: &str) -> Result<Answer> {
        self.writer.write_all(rendered.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;

        loop {
            self.writer.write_all(PROMPT.as_bytes()).await?;
            self.writer.flush().await?;

            let mut input = String::new();
            if self.reader.read_line(&mut input).await? == 0 {
                self.writer.write_all(b"\n").await?;
                return Ok(Answer::No);
            }
            if input.trim().is_empty() {
                return Ok(Answer::All);
            }
            match input.parse::<Answer>() {
                Ok(answer) => return Ok(answer),
                Err(msg) => {
                    self.writer
                        .write_all(format!("Error: {}\n", msg).as_bytes())
                        .await?;
                }
            }
        }
    }
}

/// Whether each write needs its own answer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConfirmationState {
    #[default]
    PerItem,
    ApproveAll,
}

/// Outcome of gating one change
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Apply,
    Abort,
}

/// Two-state gate owned by the batch loop for the duration of one run
pub struct ConfirmationController<P> {
    state: ConfirmationState,
    prompter: P,
}

impl<P: Prompter> ConfirmationController<P> {
    /// Controller that asks before every write
    pub fn new(prompter: P) -> Self {
        Self {
            state: ConfirmationState::PerItem,
            prompter,
        }
    }

    /// Controller that starts out approving everything
    pub fn approving_all(prompter: P) -> Self {
        Self {
            state: ConfirmationState::ApproveAll,
            prompter,
        }
    }

    pub fn state(&self) -> ConfirmationState {
        self.state
    }

    /// Decide whether `change` to object `name` may be applied.
    ///
    /// The change is only rendered when the operator is actually asked.
    pub async fn confirm(&mut self, name: &str, change: &Change) -> Result<Verdict> {
        if self.state == ConfirmationState::ApproveAll {
            return Ok(Verdict::Apply);
        }

        let rendered = render_change(name, change)?;
        let answer = self.prompter.ask(&rendered).await?;
        debug!(object = %name, answer = %answer, "operator answered");
        match answer {
            Answer::Yes => Ok(Verdict::Apply),
            Answer::No => Ok(Verdict::Abort),
            Answer::All => {
                info!("approving all remaining changes");
                self.state = ConfirmationState::ApproveAll;
                Ok(Verdict::Apply)
            }
        }
    }
}
