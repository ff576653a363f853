use std::io::{Read, Write};

use colored::*;
use console::Emoji;
use log::debug;

use crate::commit::CommitPlan;
use crate::error::{Error, Result};
use crate::git::Vcs;
use crate::invocation::Invocation;
use crate::openai::Completion;
use crate::prompt::PromptPair;
use crate::resolve::{resolve, Resolved};
use crate::stdin;

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
  NoChanges,
  /// The completion was shown but not committed.
  Displayed(String),
  /// The completion was shown and committed as `id`. `message` is the text
  /// handed to the repository, without surrounding whitespace.
  Committed { message: String, id: String }
}

/// Resolver, prompt builder, gateway and commit decision, run strictly in
/// that order. Progress and the suggestion go to `out`.
pub struct Pipeline<'a, V, C, W> {
  vcs:     &'a V,
  gateway: &'a C,
  out:     W
}

impl<'a, V: Vcs, C: Completion, W: Write> Pipeline<'a, V, C, W> {
  pub fn new(vcs: &'a V, gateway: &'a C, out: W) -> Self {
    Self { vcs, gateway, out }
  }

  pub fn into_output(self) -> W {
    self.out
  }

  /// Drains `input` (standard input when it is piped) before anything touches
  /// the repository, then runs with it as the piped diff.
  pub async fn run_with_input(&mut self, input: Option<impl Read>, invocation: Invocation) -> Result<Outcome> {
    let piped = match input {
      Some(reader) => stdin::read_all(reader).map_err(Error::Input)?,
      None => String::new()
    };

    self.run(&Invocation { piped, ..invocation }).await
  }

  pub async fn run(&mut self, invocation: &Invocation) -> Result<Outcome> {
    if !invocation.has_piped_input() && !invocation.explain && !invocation.files.is_empty() {
      writeln!(self.out, "Adding files to staging: {:?}", invocation.files)?;
    }

    let (source, auto_commit_eligible) = match resolve(invocation, self.vcs)? {
      Resolved::Diff { source, auto_commit_eligible } => (source, auto_commit_eligible),
      Resolved::NoChanges => {
        writeln!(self.out, "No changes detected. Stage some files or pass them as arguments.")?;
        return Ok(Outcome::NoChanges);
      }
    };

    let prompt = PromptPair::build(invocation, &source.text);

    writeln!(self.out, "{} {}", Emoji("🤖", ">"), "Gitiax is thinking...".dimmed())?;
    self.out.flush()?;
    let response = self.gateway.complete(&prompt.system, &prompt.user).await?;

    writeln!(self.out, "\n{}", "--- Gitiax Suggestion ---".bold())?;
    writeln!(self.out, "{}", response)?;

    let plan = CommitPlan::decide(invocation, auto_commit_eligible);
    debug!("[pipeline] {:?} (auto commit eligible: {})", plan, auto_commit_eligible);

    if !plan.should_commit {
      return Ok(Outcome::Displayed(response));
    }

    let message = response.trim().to_string();
    let id = self.vcs.commit(&message)?;
    let short = id.chars().take(7).collect::<String>();
    writeln!(self.out, "\n{} [{}] {}", Emoji("✨", ":-)"), short.yellow(), "Changes committed successfully!".green())?;

    Ok(Outcome::Committed { message, id })
  }
}
