use log::debug;

use crate::git::{DiffScope, Result, Vcs};
use crate::invocation::Invocation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
  Piped,
  Staged,
  UnstagedForFiles
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffSource {
  pub text:   String,
  pub origin: Origin
}

/// What the resolver produced for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
  Diff {
    source:               DiffSource,
    /// Files were staged on the user's behalf and `--no-commit` was not given.
    auto_commit_eligible: bool
  },
  /// Nothing to describe. Not an error: the run ends quietly.
  NoChanges
}

/// Picks the diff for this run.
///
/// Piped input always wins and never stages anything. Explain mode with files
/// reads their unstaged changes. Everything else reads the index, staging the
/// given files first when there are any.
pub fn resolve(invocation: &Invocation, vcs: &impl Vcs) -> Result<Resolved> {
  let mut auto_commit_eligible = false;

  let source = if invocation.has_piped_input() {
    DiffSource { text: invocation.piped.clone(), origin: Origin::Piped }
  } else if invocation.explain && !invocation.files.is_empty() {
    let text = vcs.diff(&DiffScope::Unstaged(invocation.files.clone()))?;
    DiffSource { text, origin: Origin::UnstagedForFiles }
  } else {
    if !invocation.files.is_empty() && !invocation.explain {
      vcs.stage(&invocation.files)?;
      auto_commit_eligible = !invocation.no_commit;
    }

    let text = vcs.diff(&DiffScope::Staged)?;
    DiffSource { text, origin: Origin::Staged }
  };

  debug!("[resolve] {:?} diff, {} bytes", source.origin, source.text.len());

  if source.text.is_empty() {
    return Ok(Resolved::NoChanges);
  }

  Ok(Resolved::Diff { source, auto_commit_eligible })
}

#[cfg(test)]
mod tests {
  use std::cell::RefCell;

  use super::*;
  use crate::error::GitError;

  #[derive(Default)]
  struct Recorder {
    staged:   RefCell<Vec<Vec<String>>>,
    scopes:   RefCell<Vec<DiffScope>>,
    diff:     String,
    fail_add: bool
  }

  impl Recorder {
    fn with_diff(diff: &str) -> Self {
      Self { diff: diff.to_string(), ..Default::default() }
    }
  }

  impl Vcs for Recorder {
    fn stage(&self, files: &[String]) -> Result<()> {
      if self.fail_add {
        return Err(GitError::PathspecNotFound(files[0].clone()));
      }
      self.staged.borrow_mut().push(files.to_vec());
      Ok(())
    }

    fn diff(&self, scope: &DiffScope) -> Result<String> {
      self.scopes.borrow_mut().push(scope.clone());
      Ok(self.diff.clone())
    }

    fn commit(&self, _message: &str) -> Result<String> {
      unreachable!("the resolver never commits")
    }
  }

  fn files(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
  }

  #[test]
  fn test_piped_input_bypasses_staging() {
    let vcs = Recorder::with_diff("+staged");
    for explain in [false, true] {
      let invocation = Invocation {
        piped: "diff --git a b\n+x".into(),
        files: files(&["a.go"]),
        explain,
        ..Default::default()
      };

      let resolved = resolve(&invocation, &vcs).unwrap();
      assert_eq!(resolved, Resolved::Diff {
        source:               DiffSource { text: "diff --git a b\n+x".into(), origin: Origin::Piped },
        auto_commit_eligible: false
      });
    }

    assert!(vcs.staged.borrow().is_empty());
    assert!(vcs.scopes.borrow().is_empty());
  }

  #[test]
  fn test_explain_with_files_reads_unstaged() {
    let vcs = Recorder::with_diff("+unstaged");
    let invocation = Invocation { explain: true, files: files(&["b.go"]), ..Default::default() };

    let resolved = resolve(&invocation, &vcs).unwrap();

    assert!(matches!(resolved, Resolved::Diff { source: DiffSource { origin: Origin::UnstagedForFiles, .. }, auto_commit_eligible: false }));
    assert!(vcs.staged.borrow().is_empty());
    assert_eq!(*vcs.scopes.borrow(), vec![DiffScope::Unstaged(files(&["b.go"]))]);
  }

  #[test]
  fn test_explain_without_files_reads_staged() {
    let vcs = Recorder::with_diff("+staged");
    let invocation = Invocation { explain: true, ..Default::default() };

    let resolved = resolve(&invocation, &vcs).unwrap();

    assert!(matches!(resolved, Resolved::Diff { source: DiffSource { origin: Origin::Staged, .. }, .. }));
    assert!(vcs.staged.borrow().is_empty());
  }

  #[test]
  fn test_files_are_staged_and_auto_commit() {
    let vcs = Recorder::with_diff("+a");
    let invocation = Invocation { files: files(&["a.go", "b.go"]), ..Default::default() };

    let resolved = resolve(&invocation, &vcs).unwrap();

    assert_eq!(*vcs.staged.borrow(), vec![files(&["a.go", "b.go"])]);
    assert_eq!(*vcs.scopes.borrow(), vec![DiffScope::Staged]);
    assert!(matches!(resolved, Resolved::Diff { auto_commit_eligible: true, .. }));
  }

  #[test]
  fn test_no_commit_still_stages() {
    let vcs = Recorder::with_diff("+a");
    let invocation = Invocation { files: files(&["a.go"]), no_commit: true, ..Default::default() };

    let resolved = resolve(&invocation, &vcs).unwrap();

    assert_eq!(vcs.staged.borrow().len(), 1);
    assert!(matches!(resolved, Resolved::Diff { auto_commit_eligible: false, .. }));
  }

  #[test]
  fn test_without_files_reads_index_only() {
    let vcs = Recorder::with_diff("+a");
    let resolved = resolve(&Invocation::default(), &vcs).unwrap();

    assert!(vcs.staged.borrow().is_empty());
    assert!(matches!(resolved, Resolved::Diff { source: DiffSource { origin: Origin::Staged, .. }, auto_commit_eligible: false }));
  }

  #[test]
  fn test_empty_diff_is_no_changes() {
    let vcs = Recorder::with_diff("");
    let invocation = Invocation { explain: true, files: files(&["b.go"]), ..Default::default() };
    assert_eq!(resolve(&invocation, &vcs).unwrap(), Resolved::NoChanges);
  }

  #[test]
  fn test_whitespace_pipe_is_still_piped() {
    let vcs = Recorder::with_diff("+staged");
    let invocation = Invocation { piped: " \n".into(), files: files(&["a.go"]), ..Default::default() };

    let resolved = resolve(&invocation, &vcs).unwrap();

    assert_eq!(resolved, Resolved::Diff {
      source:               DiffSource { text: " \n".into(), origin: Origin::Piped },
      auto_commit_eligible: false
    });
    assert!(vcs.staged.borrow().is_empty());
    assert!(vcs.scopes.borrow().is_empty());
  }

  #[test]
  fn test_staging_failure_is_fatal() {
    let vcs = Recorder { fail_add: true, ..Recorder::with_diff("+a") };
    let invocation = Invocation { files: files(&["missing.go"]), ..Default::default() };

    assert!(matches!(resolve(&invocation, &vcs), Err(GitError::PathspecNotFound(_))));
    assert!(vcs.scopes.borrow().is_empty());
  }
}
