use crate::invocation::Invocation;

/// Whether the generated message gets committed. Decided once, after the
/// completion succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitPlan {
  pub should_commit: bool
}

impl CommitPlan {
  pub fn decide(invocation: &Invocation, auto_commit_eligible: bool) -> Self {
    let should_commit = (auto_commit_eligible || invocation.commit) && !invocation.explain && !invocation.no_commit;
    Self { should_commit }
  }
}
