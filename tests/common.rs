#![allow(dead_code)]
use std::cell::RefCell;
use std::io::{self, Read};
use std::rc::Rc;
use std::sync::Mutex;

use async_trait::async_trait;
use gitiax::error::{GatewayError, GitError};
use gitiax::git::{DiffScope, Vcs};
use gitiax::openai::Completion;

/// In-memory repository that records every call.
#[derive(Default)]
pub struct FakeRepo {
  pub staged_diff:   String,
  pub unstaged_diff: String,
  pub fail_commit:   bool,
  pub staged:        RefCell<Vec<Vec<String>>>,
  pub diffs:         RefCell<Vec<DiffScope>>,
  pub commits:       RefCell<Vec<String>>,
  /// Shared call log, also fed by [`LoggedInput`].
  pub events:        Rc<RefCell<Vec<&'static str>>>
}

impl FakeRepo {
  pub fn staged(diff: &str) -> Self {
    Self { staged_diff: diff.to_string(), ..Default::default() }
  }

  pub fn unstaged(diff: &str) -> Self {
    Self { unstaged_diff: diff.to_string(), ..Default::default() }
  }
}

impl Vcs for FakeRepo {
  fn stage(&self, files: &[String]) -> Result<(), GitError> {
    self.events.borrow_mut().push("stage");
    self.staged.borrow_mut().push(files.to_vec());
    Ok(())
  }

  fn diff(&self, scope: &DiffScope) -> Result<String, GitError> {
    self.events.borrow_mut().push("diff");
    self.diffs.borrow_mut().push(scope.clone());
    Ok(match scope {
      DiffScope::Staged => self.staged_diff.clone(),
      DiffScope::Unstaged(_) => self.unstaged_diff.clone()
    })
  }

  fn commit(&self, message: &str) -> Result<String, GitError> {
    self.events.borrow_mut().push("commit");
    if self.fail_commit {
      return Err(GitError::Git(git2::Error::from_str("nothing to commit")));
    }
    self.commits.borrow_mut().push(message.to_string());
    Ok("0123456789abcdef0123456789abcdef01234567".to_string())
  }
}

pub enum Reply {
  Text(String),
  Status(u16, String)
}

/// Completion endpoint double that answers every request the same way.
pub struct FakeGateway {
  reply:        Reply,
  pub requests: Mutex<Vec<(String, String)>>
}

impl FakeGateway {
  pub fn replying(text: &str) -> Self {
    Self { reply: Reply::Text(text.to_string()), requests: Mutex::new(Vec::new()) }
  }

  pub fn failing(status: u16, body: &str) -> Self {
    Self { reply: Reply::Status(status, body.to_string()), requests: Mutex::new(Vec::new()) }
  }

  pub fn calls(&self) -> usize {
    self.requests.lock().unwrap().len()
  }
}

#[async_trait]
impl Completion for FakeGateway {
  async fn complete(&self, system: &str, user: &str) -> Result<String, GatewayError> {
    self.requests.lock().unwrap().push((system.to_string(), user.to_string()));
    match &self.reply {
      Reply::Text(text) => Ok(text.clone()),
      Reply::Status(status, body) => Err(GatewayError::BadStatus { status: *status, body: body.clone() })
    }
  }
}

/// Piped input that records every read into a shared log.
pub struct LoggedInput {
  data:   io::Cursor<Vec<u8>>,
  events: Rc<RefCell<Vec<&'static str>>>
}

impl LoggedInput {
  pub fn new(text: &str, events: Rc<RefCell<Vec<&'static str>>>) -> Self {
    Self { data: io::Cursor::new(text.as_bytes().to_vec()), events }
  }
}

impl Read for LoggedInput {
  fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
    let read = self.data.read(buf)?;
    self.events.borrow_mut().push(if read == 0 { "eof" } else { "read" });
    Ok(read)
  }
}
