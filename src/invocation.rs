/// The resolved inputs for a single run. Built once from the command line and
/// standard input, then only ever read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
  pub explain:   bool,
  pub commit:    bool,
  pub no_commit: bool,
  pub emoji:     bool,
  pub language:  String,
  /// Replaces the generated commit instruction when non-empty.
  pub prompt:    Option<String>,
  pub files:     Vec<String>,
  pub piped:     String
}

impl Default for Invocation {
  fn default() -> Self {
    Self {
      explain:   false,
      commit:    false,
      no_commit: false,
      emoji:     false,
      language:  "en".to_string(),
      prompt:    None,
      files:     Vec::new(),
      piped:     String::new()
    }
  }
}

impl Invocation {
  pub fn has_piped_input(&self) -> bool {
    !self.piped.is_empty()
  }

  pub fn prompt_override(&self) -> Option<&str> {
    self.prompt.as_deref().filter(|prompt| !prompt.is_empty())
  }
}
