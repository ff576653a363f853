use crate::invocation::Invocation;

pub const EXPLAIN_SYSTEM: &str = "You are a senior developer explaining code changes.";
pub const EMOJI_RULE: &str = "Use relevant Gitmoji at the start of the commit message.";
pub const NO_EMOJI_RULE: &str = "Do NOT use emojis.";

/// The system and user messages sent to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
  pub system: String,
  pub user:   String
}

impl PromptPair {
  pub fn build(invocation: &Invocation, diff: &str) -> Self {
    if invocation.explain {
      return Self { system: EXPLAIN_SYSTEM.to_string(), user: explain_request(diff) };
    }

    let system = match invocation.prompt_override() {
      Some(prompt) => prompt.to_string(),
      None => instruction(&invocation.language, invocation.emoji)
    };

    Self { system, user: diff.to_string() }
  }
}

fn instruction(language: &str, emoji: bool) -> String {
  let emoji_rule = if emoji { EMOJI_RULE } else { NO_EMOJI_RULE };

  format!(
    "You are an expert developer assistant. Your task is to generate a professional Semantic Commit message.
Rules:
1. Format: <type>(<scope>): <subject> (short and concise)
2. Body: Use bullet points starting with \"-\" if the change is complex.
3. Style: Professional, active voice, present tense.
4. Language: {}.
5. {}
6. Return ONLY the commit message text.",
    language, emoji_rule
  )
}

fn explain_request(diff: &str) -> String {
  format!("Explain the following code changes in a clear, technical way for a senior developer:\n\n{}", diff)
}
