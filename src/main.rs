use std::io;

use anyhow::Result;
use structopt::StructOpt;
use log::{debug, LevelFilter};
use colored::*;
use gitiax::config::Settings;
use gitiax::git::Repo;
use gitiax::openai::Client;
use gitiax::{stdin, Error, Invocation, Pipeline};

#[derive(StructOpt, Debug)]
#[structopt(name = "gitiax", about = "Generates commit messages from your diff with an OpenAI-compatible model.")]
struct Cli {
  #[structopt(long, help = "Explain the changes instead of generating a commit")]
  explain: bool,

  #[structopt(long, help = "Force commit even if no files were passed as arguments")]
  commit: bool,

  #[structopt(long, help = "Do not commit even if files were passed as arguments")]
  no_commit: bool,

  #[structopt(long, help = "Add emojis to the commit message")]
  emoji: bool,

  #[structopt(long, default_value = "en", help = "Language for the message")]
  lang: String,

  #[structopt(long, help = "Override default prompt")]
  prompt: Option<String>,

  #[structopt(short, long, help = "Enables verbose logging")]
  verbose: bool,

  #[structopt(help = "Files to stage (or to explain with --explain)")]
  files: Vec<String>
}

impl Cli {
  fn into_invocation(self) -> Invocation {
    Invocation {
      explain: self.explain,
      commit: self.commit,
      no_commit: self.no_commit,
      emoji: self.emoji,
      language: self.lang,
      prompt: self.prompt,
      files: self.files,
      piped: String::new()
    }
  }
}

fn init_logging(verbose: bool) {
  let level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

  env_logger::builder()
    .filter_level(level)
    .format_target(false)
    .format_timestamp(None)
    .init();

  debug!("Verbose logging enabled");
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
  let cli = Cli::from_args();
  init_logging(cli.verbose);

  let settings = Settings::load().map_err(Error::from)?;
  let invocation = cli.into_invocation();

  let repo = Repo::new();
  let client = Client::new(&settings).map_err(Error::from)?;
  let mut pipeline = Pipeline::new(&repo, &client, io::stdout());

  match pipeline.run_with_input(stdin::piped(), invocation).await {
    Ok(outcome) => {
      debug!("Finished: {:?}", outcome);
      Ok(())
    },
    Err(Error::Gateway(err)) if err.is_auth_failure() => {
      eprintln!("{} {}", "Hint:".yellow().bold(), "check the GITIAX_API_KEY for this endpoint".yellow());
      Err(Error::Gateway(err).into())
    },
    Err(err) => Err(err.into())
  }
}
