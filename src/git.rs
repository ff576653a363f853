use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use git2::{RepositoryOpenFlags as Flag, *};
use log::debug;

use crate::error::GitError;

pub type Result<T, E = GitError> = std::result::Result<T, E>;

/// Which changes to diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffScope {
  /// Index against HEAD (`git diff --cached`).
  Staged,
  /// Working tree against the index, limited to the given paths (`git diff <files>`).
  Unstaged(Vec<String>)
}

/// The version-control side of the pipeline.
pub trait Vcs {
  fn stage(&self, files: &[String]) -> Result<()>;
  fn diff(&self, scope: &DiffScope) -> Result<String>;
  /// Commits the index with `message` verbatim and returns the new commit id.
  fn commit(&self, message: &str) -> Result<String>;
}

pub trait Utf8String {
  fn to_utf8(&self) -> String;
}

impl Utf8String for Vec<u8> {
  fn to_utf8(&self) -> String {
    String::from_utf8_lossy(self).into_owned()
  }
}

impl Utf8String for [u8] {
  fn to_utf8(&self) -> String {
    String::from_utf8_lossy(self).into_owned()
  }
}

/// A git repository located lazily at `path`. Nothing touches the
/// repository until one of the [`Vcs`] operations runs, so piped diffs work
/// outside of a checkout.
pub struct Repo {
  path: PathBuf
}

impl Repo {
  pub fn new() -> Self {
    Self::new_with_path(".")
  }

  pub fn new_with_path(path: impl Into<PathBuf>) -> Self {
    Repo { path: path.into() }
  }

  fn open(&self) -> Result<Repository> {
    Ok(Repository::open_ext(&self.path, Flag::empty(), Vec::<&Path>::new())?)
  }

  fn workdir(repo: &Repository) -> Result<PathBuf> {
    repo.workdir().map(Path::to_path_buf).ok_or(GitError::BareRepository)
  }

  /// Rewrites a path the way `git add` reads its arguments into a pathspec
  /// relative to the repository root. Relative paths start from the current
  /// directory when it lies inside the repository and from the root
  /// otherwise; absolute paths and `..` are accepted as long as they stay
  /// inside the working tree.
  fn pathspec(workdir: &Path, file: &str) -> Result<String> {
    let root = workdir.canonicalize()?;
    let base = std::env::current_dir()
      .ok()
      .and_then(|cwd| cwd.canonicalize().ok())
      .filter(|cwd| cwd.starts_with(&root))
      .unwrap_or_else(|| root.clone());

    let path = canonical_prefix(&normalize(&base.join(file)));
    let relative = path
      .strip_prefix(&root)
      .map_err(|_| GitError::OutsideRepository(file.to_string()))?;

    let spec = relative.to_string_lossy().into_owned();
    Ok(if spec.is_empty() { "*".to_string() } else { spec })
  }

  /// True when `spec` names something in the working tree or the index.
  fn matches_anything(repo: &Repository, spec: &str) -> Result<bool> {
    let pathspec = Pathspec::new([spec])?;
    let in_workdir = pathspec
      .match_workdir(repo, PathspecFlags::DEFAULT)?
      .entries()
      .next()
      .is_some();

    Ok(in_workdir || pathspec.match_index(&repo.index()?, PathspecFlags::DEFAULT)?.entries().next().is_some())
  }

  fn diff_options() -> DiffOptions {
    let mut opts = DiffOptions::new();
    opts
      .include_untracked(false)
      .include_ignored(false)
      .ignore_submodules(true)
      .context_lines(3)
      .indent_heuristic(true);
    opts
  }

  fn to_patch(diff: &Diff<'_>) -> Result<String> {
    let mut patch = Vec::new();

    diff.print(DiffFormat::Patch, |_, _, line| {
      if let origin @ ('+' | '-' | ' ') = line.origin() {
        patch.push(origin as u8);
      }
      patch.extend_from_slice(line.content());
      true
    })?;

    Ok(patch.to_utf8())
  }
}

/// Resolves `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
  let mut out = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {},
      Component::ParentDir => {
        out.pop();
      },
      other => out.push(other.as_os_str())
    }
  }
  out
}

/// Canonicalizes the longest existing ancestor of `path` and re-appends the
/// rest, so deleted files and globs line up with the canonical root.
fn canonical_prefix(path: &Path) -> PathBuf {
  let mut existing = path;
  let mut rest: Vec<&OsStr> = Vec::new();

  while !existing.exists() {
    match (existing.parent(), existing.file_name()) {
      (Some(parent), Some(name)) => {
        rest.push(name);
        existing = parent;
      },
      _ => return path.to_path_buf()
    }
  }

  let mut out = existing.canonicalize().unwrap_or_else(|_| existing.to_path_buf());
  out.extend(rest.iter().rev());
  out
}

impl Default for Repo {
  fn default() -> Self {
    Self::new()
  }
}

impl Vcs for Repo {
  fn stage(&self, files: &[String]) -> Result<()> {
    let repo = self.open()?;
    let workdir = Self::workdir(&repo)?;
    let specs = files
      .iter()
      .map(|file| Self::pathspec(&workdir, file))
      .collect::<Result<Vec<_>>>()?;

    for (file, spec) in files.iter().zip(&specs) {
      // The repository root itself is fine to add even when empty
      if spec != "*" && !Self::matches_anything(&repo, spec)? {
        return Err(GitError::PathspecNotFound(file.clone()));
      }
    }

    let mut index = repo.index()?;

    debug!("[stage] Adding {:?}", specs);

    // Deleted tracked files leave the index first, then new files come in
    index.update_all(specs.iter(), None)?;
    index.add_all(specs.iter(), IndexAddOption::DEFAULT, None)?;
    index.write()?;
    Ok(())
  }

  fn diff(&self, scope: &DiffScope) -> Result<String> {
    let repo = self.open()?;
    let mut opts = Repo::diff_options();

    let diff = match scope {
      DiffScope::Staged => {
        let tree = repo.head().ok().and_then(|head| head.peel_to_tree().ok());
        debug!("[diff] Staged changes against {:?}", tree.as_ref().map(Tree::id));
        repo.diff_tree_to_index(tree.as_ref(), None, Some(&mut opts))?
      },
      DiffScope::Unstaged(files) => {
        let workdir = Self::workdir(&repo)?;
        for file in files {
          opts.pathspec(Self::pathspec(&workdir, file)?);
        }
        debug!("[diff] Unstaged changes for {:?}", files);
        repo.diff_index_to_workdir(None, Some(&mut opts))?
      }
    };

    debug!("[diff] Stats: {:?}", diff.stats().map(|stats| stats.files_changed()));
    Self::to_patch(&diff)
  }

  fn commit(&self, message: &str) -> Result<String> {
    debug!("[commit] Committing with message");

    let repo = self.open()?;
    let mut index = repo.index()?;
    let oid = index.write_tree()?;
    let tree = repo.find_tree(oid)?;
    let signature = repo.signature()?;
    let parent = repo.head().ok().and_then(|head| head.peel_to_commit().ok());
    let parents = parent.iter().collect::<Vec<&Commit>>();

    let oid = repo.commit(Some("HEAD"), &signature, &signature, message, &tree, parents.as_slice())?;
    debug!("[commit] Created {}", oid);
    Ok(oid.to_string())
  }
}
