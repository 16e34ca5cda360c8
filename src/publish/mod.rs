//! Publishing the written files to the blog repository.
//!
//! The pipeline only needs four steps from a repository: reset to a clean
//! state, stage files, commit, and push. [`GitPublisher`] runs them with the
//! `git` command line; [`MemoryPublisher`] records them for tests.

pub mod git;
pub mod memory;

use std::path::Path;

use crate::error::Result;

pub use git::GitPublisher;
pub use memory::MemoryPublisher;

/// A working copy that posts are written into and published from.
pub trait RepositoryPublisher {
    /// Directory all repository-relative paths are resolved against.
    fn workdir(&self) -> &Path;

    /// Discard local modifications and untracked files.
    fn clean(&mut self) -> Result<()>;

    /// Stage repository-relative `paths` for the next commit.
    fn stage(&mut self, paths: &[String]) -> Result<()>;

    /// Commit everything staged with `message`.
    fn commit(&mut self, message: &str) -> Result<()>;

    /// Force-push the current history to the configured remote branch.
    fn push(&mut self) -> Result<()>;
}
