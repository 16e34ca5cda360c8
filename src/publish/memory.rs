//! In-memory [`RepositoryPublisher`] that records every call.

use std::path::{Path, PathBuf};

use crate::error::{MoblogError, Result};

use super::RepositoryPublisher;

/// A publishing step, used to inject failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Clean,
    Stage,
    Commit,
    Push,
}

/// Writes go to a real directory; repository operations are only recorded.
#[derive(Debug, Default)]
pub struct MemoryPublisher {
    pub workdir: PathBuf,
    pub cleans: usize,
    pub staged: Vec<String>,
    pub commits: Vec<String>,
    pub pushes: usize,
    /// Fail with `ExternalTool` when this step is reached.
    pub fail_at: Option<Step>,
}

impl MemoryPublisher {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            ..Default::default()
        }
    }

    pub fn failing_at(mut self, step: Step) -> Self {
        self.fail_at = Some(step);
        self
    }

    fn check(&self, step: Step) -> Result<()> {
        if self.fail_at == Some(step) {
            return Err(MoblogError::tool(
                format!("{step:?}").to_lowercase(),
                "injected failure",
            ));
        }
        Ok(())
    }
}

impl RepositoryPublisher for MemoryPublisher {
    fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn clean(&mut self) -> Result<()> {
        self.check(Step::Clean)?;
        self.cleans += 1;
        Ok(())
    }

    fn stage(&mut self, paths: &[String]) -> Result<()> {
        self.check(Step::Stage)?;
        self.staged.extend_from_slice(paths);
        Ok(())
    }

    fn commit(&mut self, message: &str) -> Result<()> {
        self.check(Step::Commit)?;
        self.commits.push(message.to_string());
        Ok(())
    }

    fn push(&mut self) -> Result<()> {
        self.check(Step::Push)?;
        self.pushes += 1;
        Ok(())
    }
}
