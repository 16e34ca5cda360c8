//! [`RepositoryPublisher`] backed by the `git` executable.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{MoblogError, Result};

use super::RepositoryPublisher;

/// Runs `git` subcommands inside a working copy.
#[derive(Debug, Clone)]
pub struct GitPublisher {
    workdir: PathBuf,
    remote: String,
    branch: String,
}

impl GitPublisher {
    pub fn new(workdir: impl Into<PathBuf>, remote: &str, branch: &str) -> Self {
        Self {
            workdir: workdir.into(),
            remote: remote.to_string(),
            branch: branch.to_string(),
        }
    }

    /// Run `git <args>` in the working copy; a spawn failure or non-zero
    /// exit becomes `ExternalTool` carrying git's stderr.
    fn git(&self, args: &[&str]) -> Result<()> {
        let command = format!("git {}", args.join(" "));
        tracing::debug!(workdir = %self.workdir.display(), %command, "Running");

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|e| MoblogError::tool(&command, e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MoblogError::tool(
                command,
                format!("{} {}", output.status, stderr.trim()),
            ));
        }
        Ok(())
    }
}

impl RepositoryPublisher for GitPublisher {
    fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn clean(&mut self) -> Result<()> {
        self.git(&["reset"])?;
        self.git(&["checkout", "."])?;
        self.git(&["reset", "--hard", "HEAD"])?;
        self.git(&["clean", "-fdx"])
    }

    fn stage(&mut self, paths: &[String]) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }
        let mut args = vec!["add", "--"];
        args.extend(paths.iter().map(String::as_str));
        self.git(&args)
    }

    fn commit(&mut self, message: &str) -> Result<()> {
        self.git(&["commit", "--no-gpg-sign", "-a", "-m", message])
    }

    fn push(&mut self) -> Result<()> {
        self.git(&["push", "--force", self.remote.as_str(), self.branch.as_str()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_workdir_is_tool_error() {
        let mut publisher = GitPublisher::new("/nonexistent/moblog/repo", "origin", "master");
        let err = publisher.clean().unwrap_err();
        match err {
            MoblogError::ExternalTool { command, .. } => assert_eq!(command, "git reset"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_stage_nothing_is_noop() {
        let mut publisher = GitPublisher::new("/nonexistent/moblog/repo", "origin", "master");
        assert!(publisher.stage(&[]).is_ok());
    }

    #[test]
    fn test_workdir() {
        let publisher = GitPublisher::new("/srv/blog", "origin", "main");
        assert_eq!(publisher.workdir(), Path::new("/srv/blog"));
    }
}
