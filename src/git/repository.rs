use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::config::Config;
use crate::error::CodestampError;

/// Thin wrapper over the git CLI for the one lookup the stamping pipeline
/// needs: file content at the last committed revision. Every failure here is
/// an absence signal to the caller, never fatal.
pub struct Repository {
    workdir: PathBuf,
}

impl Repository {
    /// Discover the repository containing `path` (a file or directory).
    pub fn discover(path: &Path) -> Result<Repository, CodestampError> {
        let dir = if path.is_dir() {
            path
        } else {
            match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            }
        };

        let args = vec![
            "-C".to_string(),
            dir.to_string_lossy().to_string(),
            "rev-parse".to_string(),
            "--show-toplevel".to_string(),
        ];
        let output = exec_git(&args)?;
        let toplevel = String::from_utf8(output.stdout)?.trim().to_string();
        if toplevel.is_empty() {
            return Err(CodestampError::Generic(format!(
                "no git repository found for {:?}",
                path
            )));
        }
        Ok(Repository {
            workdir: PathBuf::from(toplevel),
        })
    }

    /// Path of `file` relative to the repository root, in posix form as git
    /// expects on all platforms.
    pub fn relative_path(&self, file: &Path) -> Result<String, CodestampError> {
        let abs = if file.is_absolute() {
            file.to_path_buf()
        } else {
            std::env::current_dir()?.join(file)
        };
        let rel = abs.strip_prefix(&self.workdir).map_err(|_| {
            CodestampError::Generic(format!("{:?} is outside repository {:?}", file, self.workdir))
        })?;
        Ok(rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"))
    }

    /// Get the content of a file at HEAD.
    ///
    /// Uses `git show HEAD:<path>` for efficient single-call retrieval.
    /// Errors cover untracked files, empty repositories, and a missing git
    /// binary alike; callers treat all of them as "no committed version".
    pub fn file_content_at_head(&self, relative_path: &str) -> Result<String, CodestampError> {
        let mut args = self.global_args_for_exec();
        args.push("show".to_string());
        args.push(format!("HEAD:{}", relative_path));
        let output = exec_git(&args)?;
        Ok(String::from_utf8(output.stdout)?)
    }

    fn global_args_for_exec(&self) -> Vec<String> {
        vec![
            "-C".to_string(),
            self.workdir.to_string_lossy().to_string(),
        ]
    }
}

pub fn exec_git(args: &[String]) -> Result<Output, CodestampError> {
    let mut cmd = Command::new(Config::get().git_cmd());
    cmd.args(args);

    let output = cmd.output().map_err(CodestampError::IoError)?;

    if !output.status.success() {
        let code = output.status.code();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        return Err(CodestampError::GitCliError {
            code,
            stderr,
            args: args.to_vec(),
        });
    }

    Ok(output)
}
