//! External programs: compiler, PDF viewer and editor

use crate::error::{Result, VitaeError};
use std::path::Path;
use std::process::{Command, Output};

/// A configured command line; the target path is appended as its last argument
#[derive(Debug, Clone)]
pub struct ExternalCommand {
    command: String,
}

impl ExternalCommand {
    pub fn new(command: impl Into<String>) -> Self {
        ExternalCommand {
            command: command.into(),
        }
    }

    fn build(&self, target: &Path, cwd: Option<&Path>) -> Result<(String, Command)> {
        let (program, args) = self.parse_command()?;

        let mut cmd = Command::new(&program);
        cmd.args(&args).arg(target);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }
        Ok((program, cmd))
    }

    /// Run interactively and wait for the program to exit; a non-zero exit
    /// is a launch failure
    pub fn run(&self, target: &Path) -> Result<()> {
        let (program, mut cmd) = self.build(target, None)?;
        tracing::debug!(command = %self.command, target = %target.display(), "Running");

        let status = cmd.status().map_err(|e| launch_error(&program, e))?;
        if !status.success() {
            return Err(VitaeError::Launch {
                program,
                reason: status.to_string(),
            });
        }
        Ok(())
    }

    /// Run in `cwd` with output captured
    pub fn run_captured(&self, target: &Path, cwd: &Path) -> Result<Output> {
        let (program, mut cmd) = self.build(target, Some(cwd))?;
        tracing::debug!(command = %self.command, cwd = %cwd.display(), "Running captured");

        cmd.output().map_err(|e| launch_error(&program, e))
    }

    /// Compile `source` in its own directory; a non-zero exit is a build failure
    pub fn compile(&self, source: &Path) -> Result<()> {
        let cwd = source
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let file = source.file_name().map(Path::new).unwrap_or(source);

        tracing::info!("Compiling {} using {}", source.display(), self.command);
        let output = self.run_captured(file, cwd)?;

        if output.status.success() {
            return Ok(());
        }

        let code = output.status.code().unwrap_or(-1);
        tracing::error!("Build failed with error code {}", code);
        tracing::debug!("{}", String::from_utf8_lossy(&output.stdout));
        tracing::debug!("{}", String::from_utf8_lossy(&output.stderr));
        Err(VitaeError::BuildFailed {
            path: source.to_path_buf(),
            code,
        })
    }

    fn parse_command(&self) -> Result<(String, Vec<String>)> {
        let mut parts = self.command.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or_else(|| VitaeError::Launch {
            program: String::new(),
            reason: "command is empty".to_string(),
        })?;
        Ok((program, parts.collect()))
    }
}

fn launch_error(program: &str, e: std::io::Error) -> VitaeError {
    VitaeError::Launch {
        program: program.to_string(),
        reason: e.to_string(),
    }
}
