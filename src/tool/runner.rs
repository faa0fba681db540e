//! Running external commands
//!
//! A [`ToolInvocation`] is a program plus its arguments. The
//! [`CommandRunner`] trait is the seam between the workflow and the
//! operating system: production code uses [`SystemRunner`], tests script
//! their own responses.

use std::fmt;
use std::io;
use std::process::Command;
use thiserror::Error;

/// Errors from running an external command
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("Command failed: {command} (exit {status}): {stderr}")]
    Failed {
        command: String,
        status: ExitCode,
        stderr: String,
    },
}

/// Exit status of a failed command; `None` when killed by a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub Option<i32>);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(code) => write!(f, "{}", code),
            None => f.write_str("signal"),
        }
    }
}

/// A single call to an external program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub program: String,
    pub args: Vec<String>,
}

impl ToolInvocation {
    /// Start an invocation of `program`
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// First argument, i.e. the tool's subcommand
    pub fn subcommand(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }

    /// Whether `flag` appears among the arguments
    pub fn has_arg(&self, flag: &str) -> bool {
        self.args.iter().any(|a| a == flag)
    }
}

impl fmt::Display for ToolInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured output of a successful command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Executes invocations to completion
pub trait CommandRunner {
    /// Run the invocation and wait for it.
    ///
    /// A nonzero exit is reported as [`ToolError::Failed`]; the single
    /// failure signal callers need to check.
    fn run(&mut self, invocation: &ToolInvocation) -> Result<ToolOutput, ToolError>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &mut R {
    fn run(&mut self, invocation: &ToolInvocation) -> Result<ToolOutput, ToolError> {
        (**self).run(invocation)
    }
}

/// Runs invocations as child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, invocation: &ToolInvocation) -> Result<ToolOutput, ToolError> {
        log::debug!("spawning {}", invocation);

        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .output()
            .map_err(|source| ToolError::Spawn {
                command: invocation.to_string(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            let stderr = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            return Err(ToolError::Failed {
                command: invocation.to_string(),
                status: ExitCode(output.status.code()),
                stderr,
            });
        }

        Ok(ToolOutput { stdout, stderr })
    }
}
