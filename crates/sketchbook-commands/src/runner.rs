//! Launching a sketch as a child process.
//!
//! The command is an argument vector handed straight to the OS; no shell ever
//! sees tag or parameter values.

use std::fmt;
use std::io;
use std::process::{Command, Stdio};

use sketchbook_core::sketch::{ParamValue, SketchFile};
use thiserror::Error;

/// One launch: the sketch, how to run it and the collected parameters.
#[derive(Debug, Clone)]
pub struct LaunchRequest {
    pub sketch: SketchFile,
    pub interpreter: String,
    pub params: Vec<(String, ParamValue)>,
}

impl LaunchRequest {
    /// `--name value` pairs in collection order.
    pub fn args(&self) -> Vec<String> {
        self.params
            .iter()
            .flat_map(|(name, value)| [format!("--{}", name), value.to_string()])
            .collect()
    }

    /// Full argv: interpreter, sketch path, then [`Self::args`].
    pub fn argv(&self) -> Vec<String> {
        let mut argv = vec![
            self.interpreter.clone(),
            self.sketch.path.to_string_lossy().to_string(),
        ];
        argv.extend(self.args());
        argv
    }

    /// Human-readable, shell-quoted rendering. Display only; never executed.
    pub fn display_command(&self) -> String {
        self.argv()
            .iter()
            .map(|a| shell_quote(a))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn shell_quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,+@%".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

/// How the child ended. `code` is `None` when it was killed by a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStatus {
    pub code: Option<i32>,
}

impl RunStatus {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {}", code),
            None => f.write_str("terminated by signal"),
        }
    }
}

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

pub trait SketchRunner {
    /// Run the sketch to completion.
    fn run(&mut self, request: &LaunchRequest) -> Result<RunStatus, LaunchError>;
}

/// Runs the sketch with inherited stdin/stdout/stderr and waits for it.
#[derive(Debug, Default)]
pub struct ProcessRunner;

impl SketchRunner for ProcessRunner {
    fn run(&mut self, request: &LaunchRequest) -> Result<RunStatus, LaunchError> {
        tracing::debug!(argv = ?request.argv(), "spawning sketch");
        let status = Command::new(&request.interpreter)
            .arg(&request.sketch.path)
            .args(request.args())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| LaunchError::Spawn {
                program: request.interpreter.clone(),
                source,
            })?;
        tracing::debug!(code = ?status.code(), "sketch exited");
        Ok(RunStatus {
            code: status.code(),
        })
    }
}
