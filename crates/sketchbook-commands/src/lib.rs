//! Sketchbook commands.
//!
//! Depends only on `sketchbook-core`; the binary crate owns argument parsing.

pub mod create;
pub mod launch;
pub mod list;
pub mod prompt;
pub mod runner;
pub mod tag;

pub use launch::{cmd_launch, LaunchOutcome, Launcher};
pub use prompt::Prompter;
pub use runner::{LaunchError, LaunchRequest, ProcessRunner, RunStatus, SketchRunner};
