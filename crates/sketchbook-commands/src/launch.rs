//! `sketchbook launch`: pick a sketch, review its tags, collect parameters and run it.
//!
//! Flow:
//!   1. Scan the sketch directory and print a numbered listing with tags
//!   2. Read a 1-based selection
//!   3. Load the sketch's tags; offer to add some when it has none
//!   4. Optionally prompt for every parameter the tags imply
//!   5. Build the argument vector and run the sketch, waiting for it to exit
//!
//! Every failure along the way becomes a message; the launcher itself always
//! finishes cleanly.

use anyhow::Result;
use std::io::{self, BufRead, Write};

use sketchbook_core::config::SketchbookConfig;
use sketchbook_core::sketch::{
    join_with_tags, list_sketches_with, parse_tag_list, ParamValue, ResolvedParam, SketchEntry,
    SketchFile, TagSchema, TagSet, TagStore,
};

use crate::prompt::Prompter;
use crate::runner::{LaunchRequest, ProcessRunner, RunStatus, SketchRunner};

/// How a launch session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    NoSketches,
    InvalidChoice,
    Finished { sketch: String, status: RunStatus },
    SpawnFailed { sketch: String },
}

pub struct Launcher {
    config: SketchbookConfig,
    store: TagStore,
    schema: TagSchema,
}

impl Launcher {
    pub fn new(config: SketchbookConfig) -> Self {
        let store = TagStore::from_config(&config);
        Self {
            config,
            store,
            schema: TagSchema::builtin(),
        }
    }

    pub fn with_store(mut self, store: TagStore) -> Self {
        self.store = store;
        self
    }

    pub fn with_schema(mut self, schema: TagSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn store(&self) -> &TagStore {
        &self.store
    }

    /// Run one interactive session. Only terminal I/O errors escape.
    pub fn run<R: BufRead, W: Write>(
        &self,
        prompter: &mut Prompter<R, W>,
        runner: &mut dyn SketchRunner,
    ) -> io::Result<LaunchOutcome> {
        let entries = self.listing();
        if entries.is_empty() {
            prompter.say(format!(
                "⚠️ No sketches found! Add some in the '{}' folder.",
                self.config.sketch_dir.display()
            ))?;
            return Ok(LaunchOutcome::NoSketches);
        }

        prompter.say("\n📜 Available Sketches:\n")?;
        for (idx, entry) in entries.iter().enumerate() {
            prompter.say(format!(
                "{}. {} {}",
                idx + 1,
                entry.file.name,
                entry.display_tags()
            ))?;
        }

        let Some(sketch) = select(prompter, &entries)? else {
            prompter.say("❌ Invalid choice or file does not exist.")?;
            return Ok(LaunchOutcome::InvalidChoice);
        };
        tracing::debug!(sketch = %sketch.name, "sketch selected");

        let tags = self.review_tags(prompter, &sketch)?;
        let params = self.collect_params(prompter, &tags)?;

        let request = LaunchRequest {
            sketch,
            interpreter: self.config.interpreter.clone(),
            params,
        };
        self.execute(prompter, runner, request)
    }

    fn listing(&self) -> Vec<SketchEntry> {
        let sketches: Vec<SketchFile> =
            list_sketches_with(&self.config.sketch_dir, &self.config.extensions).collect();
        join_with_tags(sketches, &self.store)
    }

    /// Load tags; when there are none, offer to add some and reload.
    fn review_tags<R: BufRead, W: Write>(
        &self,
        prompter: &mut Prompter<R, W>,
        sketch: &SketchFile,
    ) -> io::Result<TagSet> {
        let mut tags = self.store.load_tags(&sketch.name);
        if tags.is_empty() {
            prompter.say("\n⚠️ No tags found for this sketch.")?;
            if prompter.confirm("Would you like to add tags? (yes/no): ")? {
                let raw = prompter
                    .ask("Enter tags (comma-separated): ")?
                    .unwrap_or_default();
                let new_tags = parse_tag_list(&raw);
                if new_tags.is_empty() {
                    prompter.say("No tags entered.")?;
                } else {
                    match self.store.add_tags(&sketch.name, &new_tags) {
                        Ok(_) => tags = self.store.load_tags(&sketch.name),
                        Err(e) => {
                            tracing::warn!("failed to save tags: {:#}", e);
                            prompter.say(format!("⚠️ Could not save tags: {:#}", e))?;
                            tags = new_tags;
                        }
                    }
                }
            }
        }
        if !tags.is_empty() {
            prompter.say(format!("🏷️  Tags: {}", tags))?;
        }
        Ok(tags)
    }

    /// Ask whether to enter arguments, then prompt for each resolved parameter.
    /// Skipped entirely when the tags imply no parameters.
    fn collect_params<R: BufRead, W: Write>(
        &self,
        prompter: &mut Prompter<R, W>,
        tags: &TagSet,
    ) -> io::Result<Vec<(String, ParamValue)>> {
        let resolved = self.schema.resolve(tags);
        if resolved.is_empty() {
            return Ok(Vec::new());
        }
        if !prompter.confirm("\n🔹 Do you want to enter arguments? (yes/no): ")? {
            return Ok(Vec::new());
        }
        prompter.say("\n🔹 Enter values for the following arguments (press Enter to keep the default):")?;
        let mut values = Vec::with_capacity(resolved.len());
        for param in &resolved {
            let value = prompt_param(prompter, param)?;
            values.push((param.spec.name.to_string(), value));
        }
        Ok(values)
    }

    fn execute<R: BufRead, W: Write>(
        &self,
        prompter: &mut Prompter<R, W>,
        runner: &mut dyn SketchRunner,
        request: LaunchRequest,
    ) -> io::Result<LaunchOutcome> {
        prompter.say(format!("\n🚀 Running: {}", request.display_command()))?;
        let sketch = request.sketch.name.clone();
        match runner.run(&request) {
            Ok(status) => {
                if !status.success() {
                    prompter.say(format!("⚠️ Sketch '{}' finished with {}", sketch, status))?;
                }
                Ok(LaunchOutcome::Finished { sketch, status })
            }
            Err(e) => {
                tracing::warn!("{}", e);
                prompter.say(format!("❌ {}", e))?;
                Ok(LaunchOutcome::SpawnFailed { sketch })
            }
        }
    }
}

/// 1-based choice into `entries`; `None` for EOF, non-numeric or out-of-range input.
fn select<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    entries: &[SketchEntry],
) -> io::Result<Option<SketchFile>> {
    let choice = prompter.ask("\n🎨 Enter the sketch number to run: ")?;
    let picked = choice
        .and_then(|c| c.parse::<usize>().ok())
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| entries.get(i))
        .map(|e| e.file.clone());
    Ok(picked)
}

/// Prompt until the input parses; blank input or EOF keeps the default.
fn prompt_param<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    param: &ResolvedParam,
) -> io::Result<ParamValue> {
    let spec = &param.spec;
    let label = format!("{} ({}) [{}]: ", spec.name, spec.kind, spec.default);
    loop {
        let Some(input) = prompter.ask(&label)? else {
            return Ok(spec.default.clone());
        };
        if input.is_empty() {
            return Ok(spec.default.clone());
        }
        match spec.kind.parse(&input) {
            Ok(value) => return Ok(value),
            Err(e) => prompter.say(format!("   ⚠ {}, try again", e))?,
        }
    }
}

/// `sketchbook launch` on the real terminal.
pub fn cmd_launch(config: &SketchbookConfig) -> Result<()> {
    let launcher = Launcher::new(config.clone());
    let mut prompter = Prompter::stdio();
    match launcher.run(&mut prompter, &mut ProcessRunner) {
        Ok(outcome) => tracing::debug!(?outcome, "launch finished"),
        Err(e) => tracing::warn!("terminal I/O failed: {}", e),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::LaunchError;
    use sketchbook_core::sketch::{ParameterSpec, ParamType};
    use std::fs;
    use std::io::Cursor;
    use std::path::Path;

    #[derive(Default)]
    struct RecordingRunner {
        requests: Vec<LaunchRequest>,
        code: Option<i32>,
        fail: bool,
    }

    impl SketchRunner for RecordingRunner {
        fn run(&mut self, request: &LaunchRequest) -> Result<RunStatus, LaunchError> {
            self.requests.push(request.clone());
            if self.fail {
                return Err(LaunchError::Spawn {
                    program: request.interpreter.clone(),
                    source: io::Error::new(io::ErrorKind::NotFound, "not found"),
                });
            }
            Ok(RunStatus {
                code: Some(self.code.unwrap_or(0)),
            })
        }
    }

    fn launcher_for(dir: &Path) -> Launcher {
        Launcher::new(SketchbookConfig {
            sketch_dir: dir.to_path_buf(),
            ..SketchbookConfig::default()
        })
    }

    fn session(
        launcher: &Launcher,
        runner: &mut RecordingRunner,
        input: &str,
    ) -> (LaunchOutcome, String) {
        let mut prompter = Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        let outcome = launcher.run(&mut prompter, runner).unwrap();
        (outcome, String::from_utf8_lossy(prompter.output()).to_string())
    }

    fn sketch_dir(files: &[&str]) -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        for f in files {
            fs::write(tmp.path().join(f), "print('hi')\n").unwrap();
        }
        tmp
    }

    #[test]
    fn test_empty_dir_reports_no_sketches() {
        let tmp = sketch_dir(&[]);
        let mut runner = RecordingRunner::default();
        let (outcome, out) = session(&launcher_for(tmp.path()), &mut runner, "");
        assert_eq!(outcome, LaunchOutcome::NoSketches);
        assert!(out.contains("No sketches found"));
        assert!(runner.requests.is_empty());
    }

    #[test]
    fn test_out_of_range_choice_spawns_nothing() {
        let tmp = sketch_dir(&["a.py", "b.py", "c.py"]);
        let launcher = launcher_for(tmp.path());
        let mut runner = RecordingRunner::default();
        let (outcome, out) = session(&launcher, &mut runner, "99\n");
        assert_eq!(outcome, LaunchOutcome::InvalidChoice);
        assert!(out.contains("Invalid choice"));
        assert!(runner.requests.is_empty());
        assert!(!launcher.store().get_metadata_path().exists());
    }

    #[test]
    fn test_non_numeric_zero_and_eof_are_invalid() {
        let tmp = sketch_dir(&["a.py"]);
        let launcher = launcher_for(tmp.path());
        for input in ["abc\n", "0\n", "-1\n", ""] {
            let mut runner = RecordingRunner::default();
            let (outcome, _) = session(&launcher, &mut runner, input);
            assert_eq!(outcome, LaunchOutcome::InvalidChoice, "input {:?}", input);
            assert!(runner.requests.is_empty());
        }
    }

    #[test]
    fn test_declining_tags_runs_without_arguments() {
        let tmp = sketch_dir(&["a.py"]);
        let mut runner = RecordingRunner::default();
        let (outcome, out) = session(&launcher_for(tmp.path()), &mut runner, "1\nno\n");
        assert!(out.contains("(No Tags)"));
        assert!(matches!(outcome, LaunchOutcome::Finished { .. }));
        assert_eq!(runner.requests.len(), 1);
        assert!(runner.requests[0].args().is_empty());
    }

    #[test]
    fn test_existing_tags_skip_tag_prompt_and_collect_values() {
        let tmp = sketch_dir(&["sim.py"]);
        let launcher = launcher_for(tmp.path());
        launcher
            .store()
            .add_tags("sim.py", &parse_tag_list("physics"))
            .unwrap();
        let mut runner = RecordingRunner::default();
        let (_, out) = session(&launcher, &mut runner, "1\nyes\nheavy\n20\n\n");
        assert!(out.contains("sim.py (physics)"));
        assert!(out.contains("is not a valid float"));
        assert_eq!(
            runner.requests[0].args(),
            vec!["--gravity", "20", "--friction", "0.1"]
        );
    }

    #[test]
    fn test_declining_arguments_passes_none() {
        let tmp = sketch_dir(&["sim.py"]);
        let launcher = launcher_for(tmp.path());
        launcher
            .store()
            .add_tags("sim.py", &parse_tag_list("AI"))
            .unwrap();
        let mut runner = RecordingRunner::default();
        session(&launcher, &mut runner, "1\nno\n");
        assert!(runner.requests[0].args().is_empty());
    }

    #[test]
    fn test_eof_during_params_uses_defaults() {
        let tmp = sketch_dir(&["sim.py"]);
        let launcher = launcher_for(tmp.path());
        launcher
            .store()
            .add_tags("sim.py", &parse_tag_list("AI"))
            .unwrap();
        let mut runner = RecordingRunner::default();
        session(&launcher, &mut runner, "1\nyes\n");
        assert_eq!(runner.requests[0].args(), vec!["--model", "default_model"]);
    }

    #[test]
    fn test_nonzero_exit_is_surfaced() {
        let tmp = sketch_dir(&["a.py"]);
        let mut runner = RecordingRunner {
            code: Some(3),
            ..Default::default()
        };
        let (outcome, out) = session(&launcher_for(tmp.path()), &mut runner, "1\nno\n");
        assert_eq!(
            outcome,
            LaunchOutcome::Finished {
                sketch: "a.py".into(),
                status: RunStatus { code: Some(3) },
            }
        );
        assert!(out.contains("finished with exit code 3"));
    }

    #[test]
    fn test_spawn_failure_is_reported() {
        let tmp = sketch_dir(&["a.py"]);
        let mut runner = RecordingRunner {
            fail: true,
            ..Default::default()
        };
        let (outcome, out) = session(&launcher_for(tmp.path()), &mut runner, "1\nno\n");
        assert_eq!(outcome, LaunchOutcome::SpawnFailed { sketch: "a.py".into() });
        assert!(out.contains("Failed to start 'python3'"));
    }

    #[test]
    fn test_custom_schema_collision_prompts_once() {
        let tmp = sketch_dir(&["synth.py"]);
        let launcher = launcher_for(tmp.path()).with_schema(TagSchema::from_entries(vec![
            (
                "audio",
                vec![ParameterSpec {
                    name: "device",
                    kind: ParamType::Int,
                    default: ParamValue::Int(1),
                }],
            ),
            (
                "midi",
                vec![ParameterSpec {
                    name: "device",
                    kind: ParamType::String,
                    default: ParamValue::Str("iac".into()),
                }],
            ),
        ]));
        launcher
            .store()
            .add_tags("synth.py", &parse_tag_list("audio, midi"))
            .unwrap();
        let mut runner = RecordingRunner::default();
        let (_, out) = session(&launcher, &mut runner, "1\nyes\n\n");
        assert_eq!(out.matches("device (").count(), 1);
        assert_eq!(runner.requests[0].args(), vec!["--device", "iac"]);
    }
}
