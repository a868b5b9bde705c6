//! Config structs grouped by concern, loaded from the environment.

use super::env_keys::{launch, observability as obv_keys, paths};
use super::loader::{env_bool, env_optional, env_or};
use std::path::PathBuf;

pub const DEFAULT_SKETCH_DIR: &str = "sketches";
pub const DEFAULT_INTERPRETER: &str = "python3";
pub const DEFAULT_EXTENSIONS: &[&str] = &["py"];

/// Where sketches live and how they are launched.
#[derive(Debug, Clone)]
pub struct SketchbookConfig {
    pub sketch_dir: PathBuf,
    /// Explicit metadata file. `None` means the default file inside `sketch_dir`.
    pub metadata_path: Option<PathBuf>,
    pub interpreter: String,
    /// Script extensions without the leading dot.
    pub extensions: Vec<String>,
}

impl Default for SketchbookConfig {
    fn default() -> Self {
        Self {
            sketch_dir: PathBuf::from(DEFAULT_SKETCH_DIR),
            metadata_path: None,
            interpreter: DEFAULT_INTERPRETER.to_string(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SketchbookConfig {
    /// Load from the environment (`.env` is loaded first).
    pub fn from_env() -> Self {
        super::loader::load_dotenv();
        let sketch_dir = PathBuf::from(env_or(
            paths::SKETCHBOOK_SKETCH_DIR,
            paths::SKETCH_DIR_ALIASES,
            || DEFAULT_SKETCH_DIR.to_string(),
        ));
        let metadata_path = env_optional(paths::SKETCHBOOK_METADATA, &[]).map(PathBuf::from);
        let interpreter = env_or(
            launch::SKETCHBOOK_INTERPRETER,
            launch::INTERPRETER_ALIASES,
            || DEFAULT_INTERPRETER.to_string(),
        );
        let extensions = env_optional(launch::SKETCHBOOK_EXTENSIONS, &[])
            .map(|s| parse_extensions(&s))
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| Self::default().extensions);
        Self {
            sketch_dir,
            metadata_path,
            interpreter,
            extensions,
        }
    }

    /// Apply CLI flags on top of the env-derived values.
    pub fn with_cli_overrides(
        mut self,
        sketch_dir: Option<PathBuf>,
        metadata_path: Option<PathBuf>,
        interpreter: Option<String>,
    ) -> Self {
        if let Some(dir) = sketch_dir {
            self.sketch_dir = dir;
        }
        if metadata_path.is_some() {
            self.metadata_path = metadata_path;
        }
        if let Some(interp) = interpreter.filter(|s| !s.trim().is_empty()) {
            self.interpreter = interp;
        }
        self
    }
}

/// "py, .pyw,," → ["py", "pyw"]
pub fn parse_extensions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_start_matches('.').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Logging settings
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub quiet: bool,
    pub log_level: String,
    pub log_json: bool,
}

impl ObservabilityConfig {
    pub fn from_env() -> &'static Self {
        use std::sync::OnceLock;
        static CACHE: OnceLock<ObservabilityConfig> = OnceLock::new();
        CACHE.get_or_init(|| {
            super::loader::load_dotenv();
            Self {
                quiet: env_bool(obv_keys::SKETCHBOOK_QUIET, &[], false),
                log_level: env_or(obv_keys::SKETCHBOOK_LOG_LEVEL, &[], || "warn".to_string()),
                log_json: env_bool(obv_keys::SKETCHBOOK_LOG_JSON, &[], false),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extensions() {
        assert_eq!(parse_extensions("py, .pyw,,"), vec!["py", "pyw"]);
        assert!(parse_extensions(" , ").is_empty());
    }

    #[test]
    fn test_cli_overrides_take_precedence() {
        let cfg = SketchbookConfig::default().with_cli_overrides(
            Some(PathBuf::from("work/sketches")),
            Some(PathBuf::from("tags.json")),
            Some("python3.12".to_string()),
        );
        assert_eq!(cfg.sketch_dir, PathBuf::from("work/sketches"));
        assert_eq!(cfg.metadata_path, Some(PathBuf::from("tags.json")));
        assert_eq!(cfg.interpreter, "python3.12");
    }

    #[test]
    fn test_blank_interpreter_override_is_ignored() {
        let cfg = SketchbookConfig::default().with_cli_overrides(None, None, Some("  ".into()));
        assert_eq!(cfg.interpreter, DEFAULT_INTERPRETER);
        assert_eq!(cfg.sketch_dir, PathBuf::from(DEFAULT_SKETCH_DIR));
        assert_eq!(cfg.metadata_path, None);
    }
}
