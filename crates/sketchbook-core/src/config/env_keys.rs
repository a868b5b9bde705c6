//! Environment variable keys.

/// Sketch directory, metadata file and launch settings
pub mod paths {
    pub const SKETCHBOOK_SKETCH_DIR: &str = "SKETCHBOOK_SKETCH_DIR";
    pub const SKETCH_DIR_ALIASES: &[&str] = &["SKETCH_DIR"];

    /// Explicit metadata file; defaults to `<sketch_dir>/.sketchbook-tags.json`.
    pub const SKETCHBOOK_METADATA: &str = "SKETCHBOOK_METADATA";
}

pub mod launch {
    pub const SKETCHBOOK_INTERPRETER: &str = "SKETCHBOOK_INTERPRETER";
    pub const INTERPRETER_ALIASES: &[&str] = &["SKETCH_INTERPRETER"];

    /// Comma-separated script extensions, e.g. "py,pyw".
    pub const SKETCHBOOK_EXTENSIONS: &str = "SKETCHBOOK_EXTENSIONS";
}

/// Observability and logging
pub mod observability {
    pub const SKETCHBOOK_QUIET: &str = "SKETCHBOOK_QUIET";
    pub const SKETCHBOOK_LOG_LEVEL: &str = "SKETCHBOOK_LOG_LEVEL";
    pub const SKETCHBOOK_LOG_JSON: &str = "SKETCHBOOK_LOG_JSON";
}
