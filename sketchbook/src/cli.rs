use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Sketchbook - tag your creative-coding sketches and launch them with the right parameters
#[derive(Parser, Debug)]
#[command(name = "sketchbook")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub launch: LaunchArgs,

    /// Defaults to `launch`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Where sketches live and how they are run. Env: SKETCHBOOK_SKETCH_DIR,
/// SKETCHBOOK_METADATA, SKETCHBOOK_INTERPRETER.
#[derive(Args, Debug, Clone, Default)]
pub struct LaunchArgs {
    /// Sketch directory (default: from env or "sketches")
    #[arg(long, short = 'd', global = true, value_name = "DIR")]
    pub sketch_dir: Option<PathBuf>,

    /// Tag metadata file (default: <sketch_dir>/.sketchbook-tags.json)
    #[arg(long, global = true, value_name = "FILE")]
    pub metadata: Option<PathBuf>,

    /// Interpreter used to run sketches (default: from env or "python3")
    #[arg(long, short = 'i', global = true, value_name = "PROGRAM")]
    pub interpreter: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pick a sketch, review its tags, enter parameters and run it
    Launch,

    /// List sketches with their tags
    List {
        /// Output as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Manage sketch tags without the interactive launcher
    Tag {
        #[command(subcommand)]
        action: TagAction,
    },

    /// Create a new sketchbook folder
    Create {
        /// Name of the sketchbook folder
        #[arg(value_name = "NAME")]
        name: String,

        /// Where to create it (default: current directory)
        #[arg(long, short = 'p', value_name = "PATH")]
        path: Option<PathBuf>,

        /// Only create the folder, without sketches/ and README.md
        #[arg(long, default_value = "false")]
        no_template: bool,
    },

    /// List sketchbook folders in a directory
    Books {
        /// Directory to look in (default: current directory)
        #[arg(long, short = 'p', value_name = "PATH")]
        path: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum TagAction {
    /// Add tags to a sketch
    Add {
        /// Sketch filename, e.g. particles.py
        #[arg(value_name = "SKETCH")]
        sketch: String,

        /// Comma-separated tags, e.g. "cv, physics"
        #[arg(value_name = "TAGS")]
        tags: String,
    },

    /// Remove tags from a sketch
    Remove {
        #[arg(value_name = "SKETCH")]
        sketch: String,

        #[arg(value_name = "TAGS")]
        tags: String,
    },

    /// Show every stored tag record
    List {
        /// Output as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },
}
