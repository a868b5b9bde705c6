//! Sketch discovery: script files directly inside the sketch directory.
//!
//! Order is whatever `read_dir` yields. It is not sorted and may differ
//! between platforms or runs, so a listing must be collected once and used for
//! both display and selection.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::tags::{TagSet, TagStore};
use crate::config::schema::DEFAULT_EXTENSIONS;

/// A candidate sketch, identified by its filename inside the sketch directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SketchFile {
    pub name: String,
    pub path: PathBuf,
}

/// Lazy scan over a sketch directory. Yields nothing when the directory is
/// missing or unreadable.
#[derive(Debug)]
pub struct Sketches {
    entries: Option<fs::ReadDir>,
    extensions: Vec<String>,
}

impl Iterator for Sketches {
    type Item = SketchFile;

    fn next(&mut self) -> Option<SketchFile> {
        let entries = self.entries.as_mut()?;
        for entry in entries.by_ref() {
            let Ok(entry) = entry else {
                continue;
            };
            let path = entry.path();
            if !path.is_file() || !has_extension(&path, &self.extensions) {
                continue;
            }
            let Some(name) = path.file_name().and_then(OsStr::to_str).map(str::to_string) else {
                continue;
            };
            return Some(SketchFile { name, path });
        }
        None
    }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| extensions.iter().any(|e| e == ext))
}

/// List `*.py` sketches in `dir`.
pub fn list_sketches(dir: &Path) -> Sketches {
    let extensions: Vec<String> = DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect();
    list_sketches_with(dir, &extensions)
}

/// List sketches in `dir` whose extension is one of `extensions` (no dot).
pub fn list_sketches_with(dir: &Path, extensions: &[String]) -> Sketches {
    let entries = if !dir.is_dir() {
        tracing::warn!(dir = %dir.display(), "sketch directory does not exist");
        None
    } else {
        match fs::read_dir(dir) {
            Ok(rd) => Some(rd),
            Err(e) => {
                tracing::warn!(dir = %dir.display(), "cannot read sketch directory: {}", e);
                None
            }
        }
    };
    Sketches {
        entries,
        extensions: extensions.to_vec(),
    }
}

/// A sketch joined with its stored tags, for display.
#[derive(Debug, Clone, Serialize)]
pub struct SketchEntry {
    #[serde(flatten)]
    pub file: SketchFile,
    #[serde(serialize_with = "serialize_tags")]
    pub tags: TagSet,
}

impl SketchEntry {
    /// `(cv, physics)` or `(No Tags)`
    pub fn display_tags(&self) -> String {
        if self.tags.is_empty() {
            "(No Tags)".to_string()
        } else {
            format!("({})", self.tags)
        }
    }
}

fn serialize_tags<S: serde::Serializer>(tags: &TagSet, s: S) -> Result<S::Ok, S::Error> {
    s.collect_seq(tags.iter())
}

/// Join a scan with the tag store. Records for files that are gone never show
/// up because the scan drives the join.
pub fn join_with_tags(sketches: impl IntoIterator<Item = SketchFile>, store: &TagStore) -> Vec<SketchEntry> {
    let records = store.all_records();
    sketches
        .into_iter()
        .map(|file| {
            let tags = records.get(&file.name).cloned().unwrap_or_default();
            SketchEntry { file, tags }
        })
        .collect()
}
