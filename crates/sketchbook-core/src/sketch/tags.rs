//! Tag metadata store: sketch filename → set of free-form tags.
//!
//! Persisted as a single JSON object next to the sketches
//! (`<sketch_dir>/.sketchbook-tags.json`), e.g.
//!
//! ```json
//! { "particles.py": ["cv", "physics"] }
//! ```
//!
//! Reads never fail: a missing or unparseable file is an empty store. An
//! unparseable file (bad JSON or bad UTF-8) is copied to `<file>.bak` before the
//! next write replaces it; a file that exists but cannot be read at all makes
//! writes fail instead. Writes go through a temp file in the same directory
//! followed by a rename, so a crash mid-write leaves the previous contents
//! intact, and the rename keeps the permissions of the file it replaces.
//! Entries whose value is not a list of strings are skipped on read and written
//! back untouched.
//!
//! Single-writer: two launchers saving the same file concurrently race, last
//! rename wins.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::SketchbookConfig;

pub const METADATA_FILE_NAME: &str = ".sketchbook-tags.json";

/// Duplicate-free, case-sensitive set of tags.
///
/// Iterates in insertion order; equality ignores order.
#[derive(Debug, Clone, Default)]
pub struct TagSet(Vec<String>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tag (trimmed). Returns false for blanks and duplicates.
    pub fn insert(&mut self, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        let tag = tag.trim();
        if tag.is_empty() || self.contains(tag) {
            return false;
        }
        self.0.push(tag.to_string());
        true
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    pub fn extend_from(&mut self, other: &TagSet) {
        for tag in other.iter() {
            self.insert(tag);
        }
    }

    pub fn subtract(&mut self, other: &TagSet) {
        self.0.retain(|t| !other.contains(t));
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.clone()
    }
}

impl PartialEq for TagSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|t| other.contains(t))
    }
}

impl Eq for TagSet {}

impl<S: Into<String>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

/// Parse user input like `"cv, physics,,AI"`.
pub fn parse_tag_list(raw: &str) -> TagSet {
    raw.split(',').collect()
}

/// Parsed metadata file: known records plus anything we could not interpret.
#[derive(Debug, Default)]
struct MetadataDocument {
    records: BTreeMap<String, TagSet>,
    unknown: Map<String, Value>,
}

impl MetadataDocument {
    fn from_json(content: &str) -> Result<Self> {
        let root: Map<String, Value> =
            serde_json::from_str(content).context("metadata root is not a JSON object")?;
        let mut doc = MetadataDocument::default();
        for (key, value) in root {
            match tag_list(&value) {
                Some(tags) => {
                    doc.records.insert(key, tags);
                }
                None => {
                    tracing::debug!(key = %key, "skipping non tag-list metadata entry");
                    doc.unknown.insert(key, value);
                }
            }
        }
        Ok(doc)
    }

    fn to_json(&self) -> Result<String> {
        let mut root = self.unknown.clone();
        for (name, tags) in &self.records {
            if tags.is_empty() {
                continue;
            }
            root.insert(name.clone(), Value::from(tags.to_vec()));
        }
        Ok(serde_json::to_string_pretty(&Value::Object(root))?)
    }
}

fn tag_list(value: &Value) -> Option<TagSet> {
    let items = value.as_array()?;
    let mut tags = TagSet::new();
    for item in items {
        tags.insert(item.as_str()?);
    }
    Some(tags)
}

/// File-backed tag store. Cheap to construct; every call re-reads the file.
#[derive(Debug, Clone)]
pub struct TagStore {
    path: PathBuf,
}

impl TagStore {
    /// Store at an explicit file path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the well-known location inside a sketch directory.
    pub fn for_sketch_dir(sketch_dir: &Path) -> Self {
        Self::at(sketch_dir.join(METADATA_FILE_NAME))
    }

    pub fn from_config(cfg: &SketchbookConfig) -> Self {
        match &cfg.metadata_path {
            Some(p) => Self::at(p.clone()),
            None => Self::for_sketch_dir(&cfg.sketch_dir),
        }
    }

    pub fn get_metadata_path(&self) -> &Path {
        &self.path
    }

    /// Tags for one sketch; empty when there is no record.
    pub fn load_tags(&self, sketch_name: &str) -> TagSet {
        self.read_lenient()
            .records
            .remove(sketch_name)
            .unwrap_or_default()
    }

    /// Every record in the file, keyed by sketch filename.
    pub fn all_records(&self) -> BTreeMap<String, TagSet> {
        let mut records = self.read_lenient().records;
        records.retain(|_, tags| !tags.is_empty());
        records
    }

    /// Union `tags` into the sketch's record and persist. The sketch file does
    /// not need to exist.
    pub fn add_tags(&self, sketch_name: &str, tags: &TagSet) -> Result<TagSet> {
        self.update(sketch_name, |current| current.extend_from(tags))
    }

    /// Remove `tags` from the sketch's record and persist. Absent tags are ignored.
    pub fn remove_tags(&self, sketch_name: &str, tags: &TagSet) -> Result<TagSet> {
        self.update(sketch_name, |current| current.subtract(tags))
    }

    fn update(&self, sketch_name: &str, f: impl FnOnce(&mut TagSet)) -> Result<TagSet> {
        let (mut doc, corrupt) = self.read_document()?;
        let mut tags = doc.records.remove(sketch_name).unwrap_or_default();
        let before = tags.clone();
        f(&mut tags);
        if tags == before && !corrupt {
            return Ok(tags);
        }
        if corrupt {
            self.backup_corrupt_file();
        }
        doc.records.insert(sketch_name.to_string(), tags.clone());
        self.write_document(&doc)?;
        tracing::debug!(
            sketch = sketch_name,
            tags = %tags,
            path = %self.path.display(),
            "saved sketch tags"
        );
        Ok(tags)
    }

    fn read_lenient(&self) -> MetadataDocument {
        match self.read_document() {
            Ok((doc, _)) => doc,
            Err(e) => {
                tracing::warn!("{:#}", e);
                MetadataDocument::default()
            }
        }
    }

    /// Returns the document and whether the file existed but could not be
    /// decoded. I/O failures other than a missing file are errors.
    fn read_document(&self) -> Result<(MetadataDocument, bool)> {
        let bytes = match fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok((MetadataDocument::default(), false));
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Cannot read tag metadata: {}", self.path.display())
                });
            }
        };
        let parsed = std::str::from_utf8(&bytes)
            .map_err(anyhow::Error::from)
            .and_then(|content| {
                if content.trim().is_empty() {
                    Ok(MetadataDocument::default())
                } else {
                    MetadataDocument::from_json(content)
                }
            });
        match parsed {
            Ok(doc) => Ok((doc, false)),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "tag metadata is unreadable, treating as empty: {:#}",
                    e
                );
                Ok((MetadataDocument::default(), true))
            }
        }
    }

    fn backup_corrupt_file(&self) {
        let mut backup = self.path.clone().into_os_string();
        backup.push(".bak");
        if let Err(e) = fs::copy(&self.path, &backup) {
            tracing::warn!("failed to back up corrupt tag metadata: {}", e);
        }
    }

    fn write_document(&self, doc: &MetadataDocument) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create metadata dir: {}", dir.display()))?;
        let data = doc.to_json()?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)
            .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
        tmp.write_all(data.as_bytes())
            .context("Failed to write tag metadata")?;
        if let Ok(existing) = fs::metadata(&self.path) {
            tmp.as_file()
                .set_permissions(existing.permissions())
                .context("Failed to copy tag metadata permissions")?;
        }
        tmp.as_file()
            .sync_all()
            .context("Failed to sync tag metadata")?;
        tmp.persist(&self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }
}
