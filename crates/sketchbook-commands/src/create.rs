//! `sketchbook create` / `sketchbook books`: sketchbook folders.
//!
//! A sketchbook is a folder with a `sketches/` directory and a README; the
//! launcher runs from inside it.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use sketchbook_core::config::schema::DEFAULT_SKETCH_DIR;

fn resolve_base(path: Option<&Path>) -> PathBuf {
    match path {
        Some(p) => p.to_path_buf(),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

fn readme(name: &str, date: &str) -> String {
    format!(
        "# {name} Sketchbook\n\n\
         Created on: {date}\n\n\
         ## Structure\n\n\
         - **{dir}/**: Store your sketch files here\n\
         - Run `sketchbook` in this folder to pick, tag and launch a sketch\n",
        name = name,
        date = date,
        dir = DEFAULT_SKETCH_DIR,
    )
}

/// `sketchbook create <name> [--path DIR] [--no-template]`
///
/// Fails when the folder already exists.
pub fn cmd_create(name: &str, path: Option<&Path>, template: bool) -> Result<PathBuf> {
    if name.trim().is_empty() || name.contains(['/', '\\']) {
        anyhow::bail!("Invalid sketchbook name: '{}'", name);
    }
    let base = resolve_base(path);
    let book = base.join(name);
    if book.exists() {
        anyhow::bail!("Sketchbook '{}' already exists at {}", name, base.display());
    }

    fs::create_dir_all(&book)
        .with_context(|| format!("Failed to create sketchbook: {}", book.display()))?;
    eprintln!("✓ Created sketchbook folder: {}", book.display());

    if template {
        let sketches = book.join(DEFAULT_SKETCH_DIR);
        fs::create_dir(&sketches)
            .with_context(|| format!("Failed to create {}", sketches.display()))?;
        let date = chrono::Local::now().format("%Y-%m-%d").to_string();
        let readme_path = book.join("README.md");
        fs::write(&readme_path, readme(name, &date))
            .with_context(|| format!("Failed to write {}", readme_path.display()))?;
        eprintln!("✓ Created template with {}/ and README.md", DEFAULT_SKETCH_DIR);
    }
    tracing::debug!(path = %book.display(), template, "sketchbook created");
    Ok(book)
}

/// Directories directly under `base`, in `read_dir` order.
pub fn find_sketchbooks(base: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(base)
        .with_context(|| format!("Failed to read directory: {}", base.display()))?;
    Ok(entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect())
}

/// `sketchbook books [--path DIR]`
pub fn cmd_books(path: Option<&Path>) -> Result<()> {
    let base = resolve_base(path);
    let books = find_sketchbooks(&base)?;
    if books.is_empty() {
        eprintln!("No sketchbooks found in {}", base.display());
        return Ok(());
    }
    eprintln!("Found {} sketchbook(s) in {}:", books.len(), base.display());
    for (idx, book) in books.iter().enumerate() {
        let name = book.file_name().unwrap_or_default().to_string_lossy();
        println!("{}. {}", idx + 1, name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_with_template() {
        let tmp = tempfile::tempdir().unwrap();
        let book = cmd_create("generative", Some(tmp.path()), true).unwrap();
        assert!(book.join("sketches").is_dir());
        let readme = fs::read_to_string(book.join("README.md")).unwrap();
        assert!(readme.starts_with("# generative Sketchbook\n\nCreated on: "));
        assert!(readme.contains("- **sketches/**"));
    }

    #[test]
    fn test_create_without_template_is_bare() {
        let tmp = tempfile::tempdir().unwrap();
        let book = cmd_create("bare", Some(tmp.path()), false).unwrap();
        assert!(book.is_dir());
        assert_eq!(fs::read_dir(&book).unwrap().count(), 0);
    }

    #[test]
    fn test_create_refuses_existing_and_bad_names() {
        let tmp = tempfile::tempdir().unwrap();
        cmd_create("dup", Some(tmp.path()), false).unwrap();
        let err = cmd_create("dup", Some(tmp.path()), true).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert!(cmd_create("a/b", Some(tmp.path()), false).is_err());
        assert!(cmd_create(" ", Some(tmp.path()), false).is_err());
    }

    #[test]
    fn test_find_sketchbooks_only_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        cmd_create("one", Some(tmp.path()), false).unwrap();
        cmd_create("two", Some(tmp.path()), false).unwrap();
        fs::write(tmp.path().join("notes.txt"), "").unwrap();
        let mut names: Vec<String> = find_sketchbooks(tmp.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["one", "two"]);
    }
}
