//! `sketchbook list`: numbered sketch listing with tags.

use anyhow::Result;

use sketchbook_core::config::SketchbookConfig;
use sketchbook_core::sketch::{join_with_tags, list_sketches_with, SketchEntry, TagStore};

/// Scan the sketch directory and join every file with its tags.
pub fn collect_entries(config: &SketchbookConfig) -> Vec<SketchEntry> {
    let store = TagStore::from_config(config);
    join_with_tags(
        list_sketches_with(&config.sketch_dir, &config.extensions),
        &store,
    )
}

/// Plain-text listing, one `N. name (tags)` line per sketch.
pub fn render_listing(entries: &[SketchEntry]) -> String {
    entries
        .iter()
        .enumerate()
        .map(|(idx, e)| format!("{}. {} {}", idx + 1, e.file.name, e.display_tags()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `sketchbook list [--json]`
pub fn cmd_list(config: &SketchbookConfig, json_output: bool) -> Result<()> {
    let entries = collect_entries(config);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        eprintln!(
            "No sketches found in '{}'. Add some .{} files first.",
            config.sketch_dir.display(),
            config.extensions.join(", .")
        );
        return Ok(());
    }

    eprintln!("📜 Sketches in {} ({}):", config.sketch_dir.display(), entries.len());
    println!("{}", render_listing(&entries));
    Ok(())
}
