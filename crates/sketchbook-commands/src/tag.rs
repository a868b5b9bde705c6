//! `sketchbook tag`: non-interactive tag management.

use anyhow::Result;
use std::collections::BTreeMap;

use sketchbook_core::config::SketchbookConfig;
use sketchbook_core::sketch::{parse_tag_list, TagSchema, TagSet, TagStore};

/// `sketchbook tag add <sketch> <tags>`
pub fn cmd_tag_add(config: &SketchbookConfig, sketch: &str, tags: &str) -> Result<TagSet> {
    let store = TagStore::from_config(config);
    let requested = parse_tag_list(tags);
    if requested.is_empty() {
        anyhow::bail!("No tags given. Pass a comma-separated list, e.g. \"cv, physics\".");
    }
    if !config.sketch_dir.join(sketch).is_file() {
        eprintln!(
            "⚠ '{}' is not in {} yet; tags are saved anyway.",
            sketch,
            config.sketch_dir.display()
        );
    }
    let schema = TagSchema::builtin();
    let plain = tags_without_params(&schema, &requested);
    if !plain.is_empty() {
        let known: Vec<&str> = schema.known_tags().collect();
        eprintln!(
            "ℹ {} add no launch parameters (parameter tags: {})",
            plain.join(", "),
            known.join(", ")
        );
    }
    let result = store.add_tags(sketch, &requested)?;
    eprintln!("✓ {} {}", sketch, describe(&result));
    Ok(result)
}

/// Tags in `tags` the schema has no parameters for, in TagSet order.
fn tags_without_params<'a>(schema: &TagSchema, tags: &'a TagSet) -> Vec<&'a str> {
    tags.iter()
        .filter(|tag| !schema.known_tags().any(|known| known == *tag))
        .collect()
}

/// `sketchbook tag remove <sketch> <tags>`
pub fn cmd_tag_remove(config: &SketchbookConfig, sketch: &str, tags: &str) -> Result<TagSet> {
    let store = TagStore::from_config(config);
    let result = store.remove_tags(sketch, &parse_tag_list(tags))?;
    eprintln!("✓ {} {}", sketch, describe(&result));
    Ok(result)
}

/// `sketchbook tag list [--json]`: every stored record, including ones whose
/// sketch file has been removed.
pub fn cmd_tag_list(config: &SketchbookConfig, json_output: bool) -> Result<()> {
    let store = TagStore::from_config(config);
    let records = store.all_records();

    if json_output {
        let map: BTreeMap<&str, Vec<String>> = records
            .iter()
            .map(|(name, tags)| (name.as_str(), tags.to_vec()))
            .collect();
        println!("{}", serde_json::to_string_pretty(&map)?);
        return Ok(());
    }

    if records.is_empty() {
        eprintln!("No tags stored in {}", store.get_metadata_path().display());
        return Ok(());
    }
    eprintln!("🏷️  Tags in {}:", store.get_metadata_path().display());
    for (name, tags) in &records {
        let missing = if config.sketch_dir.join(name).is_file() {
            ""
        } else {
            " [missing]"
        };
        println!("  {}{}: {}", name, missing, tags);
    }
    Ok(())
}

fn describe(tags: &TagSet) -> String {
    if tags.is_empty() {
        "(No Tags)".to_string()
    } else {
        format!("({})", tags)
    }
}
