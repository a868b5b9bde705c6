//! Sketch registry: discovery, per-sketch tag metadata and the tag schema.

pub mod discovery;
pub mod schema;
pub mod tags;

pub use discovery::{join_with_tags, list_sketches, list_sketches_with, SketchEntry, SketchFile, Sketches};
pub use schema::{ParamError, ParamType, ParamValue, ParameterSpec, ResolvedParam, TagSchema};
pub use tags::{parse_tag_list, TagSet, TagStore, METADATA_FILE_NAME};
